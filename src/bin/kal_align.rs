use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use da_kal_align::alignment::lexicon::{extract_cognates, extract_dictionary, Lexicon};
use da_kal_align::alignment::statistics::compute_statistics;
use da_kal_align::corpus::{
    append_pairs, load_aligned_pairs, load_parallel_corpus, save_pairs, split_train_test,
};
use da_kal_align::gloss::load_dictionary;
use da_kal_align::morphology::{HfstAnalyzer, HfstTokenizer};
use da_kal_align::pipeline::defaults::{FallbackTokenizer, WhitespaceTokenizer};
use da_kal_align::{
    AlignerConfig, AlignmentResult, AlignmentStats, GlossTables, Glosser, SentenceAlignerBuilder,
    Tokenizer,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[path = "kal_align/gloss_text_formatter.rs"]
mod gloss_text_formatter;

#[derive(Debug, Parser)]
#[command(name = "kal_align")]
#[command(about = "Danish-Kalaallisut sentence alignment and corpus tools")]
struct Args {
    /// JSON configuration file; defaults are used when omitted.
    #[arg(long, env = "KAL_ALIGN_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Align the sentences of a Danish document with a Kalaallisut document.
    Align {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        target: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Statistics file; defaults to the processed data directory.
        #[arg(long)]
        stats: Option<PathBuf>,
        /// JSON word lexicon used for the lexical score.
        #[arg(long)]
        lexicon: Option<PathBuf>,
        /// Overrides the configured confidence threshold.
        #[arg(long)]
        min_confidence: Option<f64>,
    },
    /// Compute expected length ratios from an aligned-pairs file.
    Stats {
        #[arg(long)]
        pairs: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Split targets on whitespace instead of running hfst-tokenize.
        #[arg(long, default_value_t = false)]
        whitespace: bool,
    },
    /// Shuffle an aligned-pairs file into train and test files.
    Split {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        train_out: PathBuf,
        #[arg(long)]
        test_out: PathBuf,
        #[arg(long, default_value_t = 0.2)]
        test_ratio: f64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Append confident pairs from a DA/KL/CONF corpus to a training file.
    Append {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        train: PathBuf,
        #[arg(long, default_value_t = 0.5)]
        min_confidence: f64,
    },
    /// Extract surface-similar word pairs as a JSON lexicon.
    Cognates {
        #[arg(long)]
        pairs: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Extract a co-occurrence dictionary as a JSON lexicon.
    Dictionary {
        #[arg(long)]
        pairs: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 3)]
        min_count: usize,
    },
    /// Print morpheme-by-morpheme glosses of Kalaallisut text.
    Gloss {
        /// Input text file; stdin when omitted.
        input: Option<PathBuf>,
        #[arg(long)]
        glosses: PathBuf,
        #[arg(long)]
        dictionary: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let config = AlignerConfig::load_or_default(args.config.as_deref())
        .map_err(|err| err.to_string())?
        .with_env_overrides();
    init_logging(&config.logging.level)?;

    match args.command {
        Command::Align {
            source,
            target,
            out,
            stats,
            lexicon,
            min_confidence,
        } => run_align(
            config,
            &source,
            &target,
            &out,
            stats.as_deref(),
            lexicon.as_deref(),
            min_confidence,
        ),
        Command::Stats {
            pairs,
            out,
            whitespace,
        } => run_stats(&config, &pairs, &out, whitespace),
        Command::Split {
            input,
            train_out,
            test_out,
            test_ratio,
            seed,
        } => run_split(&input, &train_out, &test_out, test_ratio, seed),
        Command::Append {
            corpus,
            train,
            min_confidence,
        } => run_append(&corpus, &train, min_confidence),
        Command::Cognates { pairs, out } => {
            let pairs = load_aligned_pairs(&pairs).map_err(|err| err.to_string())?;
            let cognates = extract_cognates(
                &pairs,
                config.cognates.min_word_length,
                config.cognates.max_length_difference,
            );
            write_json(&out, &cognates)?;
            println!("Wrote {} cognates to {}", cognates.len(), out.display());
            Ok(())
        }
        Command::Dictionary {
            pairs,
            out,
            min_count,
        } => {
            let pairs = load_aligned_pairs(&pairs).map_err(|err| err.to_string())?;
            let dictionary =
                extract_dictionary(&pairs, config.cognates.min_word_length, min_count);
            write_json(&out, &dictionary)?;
            println!("Wrote {} entries to {}", dictionary.len(), out.display());
            Ok(())
        }
        Command::Gloss {
            input,
            glosses,
            dictionary,
            out,
        } => run_gloss(
            &config,
            input.as_deref(),
            &glosses,
            dictionary.as_deref(),
            out.as_deref(),
        ),
    }
}

fn init_logging(level: &str) -> Result<(), String> {
    let directive = format!("da_kal_align={level}")
        .parse()
        .map_err(|err| format!("invalid log level '{level}': {err}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run_align(
    config: AlignerConfig,
    source: &Path,
    target: &Path,
    out: &Path,
    stats: Option<&Path>,
    lexicon: Option<&Path>,
    min_confidence: Option<f64>,
) -> Result<(), String> {
    if let Some(threshold) = min_confidence {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!("--min-confidence must be within [0, 1], got {threshold}"));
        }
    }
    let source_text = read_text(source)?;
    let target_text = read_text(target)?;

    let mut builder = SentenceAlignerBuilder::new(config);
    if let Some(path) = stats {
        builder = builder.with_stats(AlignmentStats::load(path).map_err(|err| err.to_string())?);
    }
    if let Some(path) = lexicon {
        let lexicon = Lexicon::load(path).map_err(|err| err.to_string())?;
        tracing::info!(entries = lexicon.len(), "loaded lexicon");
        builder = builder.with_lexicon(lexicon);
    }
    let aligner = builder.build().map_err(|err| err.to_string())?;

    let results = aligner
        .align_documents(&source_text, &target_text)
        .map_err(|err| err.to_string())?;
    let total = results.len();
    let kept: Vec<AlignmentResult> = match min_confidence {
        Some(threshold) => results
            .into_iter()
            .filter(|r| r.confidence >= threshold)
            .collect(),
        None => aligner.confident(&results).cloned().collect(),
    };
    if kept.is_empty() {
        return Err(format!(
            "none of the {total} alignments reached the confidence threshold"
        ));
    }

    aligner
        .save_alignments(&kept, out)
        .map_err(|err| err.to_string())?;
    let mean = kept.iter().map(|r| r.confidence).sum::<f64>() / kept.len() as f64;
    println!(
        "Aligned {total} sentences, kept {} (mean confidence {mean:.3}) in {}",
        kept.len(),
        out.display()
    );
    Ok(())
}

fn run_stats(
    config: &AlignerConfig,
    pairs_path: &Path,
    out: &Path,
    whitespace: bool,
) -> Result<(), String> {
    let pairs = load_aligned_pairs(pairs_path).map_err(|err| err.to_string())?;
    let tokenizer: Box<dyn Tokenizer> = if whitespace {
        Box::new(WhitespaceTokenizer)
    } else {
        Box::new(HfstTokenizer::from_config(config))
    };
    let tokenizer = FallbackTokenizer::new(tokenizer);

    let progress = ProgressBar::new(pairs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    let stats = compute_statistics(
        &pairs,
        |target| tokenizer.tokens(target),
        |done| progress.set_position(done as u64),
    );
    progress.finish_and_clear();
    let stats = stats.map_err(|err| err.to_string())?;

    if out.exists() {
        let backup = backup_path(out);
        fs::copy(out, &backup)
            .map_err(|err| format!("Failed to back up '{}': {err}", out.display()))?;
        tracing::info!(backup = %backup.display(), "backed up previous statistics");
    }
    stats.save(out).map_err(|err| err.to_string())?;
    println!(
        "avg_word_ratio={:.4} avg_char_ratio={:.4} ({} pairs) -> {}",
        stats.avg_word_ratio,
        stats.avg_char_ratio,
        pairs.len(),
        out.display()
    );
    Ok(())
}

fn run_split(
    input: &Path,
    train_out: &Path,
    test_out: &Path,
    test_ratio: f64,
    seed: u64,
) -> Result<(), String> {
    let pairs = load_aligned_pairs(input).map_err(|err| err.to_string())?;
    let (train, test) =
        split_train_test(&pairs, test_ratio, seed).map_err(|err| err.to_string())?;
    save_pairs(&train, train_out).map_err(|err| err.to_string())?;
    save_pairs(&test, test_out).map_err(|err| err.to_string())?;
    println!("Train: {} pairs, test: {} pairs", train.len(), test.len());
    Ok(())
}

fn run_append(corpus: &Path, train: &Path, min_confidence: f64) -> Result<(), String> {
    let new_pairs = load_parallel_corpus(corpus, min_confidence).map_err(|err| err.to_string())?;
    if new_pairs.is_empty() {
        return Err(format!(
            "No pairs with confidence >= {min_confidence} in '{}'",
            corpus.display()
        ));
    }
    let total = append_pairs(train, &new_pairs, &backup_path(train)).map_err(|err| err.to_string())?;
    println!(
        "Appended {} pairs, {} total in {}",
        new_pairs.len(),
        total,
        train.display()
    );
    Ok(())
}

fn run_gloss(
    config: &AlignerConfig,
    input: Option<&Path>,
    glosses: &Path,
    dictionary: Option<&Path>,
    out: Option<&Path>,
) -> Result<(), String> {
    let text = match input {
        Some(path) => read_text(path)?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            text
        }
    };

    let tables = GlossTables::load(glosses).map_err(|err| err.to_string())?;
    let dictionary = match dictionary {
        Some(path) => load_dictionary(path).map_err(|err| err.to_string())?,
        None => Default::default(),
    };
    tracing::info!(entries = dictionary.len(), "loaded gloss dictionary");

    let glosser = Glosser::new(
        Box::new(HfstTokenizer::from_config(config)),
        Box::new(HfstAnalyzer::from_config(config)),
        tables,
        dictionary,
    );
    let glossed = glosser.gloss_text(&text).map_err(|err| err.to_string())?;
    let rendered = gloss_text_formatter::render(&glossed);

    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|err| format!("Failed to create '{}': {err}", parent.display()))?;
            }
            fs::write(path, rendered)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))
        }
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn read_text(path: &Path) -> Result<String, String> {
    if !path.exists() {
        return Err(format!("Missing input file: {}", path.display()));
    }
    fs::read_to_string(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create '{}': {err}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| format!("Failed to serialize '{}': {err}", path.display()))?;
    fs::write(path, json + "\n").map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".backup");
    path.with_file_name(name)
}
