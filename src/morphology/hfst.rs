use std::path::PathBuf;
use std::time::Duration;

use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::morphology::process::run_tool;
use crate::pipeline::traits::{MorphAnalyzer, Tokenizer};
use crate::types::MorphAnalysis;

/// Marker `hfst-lookup` appends when it has no reading for a word.
const UNKNOWN_ANALYSIS_SUFFIX: &str = "+?";

/// Kalaallisut tokenizer backed by `hfst-tokenize` and a `.pmhfst` transducer.
#[derive(Debug, Clone)]
pub struct HfstTokenizer {
    pub command: String,
    pub transducer: PathBuf,
    pub timeout: Duration,
}

impl HfstTokenizer {
    pub fn from_config(config: &AlignerConfig) -> Self {
        Self {
            command: config.tools.tokenize_command.clone(),
            transducer: config.tokenizer_path(),
            timeout: Duration::from_secs(config.tools.tokenize_timeout_secs),
        }
    }
}

impl Tokenizer for HfstTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AlignmentError> {
        if text.trim().is_empty() {
            return Err(AlignmentError::empty_input("text to tokenize"));
        }
        if !self.transducer.exists() {
            return Err(AlignmentError::not_found("tokenizer transducer", &self.transducer));
        }

        let output = run_tool(&self.command, [&self.transducer], text, self.timeout)?;
        if !output.status.success() {
            return Err(AlignmentError::tool_failure(
                &self.command,
                format!("exited with {}: {}", output.status, output.stderr.trim()),
            ));
        }

        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Morphological analyzer backed by `hfst-lookup` and an `.hfst` transducer.
#[derive(Debug, Clone)]
pub struct HfstAnalyzer {
    pub command: String,
    pub transducer: PathBuf,
    pub timeout: Duration,
}

impl HfstAnalyzer {
    pub fn from_config(config: &AlignerConfig) -> Self {
        Self {
            command: config.tools.lookup_command.clone(),
            transducer: config.analyzer_path(),
            timeout: Duration::from_secs(config.tools.lookup_timeout_secs),
        }
    }
}

impl MorphAnalyzer for HfstAnalyzer {
    fn analyze(&self, word: &str) -> Result<Vec<MorphAnalysis>, AlignmentError> {
        if word.trim().is_empty() {
            return Err(AlignmentError::empty_input("word to analyze"));
        }
        if !self.transducer.exists() {
            return Err(AlignmentError::not_found("analyzer transducer", &self.transducer));
        }

        // hfst-lookup exits non-zero for unknown words, so the status is not checked.
        let output = run_tool(&self.command, [&self.transducer], word, self.timeout)?;
        Ok(parse_lookup_output(&output.stdout))
    }
}

/// Parses `surface<TAB>analysis[<TAB>weight]` lines.
pub fn parse_lookup_output(stdout: &str) -> Vec<MorphAnalysis> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('>'))
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let surface = parts.next()?.trim();
            let analysis = parts.next()?.trim();
            if analysis.is_empty() || analysis.ends_with(UNKNOWN_ANALYSIS_SUFFIX) {
                return None;
            }
            let weight = parts
                .next()
                .and_then(|w| w.trim().parse::<f64>().ok())
                .unwrap_or(0.0);
            Some(MorphAnalysis {
                surface: surface.to_string(),
                analysis: analysis.to_string(),
                weight,
            })
        })
        .collect()
}
