//! Reading and writing aligned sentence pairs.
//!
//! The on-disk format is one pair per line, `"<danish> @ <kalaallisut>"`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::AlignmentError;
use crate::types::AlignedPair;

pub const PAIR_SEPARATOR: &str = " @ ";

const LOG_PREVIEW_CHARS: usize = 50;

pub fn load_aligned_pairs(path: &Path) -> Result<Vec<AlignedPair>, AlignmentError> {
    if !path.exists() {
        return Err(AlignmentError::not_found("aligned pairs file", path));
    }
    if !path.is_file() {
        return Err(AlignmentError::invalid_format(
            path.display().to_string(),
            "not a regular file",
        ));
    }
    let bytes =
        fs::read(path).map_err(|e| AlignmentError::io(format!("read {}", path.display()), e))?;
    let text = String::from_utf8(bytes).map_err(|e| {
        AlignmentError::invalid_format(path.display().to_string(), format!("invalid encoding: {e}"))
    })?;

    let pairs = parse_aligned_pairs(&text);
    if pairs.is_empty() {
        return Err(AlignmentError::empty_input("no valid pairs in aligned pairs file"));
    }
    tracing::debug!(path = %path.display(), pairs = pairs.len(), "loaded aligned pairs");
    Ok(pairs)
}

/// Parses the line format, skipping (and logging) lines that do not hold exactly one pair.
pub fn parse_aligned_pairs(text: &str) -> Vec<AlignedPair> {
    let mut pairs = Vec::new();
    for (idx, raw_line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || !line.contains('@') {
            continue;
        }

        let parts: Vec<&str> = line.split(PAIR_SEPARATOR).collect();
        if parts.len() != 2 {
            tracing::warn!(
                line = line_num,
                preview = preview(line),
                "skipping malformed aligned pair line"
            );
            continue;
        }

        match AlignedPair::new(parts[0], parts[1]) {
            Ok(pair) => pairs.push(pair),
            Err(_) => {
                tracing::warn!(line = line_num, "skipping aligned pair with an empty sentence");
            }
        }
    }
    pairs
}

pub fn save_pairs(pairs: &[AlignedPair], path: &Path) -> Result<(), AlignmentError> {
    if pairs.is_empty() {
        return Err(AlignmentError::empty_input("cannot save an empty pairs list"));
    }
    let lines = pairs
        .iter()
        .enumerate()
        .map(|(idx, pair)| pair_line(idx, pair))
        .collect::<Result<Vec<_>, _>>()?;

    create_parent_dir(path)?;
    let file = File::create(path)
        .map_err(|e| AlignmentError::io(format!("create {}", path.display()), e))?;
    let mut writer = BufWriter::new(file);
    for line in &lines {
        writeln!(writer, "{line}")
            .map_err(|e| AlignmentError::io(format!("write {}", path.display()), e))?;
    }
    writer
        .flush()
        .map_err(|e| AlignmentError::io(format!("flush {}", path.display()), e))
}

/// Formats one pair, rejecting text that would not parse back to the same pair.
fn pair_line(idx: usize, pair: &AlignedPair) -> Result<String, AlignmentError> {
    let line = format!("{}{}{}", pair.source, PAIR_SEPARATOR, pair.target);
    let parts: Vec<&str> = line.split(PAIR_SEPARATOR).collect();
    let has_line_break = line.contains(['\n', '\r']);
    if has_line_break || parts != [pair.source.as_str(), pair.target.as_str()] {
        return Err(AlignmentError::invalid_format(
            format!("pair {idx}"),
            "sentence would not read back as the same pair",
        ));
    }
    Ok(line)
}

/// Deterministically shuffles and splits pairs; both halves are always non-empty.
pub fn split_train_test(
    pairs: &[AlignedPair],
    test_ratio: f64,
    seed: u64,
) -> Result<(Vec<AlignedPair>, Vec<AlignedPair>), AlignmentError> {
    if pairs.is_empty() {
        return Err(AlignmentError::empty_input("cannot split an empty pairs list"));
    }
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(AlignmentError::invalid_argument(format!(
            "test_ratio must be between 0 and 1, got {test_ratio}"
        )));
    }
    if pairs.len() < 2 {
        return Err(AlignmentError::invalid_argument(
            "need at least 2 pairs to split",
        ));
    }

    let mut shuffled = pairs.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let split_point = ((shuffled.len() as f64) * (1.0 - test_ratio)).floor() as usize;
    let split_point = split_point.clamp(1, shuffled.len() - 1);
    let test = shuffled.split_off(split_point);
    Ok((shuffled, test))
}

/// Parses `DA:` / `KL:` / `CONF:` blocks separated by blank lines.
pub fn parse_parallel_corpus(text: &str, min_confidence: f64) -> Vec<AlignedPair> {
    let mut pairs = Vec::new();
    let mut block = CorpusBlock::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            block.take().finish(min_confidence, &mut pairs);
            continue;
        }
        if let Some(rest) = line.strip_prefix("DA:") {
            block.source = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("KL:") {
            block.target = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("CONF:") {
            block.confidence = Some(rest.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(line = idx + 1, value = rest.trim(), "invalid confidence value");
                0.0
            }));
        }
    }
    block.finish(min_confidence, &mut pairs);

    tracing::info!(pairs = pairs.len(), "parsed parallel corpus");
    pairs
}

pub fn load_parallel_corpus(
    path: &Path,
    min_confidence: f64,
) -> Result<Vec<AlignedPair>, AlignmentError> {
    if !path.exists() {
        return Err(AlignmentError::not_found("parallel corpus", path));
    }
    let text = fs::read_to_string(path)
        .map_err(|e| AlignmentError::io(format!("read {}", path.display()), e))?;
    Ok(parse_parallel_corpus(&text, min_confidence))
}

/// Appends `new_pairs` to the pairs file at `existing`, backing the old file up first.
///
/// Returns the total number of pairs written.
pub fn append_pairs(
    existing: &Path,
    new_pairs: &[AlignedPair],
    backup: &Path,
) -> Result<usize, AlignmentError> {
    if new_pairs.is_empty() {
        return Err(AlignmentError::empty_input("no new pairs to append"));
    }
    let mut all_pairs = if existing.exists() {
        let current = load_aligned_pairs(existing)?;
        tracing::info!(
            existing = current.len(),
            backup = %backup.display(),
            "backing up existing pairs"
        );
        save_pairs(&current, backup)?;
        current
    } else {
        tracing::warn!(path = %existing.display(), "no existing pairs file, creating a new one");
        Vec::new()
    };
    all_pairs.extend_from_slice(new_pairs);
    save_pairs(&all_pairs, existing)?;
    Ok(all_pairs.len())
}

pub(crate) fn create_parent_dir(path: &Path) -> Result<(), AlignmentError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AlignmentError::io(format!("create {}", parent.display()), e))?;
    }
    Ok(())
}

fn preview(line: &str) -> String {
    line.chars().take(LOG_PREVIEW_CHARS).collect()
}

#[derive(Default)]
struct CorpusBlock {
    source: Option<String>,
    target: Option<String>,
    confidence: Option<f64>,
}

impl CorpusBlock {
    fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    fn finish(self, min_confidence: f64, out: &mut Vec<AlignedPair>) {
        let (Some(source), Some(target)) = (self.source, self.target) else {
            return;
        };
        let confidence = self.confidence.unwrap_or(1.0);
        if confidence < min_confidence {
            tracing::debug!(confidence, "skipping low-confidence pair");
            return;
        }
        if let Ok(pair) = AlignedPair::new(source, target) {
            out.push(pair);
        }
    }
}
