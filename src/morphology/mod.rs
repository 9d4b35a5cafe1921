//! Tokenization and morphological analysis through the external HFST tools.

pub mod hfst;
pub mod process;

use crate::alignment::scoring::is_punctuation_token;
use crate::error::{AlignmentError, ErrorKind};
use crate::pipeline::traits::{MorphAnalyzer, Tokenizer};
use crate::types::ProcessedToken;

pub use hfst::{parse_lookup_output, HfstAnalyzer, HfstTokenizer};

/// Tokenizes a sentence and analyzes every non-punctuation token.
///
/// A token whose analysis fails is kept with no analyses.
pub fn process_sentence(
    sentence: &str,
    tokenizer: &dyn Tokenizer,
    analyzer: &dyn MorphAnalyzer,
) -> Result<Vec<ProcessedToken>, AlignmentError> {
    if sentence.trim().is_empty() {
        return Err(AlignmentError::empty_input("sentence"));
    }

    let tokens = tokenizer
        .tokenize(sentence)
        .map_err(|e| AlignmentError::tool_failure("tokenizer", format!("tokenization failed: {e}")))?;

    let mut processed = Vec::with_capacity(tokens.len());
    for token in tokens {
        if is_punctuation_token(&token) {
            continue;
        }
        let analyses = match analyzer.analyze(&token) {
            Ok(analyses) => analyses,
            Err(err) if err.kind() == ErrorKind::EmptyInput => continue,
            Err(err) => {
                tracing::warn!(token = token.as_str(), error = %err, "failed to analyze token");
                Vec::new()
            }
        };
        let morpheme_count = analyses.first().map_or(0, |a| a.morpheme_count());
        processed.push(ProcessedToken {
            token,
            analyses,
            morpheme_count,
        });
    }

    Ok(processed)
}
