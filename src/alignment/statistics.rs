use crate::alignment::scoring::SentenceFeatures;
use crate::error::AlignmentError;
use crate::types::{AlignedPair, AlignmentStats};

/// Averages the per-pair source/target word and character ratios.
///
/// `target_tokens` tokenizes a target sentence; `on_pair` is called after each
/// pair with the number of pairs processed so far. Pairs whose target has no
/// words or characters are skipped.
pub fn compute_statistics<T, P>(
    pairs: &[AlignedPair],
    mut target_tokens: T,
    mut on_pair: P,
) -> Result<AlignmentStats, AlignmentError>
where
    T: FnMut(&str) -> Vec<String>,
    P: FnMut(usize),
{
    if pairs.is_empty() {
        return Err(AlignmentError::empty_input("no pairs to compute statistics from"));
    }

    let mut word_ratio_sum = 0.0f64;
    let mut char_ratio_sum = 0.0f64;
    let mut used = 0usize;

    for (idx, pair) in pairs.iter().enumerate() {
        let source = SentenceFeatures::from_whitespace(&pair.source)?;
        let tokens = target_tokens(&pair.target);
        let target = SentenceFeatures::from_tokens(&pair.target, &tokens)?;

        if target.word_count > 0 && target.char_count > 0 {
            word_ratio_sum += source.word_count as f64 / target.word_count as f64;
            char_ratio_sum += source.char_count as f64 / target.char_count as f64;
            used += 1;
        } else {
            tracing::debug!(pair = idx, "statistics: skipping pair without target words");
        }
        on_pair(idx + 1);
    }

    if used == 0 {
        return Err(AlignmentError::empty_input("no pair has a non-empty target"));
    }

    let stats = AlignmentStats {
        avg_word_ratio: word_ratio_sum / used as f64,
        avg_char_ratio: char_ratio_sum / used as f64,
    };
    tracing::info!(
        pairs = pairs.len(),
        used,
        avg_word_ratio = stats.avg_word_ratio,
        avg_char_ratio = stats.avg_char_ratio,
        "computed alignment statistics"
    );
    Ok(stats)
}
