use crate::alignment::lexicon::{normalize_word, Lexicon};
use crate::config::AlignmentSettings;
use crate::error::AlignmentError;
use crate::types::AlignmentStats;

/// Convex weights of the four similarity terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub word: f64,
    pub char: f64,
    pub position: f64,
    pub lexical: f64,
}

impl ScoreWeights {
    pub fn from_settings(settings: &AlignmentSettings) -> Self {
        Self {
            word: settings.word_score_weight,
            char: settings.char_score_weight,
            position: settings.position_score_weight,
            lexical: settings.lexical_score_weight,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::from_settings(&AlignmentSettings::default())
    }
}

/// Length features of one sentence, computed once and reused across comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceFeatures {
    pub word_count: usize,
    pub char_count: usize,
    /// Lower-cased words stripped of surrounding punctuation, used for lexicon lookups.
    pub words: Vec<String>,
}

impl SentenceFeatures {
    /// Counts whitespace-separated words, as done for the source language.
    pub fn from_whitespace(sentence: &str) -> Result<Self, AlignmentError> {
        if sentence.trim().is_empty() {
            return Err(AlignmentError::empty_input("source sentence"));
        }
        let raw: Vec<&str> = sentence.split_whitespace().collect();
        Ok(Self {
            word_count: raw.len(),
            char_count: sentence.chars().count(),
            words: normalized_words(raw.iter().copied()),
        })
    }

    /// Counts tokens produced by a tokenizer, ignoring pure punctuation tokens.
    pub fn from_tokens<S: AsRef<str>>(
        sentence: &str,
        tokens: &[S],
    ) -> Result<Self, AlignmentError> {
        if sentence.trim().is_empty() {
            return Err(AlignmentError::empty_input("target sentence"));
        }
        let words: Vec<&str> = tokens
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !is_punctuation_token(t))
            .collect();
        Ok(Self {
            word_count: words.len(),
            char_count: sentence.chars().count(),
            words: normalized_words(words.iter().copied()),
        })
    }
}

/// True for blank tokens and tokens made only of punctuation.
pub fn is_punctuation_token(token: &str) -> bool {
    token
        .trim()
        .chars()
        .all(|c| c.is_ascii_punctuation() || matches!(c, '«' | '»' | '–' | '—' | '…' | '„' | '“' | '”'))
}

/// `1 - |ratio - expected| / expected`, floored at zero.
pub fn ratio_score(ratio: f64, expected: f64) -> f64 {
    (1.0 - (ratio - expected).abs() / expected).max(0.0)
}

/// `1 - |a - b|` for relative positions in [0, 1].
pub fn position_score(source_pos: f64, target_pos: f64) -> f64 {
    (1.0 - (source_pos - target_pos).abs()).max(0.0)
}

/// Combines length-ratio, position and lexical evidence into a score in [0, 1].
///
/// Returns 0.0 when either side has no words or no characters.
pub fn score_features(
    source: &SentenceFeatures,
    target: &SentenceFeatures,
    source_pos: f64,
    target_pos: f64,
    stats: &AlignmentStats,
    weights: &ScoreWeights,
    lexicon: Option<&Lexicon>,
) -> f64 {
    if source.word_count == 0
        || source.char_count == 0
        || target.word_count == 0
        || target.char_count == 0
    {
        return 0.0;
    }

    let word_ratio = source.word_count as f64 / target.word_count as f64;
    let char_ratio = source.char_count as f64 / target.char_count as f64;

    let word_score = ratio_score(word_ratio, stats.avg_word_ratio);
    let char_score = ratio_score(char_ratio, stats.avg_char_ratio);
    let pos_score = position_score(source_pos, target_pos);
    let lex_score = lexicon
        .map(|lexicon| lexicon.lexical_score(&source.words, &target.words))
        .unwrap_or(0.0);

    let total = weights.word * word_score
        + weights.char * char_score
        + weights.position * pos_score
        + weights.lexical * lex_score;
    if total.is_finite() {
        total.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn normalized_words<'a>(words: impl Iterator<Item = &'a str>) -> Vec<String> {
    words
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect()
}
