use crate::alignment::lexicon::Lexicon;
use crate::alignment::scoring::{score_features, ScoreWeights, SentenceFeatures};
use crate::alignment::segmentation::split_sentences;
use crate::error::AlignmentError;
use crate::pipeline::traits::{SentenceSplitter, SimilarityScorer, Tokenizer};
use crate::types::AlignmentStats;

pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AlignmentError> {
        Ok(whitespace_tokens(text))
    }
}

/// Wraps a tokenizer and falls back to whitespace splitting when it fails.
pub struct FallbackTokenizer<T> {
    inner: T,
}

impl<T: Tokenizer> FallbackTokenizer<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Never fails: tool errors degrade to whitespace tokens.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        match self.inner.tokenize(text) {
            Ok(tokens) => tokens,
            Err(err) => {
                tracing::debug!(error = %err, "tokenizer unavailable, falling back to whitespace split");
                whitespace_tokens(text)
            }
        }
    }
}

impl<T: Tokenizer> Tokenizer for FallbackTokenizer<T> {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AlignmentError> {
        Ok(self.tokens(text))
    }
}

pub struct DateAwareSplitter {
    pub min_sentence_length: usize,
}

impl SentenceSplitter for DateAwareSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>, AlignmentError> {
        split_sentences(text, self.min_sentence_length)
    }
}

/// Scores sentence pairs against expected corpus length ratios.
pub struct RatioSimilarityScorer {
    pub stats: AlignmentStats,
    pub weights: ScoreWeights,
    pub lexicon: Option<Lexicon>,
}

impl SimilarityScorer for RatioSimilarityScorer {
    fn score(
        &self,
        source: &SentenceFeatures,
        target: &SentenceFeatures,
        source_pos: f64,
        target_pos: f64,
    ) -> f64 {
        score_features(
            source,
            target,
            source_pos,
            target_pos,
            &self.stats,
            &self.weights,
            self.lexicon.as_ref(),
        )
    }
}

pub(crate) fn whitespace_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
