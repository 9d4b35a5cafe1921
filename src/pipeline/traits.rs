use crate::alignment::scoring::SentenceFeatures;
use crate::error::AlignmentError;
use crate::types::MorphAnalysis;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AlignmentError>;
}

pub trait SentenceSplitter: Send + Sync {
    fn split(&self, text: &str) -> Result<Vec<String>, AlignmentError>;
}

pub trait SimilarityScorer: Send + Sync {
    fn score(
        &self,
        source: &SentenceFeatures,
        target: &SentenceFeatures,
        source_pos: f64,
        target_pos: f64,
    ) -> f64;
}

pub trait MorphAnalyzer: Send + Sync {
    fn analyze(&self, word: &str) -> Result<Vec<MorphAnalysis>, AlignmentError>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AlignmentError> {
        (**self).tokenize(text)
    }
}

impl<A: MorphAnalyzer + ?Sized> MorphAnalyzer for Box<A> {
    fn analyze(&self, word: &str) -> Result<Vec<MorphAnalysis>, AlignmentError> {
        (**self).analyze(word)
    }
}
