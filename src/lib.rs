pub mod alignment;
pub mod config;
pub mod corpus;
pub mod error;
pub mod gloss;
pub mod morphology;
pub mod pipeline;
pub mod types;

pub use config::AlignerConfig;
pub use error::{AlignmentError, ErrorKind};
pub use gloss::{GlossTables, Glosser};
pub use pipeline::builder::SentenceAlignerBuilder;
pub use pipeline::runtime::SentenceAligner;
pub use pipeline::traits::{MorphAnalyzer, SentenceSplitter, SimilarityScorer, Tokenizer};
pub use types::{
    AlignedPair, AlignmentResult, AlignmentStats, GlossToken, MorphAnalysis, ProcessedToken,
};
