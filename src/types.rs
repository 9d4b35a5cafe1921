use serde::{Deserialize, Serialize};

use crate::error::AlignmentError;

/// A Danish sentence paired with its Kalaallisut counterpart.
///
/// Both sides are stored trimmed and are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub source: String,
    pub target: String,
}

impl AlignedPair {
    pub fn new(source: impl AsRef<str>, target: impl AsRef<str>) -> Result<Self, AlignmentError> {
        let source = source.as_ref().trim();
        let target = target.as_ref().trim();
        if source.is_empty() {
            return Err(AlignmentError::empty_input("source sentence of aligned pair"));
        }
        if target.is_empty() {
            return Err(AlignmentError::empty_input("target sentence of aligned pair"));
        }
        Ok(Self {
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}

/// Expected source/target length ratios derived from a training corpus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub avg_word_ratio: f64,
    pub avg_char_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentResult {
    pub source: String,
    pub target: String,
    /// Heuristic confidence in [0, 1].
    pub confidence: f64,
    pub source_index: usize,
    pub target_index: usize,
}

impl From<&AlignmentResult> for AlignedPair {
    fn from(result: &AlignmentResult) -> Self {
        Self {
            source: result.source.clone(),
            target: result.target.clone(),
        }
    }
}

/// One reading produced by the morphological analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MorphAnalysis {
    pub surface: String,
    /// Root followed by `+`-separated tags, e.g. `takuvoq+V+Ind+1Sg`.
    pub analysis: String,
    /// Lower is better.
    pub weight: f64,
}

impl MorphAnalysis {
    pub fn root(&self) -> &str {
        self.analysis.split('+').next().unwrap_or("")
    }

    pub fn morpheme_count(&self) -> usize {
        self.analysis.split('+').count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedToken {
    pub token: String,
    pub analyses: Vec<MorphAnalysis>,
    pub morpheme_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GlossToken {
    Punctuation {
        surface: String,
    },
    Unknown {
        surface: String,
    },
    /// No morphological reading, but the surface form is in the dictionary.
    Translated {
        surface: String,
        translation: String,
    },
    Analyzed {
        surface: String,
        morphemes: String,
        glosses: String,
        translation: Option<String>,
        raw_analysis: String,
        analysis_count: usize,
    },
}

impl GlossToken {
    pub fn surface(&self) -> &str {
        match self {
            Self::Punctuation { surface }
            | Self::Unknown { surface }
            | Self::Translated { surface, .. }
            | Self::Analyzed { surface, .. } => surface,
        }
    }
}
