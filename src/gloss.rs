//! Interlinear glossing of Kalaallisut text from morphological analyses.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::alignment::scoring::is_punctuation_token;
use crate::error::{AlignmentError, ErrorKind};
use crate::pipeline::defaults::FallbackTokenizer;
use crate::pipeline::traits::{MorphAnalyzer, Tokenizer};
use crate::types::{GlossToken, MorphAnalysis};

/// Verbal endings stripped when a root is missing from the dictionary.
const ROOT_SUFFIXES: [&str; 5] = ["voq", "poq", "soq", "toq", "neq"];

/// Gloss tables for roots and grammatical tags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GlossTables {
    #[serde(default)]
    pub roots: HashMap<String, String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl GlossTables {
    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        read_json(path, "gloss tables")
    }
}

/// Reads a Kalaallisut-to-English dictionary stored as a flat JSON object.
pub fn load_dictionary(path: &Path) -> Result<HashMap<String, String>, AlignmentError> {
    read_json(path, "dictionary file")
}

fn read_json<T: for<'de> Deserialize<'de>>(
    path: &Path,
    what: &'static str,
) -> Result<T, AlignmentError> {
    if !path.exists() {
        return Err(AlignmentError::not_found(what, path));
    }
    let data = std::fs::read_to_string(path)
        .map_err(|e| AlignmentError::io(format!("read {}", path.display()), e))?;
    serde_json::from_str(&data)
        .map_err(|e| AlignmentError::invalid_format(path.display().to_string(), e.to_string()))
}

pub struct Glosser {
    tokenizer: FallbackTokenizer<Box<dyn Tokenizer>>,
    analyzer: Box<dyn MorphAnalyzer>,
    tables: GlossTables,
    dictionary: HashMap<String, String>,
}

impl Glosser {
    pub fn new(
        tokenizer: Box<dyn Tokenizer>,
        analyzer: Box<dyn MorphAnalyzer>,
        tables: GlossTables,
        dictionary: HashMap<String, String>,
    ) -> Self {
        Self {
            tokenizer: FallbackTokenizer::new(tokenizer),
            analyzer,
            tables,
            dictionary,
        }
    }

    /// Tokenizes `text` and classifies every token.
    pub fn gloss_text(&self, text: &str) -> Result<Vec<GlossToken>, AlignmentError> {
        if text.trim().is_empty() {
            return Err(AlignmentError::empty_input("text to gloss"));
        }

        let tokens = self.tokenizer.tokens(text);
        let mut glossed = Vec::with_capacity(tokens.len());
        for token in tokens {
            if token.trim().is_empty() {
                continue;
            }
            if is_punctuation_token(&token) {
                glossed.push(GlossToken::Punctuation { surface: token });
                continue;
            }
            let analyses = self.analyses_of(&token);
            glossed.push(self.classify(token, &analyses));
        }

        tracing::debug!(tokens = glossed.len(), "glossed text");
        Ok(glossed)
    }

    fn analyses_of(&self, token: &str) -> Vec<MorphAnalysis> {
        match self.analyzer.analyze(token) {
            Ok(analyses) => analyses,
            Err(err) if err.kind() == ErrorKind::EmptyInput => Vec::new(),
            Err(err) => {
                tracing::warn!(token, error = %err, "morphological analysis failed");
                Vec::new()
            }
        }
    }

    fn classify(&self, surface: String, analyses: &[MorphAnalysis]) -> GlossToken {
        let Some(best) = self.best_analysis(analyses) else {
            return match self.dictionary.get(&surface) {
                Some(translation) => GlossToken::Translated {
                    translation: translation.clone(),
                    surface,
                },
                None => GlossToken::Unknown { surface },
            };
        };

        let mut parts = best.analysis.split('+');
        let root = parts.next().unwrap_or_default();
        let tags: Vec<&str> = parts.collect();

        let morphemes = std::iter::once(root)
            .chain(tags.iter().copied())
            .collect::<Vec<_>>()
            .join("-");
        let root_gloss = self
            .translate_root(root)
            .unwrap_or_else(|| self.gloss_morpheme(root));
        let glosses = std::iter::once(root_gloss)
            .chain(tags.iter().map(|tag| self.gloss_morpheme(tag)))
            .collect::<Vec<_>>()
            .join("-");

        GlossToken::Analyzed {
            translation: self.dictionary.get(&surface).cloned(),
            surface,
            morphemes,
            glosses,
            raw_analysis: best.analysis.clone(),
            analysis_count: analyses.len(),
        }
    }

    /// Prefers a reading whose root has a dictionary entry, then the shortest one.
    fn best_analysis<'a>(&self, analyses: &'a [MorphAnalysis]) -> Option<&'a MorphAnalysis> {
        analyses
            .iter()
            .find(|a| self.dictionary.contains_key(a.root()))
            .or_else(|| analyses.iter().min_by_key(|a| a.morpheme_count()))
    }

    fn translate_root(&self, root: &str) -> Option<&str> {
        if let Some(translation) = self.dictionary.get(root) {
            return Some(translation);
        }
        ROOT_SUFFIXES.iter().find_map(|suffix| {
            let base = root.strip_suffix(suffix)?;
            self.dictionary.get(base).map(String::as_str)
        })
    }

    fn gloss_morpheme<'a>(&'a self, morpheme: &'a str) -> &'a str {
        self.tables
            .tags
            .get(morpheme)
            .or_else(|| self.tables.roots.get(morpheme))
            .or_else(|| self.dictionary.get(morpheme))
            .map_or(morpheme, String::as_str)
    }
}
