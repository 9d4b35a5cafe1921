use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::alignment::scoring::is_punctuation_token;
use crate::error::AlignmentError;
use crate::types::AlignedPair;

const STRIP_CHARS: &[char] = &['.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '"'];

/// Lower-cases a word and strips surrounding punctuation.
pub fn normalize_word(word: &str) -> String {
    word.trim_matches(STRIP_CHARS).to_lowercase()
}

/// Collects Danish/Kalaallisut word pairs that look alike on the surface.
///
/// Exact matches always win; a near match (one word contains the other and the
/// lengths differ by at most `max_length_difference`) only fills an empty slot.
pub fn extract_cognates(
    pairs: &[AlignedPair],
    min_word_length: usize,
    max_length_difference: usize,
) -> BTreeMap<String, String> {
    let mut cognates = BTreeMap::new();

    for pair in pairs {
        let source_words = significant_words(&pair.source, min_word_length);
        let target_words = significant_words(&pair.target, min_word_length);

        for source in &source_words {
            for target in &target_words {
                if source == target {
                    cognates.insert(source.clone(), target.clone());
                    continue;
                }
                let contains = source.contains(target.as_str()) || target.contains(source.as_str());
                let length_diff = source.chars().count().abs_diff(target.chars().count());
                if contains && length_diff <= max_length_difference {
                    cognates
                        .entry(source.clone())
                        .or_insert_with(|| target.clone());
                }
            }
        }
    }

    cognates
}

/// Builds a word dictionary from sentence-level co-occurrence counts.
///
/// For every source word the most frequent co-occurring target word is kept
/// when it was seen at least `min_count` times; the earliest seen wins ties.
pub fn extract_dictionary(
    pairs: &[AlignedPair],
    min_word_length: usize,
    min_count: usize,
) -> BTreeMap<String, String> {
    // source word -> target word -> (count, first seen order)
    let mut counts: HashMap<String, HashMap<String, (usize, usize)>> = HashMap::new();
    let mut order = 0usize;

    for pair in pairs {
        let source = pair.source.to_lowercase();
        let target = pair.target.to_lowercase();
        for source_word in source.split_whitespace() {
            let row = counts.entry(source_word.to_string()).or_default();
            for target_word in target.split_whitespace() {
                let entry = row.entry(target_word.to_string()).or_insert((0, order));
                entry.0 += 1;
                order += 1;
            }
        }
    }

    counts
        .into_iter()
        .filter(|(source, _)| {
            source.chars().count() >= min_word_length && !is_punctuation_token(source)
        })
        .filter_map(|(source, row)| {
            let (target, (count, _)) = row
                .into_iter()
                .min_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)))?;
            (count >= min_count).then_some((source, target))
        })
        .collect()
}

fn significant_words(sentence: &str, min_word_length: usize) -> Vec<String> {
    sentence
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| w.chars().count() >= min_word_length)
        .collect()
}

/// Source-to-target word translations used as the lexical similarity signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    entries: HashMap<String, String>,
}

impl Lexicon {
    pub fn from_entries<S, T>(entries: impl IntoIterator<Item = (S, T)>) -> Self
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(s, t)| (normalize_word(s.as_ref()), normalize_word(t.as_ref())))
                .filter(|(s, t)| !s.is_empty() && !t.is_empty())
                .collect(),
        }
    }

    /// Reads a JSON object mapping source words to target words.
    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        if !path.exists() {
            return Err(AlignmentError::not_found("lexicon file", path));
        }
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io(format!("read {}", path.display()), e))?;
        let raw: HashMap<String, String> = serde_json::from_str(&data).map_err(|e| {
            AlignmentError::invalid_format(path.display().to_string(), e.to_string())
        })?;
        Ok(Self::from_entries(raw))
    }

    /// Cognates first; dictionary entries only fill words the cognates lack.
    pub fn from_corpus(
        pairs: &[AlignedPair],
        min_word_length: usize,
        max_length_difference: usize,
        min_count: usize,
    ) -> Self {
        let mut lexicon = Self::from_entries(extract_cognates(
            pairs,
            min_word_length,
            max_length_difference,
        ));
        for (source, target) in extract_dictionary(pairs, min_word_length, min_count) {
            let source = normalize_word(&source);
            let target = normalize_word(&target);
            if !source.is_empty() && !target.is_empty() {
                lexicon.entries.entry(source).or_insert(target);
            }
        }
        lexicon
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn translate(&self, word: &str) -> Option<&str> {
        self.entries.get(&normalize_word(word)).map(String::as_str)
    }

    /// Fraction of known source words whose translation shows up in the target.
    ///
    /// A translation counts when it equals a target word or prefixes one, which
    /// covers inflected Kalaallisut forms. Both word lists must be normalized.
    pub fn lexical_score(&self, source_words: &[String], target_words: &[String]) -> f64 {
        let mut known = 0usize;
        let mut found = 0usize;
        for word in source_words {
            let Some(translation) = self.entries.get(word) else {
                continue;
            };
            known += 1;
            if target_words
                .iter()
                .any(|t| t == translation || t.starts_with(translation.as_str()))
            {
                found += 1;
            }
        }
        if known == 0 {
            0.0
        } else {
            found as f64 / known as f64
        }
    }
}
