use std::path::Path;

use crate::alignment::greedy;
use crate::alignment::scoring::SentenceFeatures;
use crate::corpus::save_pairs;
use crate::error::AlignmentError;
use crate::pipeline::defaults::FallbackTokenizer;
use crate::pipeline::traits::{SentenceSplitter, SimilarityScorer, Tokenizer};
use crate::types::{AlignedPair, AlignmentResult};

const LARGE_DOCUMENT_CHARS: usize = 1_000_000;

pub struct SentenceAligner {
    tokenizer: FallbackTokenizer<Box<dyn Tokenizer>>,
    splitter: Box<dyn SentenceSplitter>,
    scorer: Box<dyn SimilarityScorer>,
    confidence_threshold: f64,
}

pub(crate) struct SentenceAlignerParts {
    pub tokenizer: Box<dyn Tokenizer>,
    pub splitter: Box<dyn SentenceSplitter>,
    pub scorer: Box<dyn SimilarityScorer>,
    pub confidence_threshold: f64,
}

impl SentenceAligner {
    pub(crate) fn from_parts(parts: SentenceAlignerParts) -> Self {
        Self {
            tokenizer: FallbackTokenizer::new(parts.tokenizer),
            splitter: parts.splitter,
            scorer: parts.scorer,
            confidence_threshold: parts.confidence_threshold,
        }
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    pub fn split_sentences(&self, text: &str) -> Result<Vec<String>, AlignmentError> {
        self.splitter.split(text)
    }

    /// Scores one source/target sentence pair at the given relative positions.
    ///
    /// Blank sentences are rejected; a sentence with no countable words scores 0.
    pub fn score_similarity(
        &self,
        source: &str,
        target: &str,
        source_pos: f64,
        target_pos: f64,
    ) -> Result<f64, AlignmentError> {
        let source = SentenceFeatures::from_whitespace(source)?;
        let target = self.target_features(target)?;
        Ok(self.scorer.score(&source, &target, source_pos, target_pos))
    }

    /// Matches each source sentence to its best unused target sentence.
    ///
    /// Source sentences left over once every target is taken get no result.
    pub fn align_greedy<S, T>(
        &self,
        sources: &[S],
        targets: &[T],
    ) -> Result<Vec<AlignmentResult>, AlignmentError>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let source_features = sources
            .iter()
            .map(|s| SentenceFeatures::from_whitespace(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let target_features = targets
            .iter()
            .map(|t| self.target_features(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let matches = greedy::align_greedy(
            sources.len(),
            targets.len(),
            |source_index, target_index, source_pos, target_pos| {
                self.scorer.score(
                    &source_features[source_index],
                    &target_features[target_index],
                    source_pos,
                    target_pos,
                )
            },
        );

        let unmatched = sources.len() - matches.len();
        if unmatched > 0 {
            tracing::info!(
                unmatched,
                sources = sources.len(),
                targets = targets.len(),
                "source sentences left without a target"
            );
        }

        Ok(matches
            .into_iter()
            .map(|m| AlignmentResult {
                source: sources[m.source_index].as_ref().to_string(),
                target: targets[m.target_index].as_ref().to_string(),
                confidence: m.score,
                source_index: m.source_index,
                target_index: m.target_index,
            })
            .collect())
    }

    pub fn align_documents(
        &self,
        source_text: &str,
        target_text: &str,
    ) -> Result<Vec<AlignmentResult>, AlignmentError> {
        if source_text.trim().is_empty() {
            return Err(AlignmentError::empty_input("source document"));
        }
        if target_text.trim().is_empty() {
            return Err(AlignmentError::empty_input("target document"));
        }
        for (side, text) in [("source", source_text), ("target", target_text)] {
            let chars = text.chars().count();
            if chars > LARGE_DOCUMENT_CHARS {
                tracing::warn!(side, chars, "very large document, alignment may be slow");
            }
        }

        let sources = self.split_sentences(source_text)?;
        let targets = self.split_sentences(target_text)?;
        if sources.is_empty() {
            return Err(AlignmentError::empty_input("no sentences in source document"));
        }
        if targets.is_empty() {
            return Err(AlignmentError::empty_input("no sentences in target document"));
        }
        tracing::info!(
            source_sentences = sources.len(),
            target_sentences = targets.len(),
            "aligning documents"
        );

        let results = self.align_greedy(&sources, &targets)?;
        tracing::info!(alignments = results.len(), "alignment finished");
        Ok(results)
    }

    /// Writes results as `source @ target` lines.
    pub fn save_alignments(
        &self,
        results: &[AlignmentResult],
        path: &Path,
    ) -> Result<(), AlignmentError> {
        if results.is_empty() {
            return Err(AlignmentError::empty_input("no alignments to save"));
        }
        let pairs: Vec<AlignedPair> = results.iter().map(AlignedPair::from).collect();
        save_pairs(&pairs, path)?;
        tracing::info!(path = %path.display(), alignments = results.len(), "saved alignments");
        Ok(())
    }

    /// Results whose confidence reaches the configured threshold.
    pub fn confident<'a>(
        &self,
        results: &'a [AlignmentResult],
    ) -> impl Iterator<Item = &'a AlignmentResult> + 'a {
        let threshold = self.confidence_threshold;
        results.iter().filter(move |r| r.confidence >= threshold)
    }

    fn target_features(&self, target: &str) -> Result<SentenceFeatures, AlignmentError> {
        if target.trim().is_empty() {
            return Err(AlignmentError::empty_input("target sentence"));
        }
        let tokens = self.tokenizer.tokens(target);
        SentenceFeatures::from_tokens(target, &tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::scoring::ScoreWeights;
    use crate::error::ErrorKind;
    use crate::pipeline::defaults::{DateAwareSplitter, RatioSimilarityScorer, WhitespaceTokenizer};
    use crate::types::AlignmentStats;

    struct UnavailableTokenizer;

    impl Tokenizer for UnavailableTokenizer {
        fn tokenize(&self, _text: &str) -> Result<Vec<String>, AlignmentError> {
            Err(AlignmentError::not_found("tool binary", "hfst-tokenize"))
        }
    }

    fn aligner_with(tokenizer: Box<dyn Tokenizer>) -> SentenceAligner {
        SentenceAligner::from_parts(SentenceAlignerParts {
            tokenizer,
            splitter: Box::new(DateAwareSplitter {
                min_sentence_length: 5,
            }),
            scorer: Box::new(RatioSimilarityScorer {
                stats: AlignmentStats {
                    avg_word_ratio: 1.0,
                    avg_char_ratio: 1.0,
                },
                weights: ScoreWeights {
                    word: 0.4,
                    char: 0.3,
                    position: 0.3,
                    lexical: 0.0,
                },
                lexicon: None,
            }),
            confidence_threshold: 0.5,
        })
    }

    fn aligner() -> SentenceAligner {
        aligner_with(Box::new(WhitespaceTokenizer))
    }

    #[test]
    fn score_similarity_stays_in_unit_interval() {
        let aligner = aligner();
        let score = aligner
            .score_similarity("Hello world.", "Aluu nunaaq.", 0.0, 0.0)
            .unwrap();
        assert!((0.0..=1.0).contains(&score));
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn punctuation_only_target_scores_zero() {
        let score = aligner()
            .score_similarity("Hello world.", "... !", 0.0, 0.0)
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn blank_sentence_is_rejected() {
        let err = aligner()
            .score_similarity("   ", "Aluu.", 0.0, 0.0)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn tokenizer_failure_falls_back_to_whitespace() {
        let failing = aligner_with(Box::new(UnavailableTokenizer));
        let plain = aligner();
        let a = failing
            .score_similarity("En to tre.", "Ataaseq marluk.", 0.2, 0.4)
            .unwrap();
        let b = plain
            .score_similarity("En to tre.", "Ataaseq marluk.", 0.2, 0.4)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn align_greedy_gives_each_source_a_distinct_target() {
        let sources = ["one", "two words", "three words here"];
        let targets = ["three words here", "one", "two words"];
        let results = aligner().align_greedy(&sources, &targets).unwrap();
        assert_eq!(results.len(), 3);
        let mut used: Vec<usize> = results.iter().map(|r| r.target_index).collect();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used.len(), 3);
        for r in &results {
            assert_eq!(r.source, r.target);
        }
    }

    #[test]
    fn align_greedy_omits_starved_sources() {
        let sources = ["Første sætning her.", "Anden sætning her.", "Tredje."];
        let targets = ["Siulleq."];
        let results = aligner().align_greedy(&sources, &targets).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].target_index, 0);
    }

    #[test]
    fn align_documents_rejects_blank_input() {
        let aligner = aligner();
        let err = aligner.align_documents("", "Aluu.").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
        let err = aligner.align_documents("Hej med dig.", " \n\t ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn align_documents_pairs_sentences_in_order() {
        let results = aligner()
            .align_documents(
                "Hej med dig. Jeg hedder Anne og bor i Nuuk.",
                "Aluu, qanoq ippit. Uanga Anne Nuummi najugaqarpunga aamma sulivunga maani.",
            )
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].target_index, 0);
        assert_eq!(results[1].target_index, 1);
    }

    #[test]
    fn confident_filters_by_threshold() {
        let make = |confidence| AlignmentResult {
            source: "a".to_string(),
            target: "b".to_string(),
            confidence,
            source_index: 0,
            target_index: 0,
        };
        let results = vec![make(0.2), make(0.5), make(0.9)];
        let kept: Vec<f64> = aligner().confident(&results).map(|r| r.confidence).collect();
        assert_eq!(kept, vec![0.5, 0.9]);
    }

    #[test]
    fn save_alignments_writes_pair_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/aligned.txt");
        let results = vec![AlignmentResult {
            source: "Hej.".to_string(),
            target: "Aluu.".to_string(),
            confidence: 0.8,
            source_index: 0,
            target_index: 0,
        }];
        let aligner = aligner();
        aligner.save_alignments(&results, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hej. @ Aluu.\n");

        let err = aligner.save_alignments(&[], &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }
}
