use crate::alignment::lexicon::Lexicon;
use crate::alignment::scoring::ScoreWeights;
use crate::config::AlignerConfig;
use crate::error::AlignmentError;
use crate::morphology::HfstTokenizer;
use crate::pipeline::defaults::{DateAwareSplitter, RatioSimilarityScorer};
use crate::pipeline::runtime::{SentenceAligner, SentenceAlignerParts};
use crate::pipeline::traits::{SentenceSplitter, SimilarityScorer, Tokenizer};
use crate::types::AlignmentStats;

pub struct SentenceAlignerBuilder {
    config: AlignerConfig,
    stats: Option<AlignmentStats>,
    lexicon: Option<Lexicon>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    splitter: Option<Box<dyn SentenceSplitter>>,
    scorer: Option<Box<dyn SimilarityScorer>>,
}

impl SentenceAlignerBuilder {
    pub fn new(config: AlignerConfig) -> Self {
        Self {
            config,
            stats: None,
            lexicon: None,
            tokenizer: None,
            splitter: None,
            scorer: None,
        }
    }

    /// Uses these statistics instead of reading `config.stats_path()`.
    pub fn with_stats(mut self, stats: AlignmentStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_splitter(mut self, splitter: Box<dyn SentenceSplitter>) -> Self {
        self.splitter = Some(splitter);
        self
    }

    /// Replaces the ratio scorer; statistics and lexicon are then unused.
    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn build(self) -> Result<SentenceAligner, AlignmentError> {
        self.config.validate()?;
        let settings = self.config.alignment;

        let scorer = match self.scorer {
            Some(scorer) => scorer,
            None => {
                let stats = match self.stats {
                    Some(stats) => stats,
                    None => AlignmentStats::load(&self.config.stats_path())?,
                };
                if settings.lexical_score_weight > 0.0 && self.lexicon.is_none() {
                    tracing::debug!(
                        lexical_weight = settings.lexical_score_weight,
                        "no lexicon configured, lexical score contributes nothing"
                    );
                }
                Box::new(RatioSimilarityScorer {
                    stats,
                    weights: ScoreWeights::from_settings(&settings),
                    lexicon: self.lexicon,
                })
            }
        };

        let tokenizer = match self.tokenizer {
            Some(tokenizer) => tokenizer,
            None => Box::new(HfstTokenizer::from_config(&self.config)),
        };

        Ok(SentenceAligner::from_parts(SentenceAlignerParts {
            tokenizer,
            splitter: self.splitter.unwrap_or_else(|| {
                Box::new(DateAwareSplitter {
                    min_sentence_length: settings.min_sentence_length,
                })
            }),
            scorer,
            confidence_threshold: settings.confidence_threshold,
        }))
    }
}
