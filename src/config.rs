use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AlignmentError;
use crate::types::AlignmentStats;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Project configuration, built once at startup and passed by reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    pub lang_kal_path: PathBuf,
    pub data_paths: DataPaths,
    pub alignment: AlignmentSettings,
    pub cognates: CognateSettings,
    pub tools: ToolSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub raw: PathBuf,
    pub processed: PathBuf,
    pub aligned: PathBuf,
    pub test: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlignmentSettings {
    pub confidence_threshold: f64,
    pub word_score_weight: f64,
    pub char_score_weight: f64,
    pub position_score_weight: f64,
    pub lexical_score_weight: f64,
    pub min_sentence_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CognateSettings {
    pub min_word_length: usize,
    #[serde(alias = "max_edit_distance")]
    pub max_length_difference: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub tokenize_command: String,
    pub lookup_command: String,
    pub tokenize_timeout_secs: u64,
    pub lookup_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl AlignerConfig {
    pub const STATS_FILE_NAME: &'static str = "alignment_stats.json";

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        if !path.exists() {
            return Err(AlignmentError::not_found("config file", path));
        }
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io(format!("read {}", path.display()), e))?;
        serde_json::from_str(&data).map_err(|e| {
            AlignmentError::invalid_format(path.display().to_string(), e.to_string())
        })
    }

    /// Loads `path` when given, otherwise starts from the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, AlignmentError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("LANG_KAL_PATH").filter(|p| !p.trim().is_empty()) {
            self.lang_kal_path = PathBuf::from(path);
        }
        self
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        let a = &self.alignment;
        let weights = [
            ("word_score_weight", a.word_score_weight),
            ("char_score_weight", a.char_score_weight),
            ("position_score_weight", a.position_score_weight),
            ("lexical_score_weight", a.lexical_score_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AlignmentError::invalid_format(
                    "alignment config",
                    format!("{name} must be a non-negative number, got {weight}"),
                ));
            }
        }
        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AlignmentError::invalid_format(
                "alignment config",
                format!("score weights must sum to 1, got {sum}"),
            ));
        }
        if !(0.0..=1.0).contains(&a.confidence_threshold) {
            return Err(AlignmentError::invalid_format(
                "alignment config",
                format!(
                    "confidence_threshold must be within [0, 1], got {}",
                    a.confidence_threshold
                ),
            ));
        }
        Ok(())
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.lang_kal_path
            .join("tools/tokenisers/tokeniser-disamb-gt-desc.pmhfst")
    }

    pub fn analyzer_path(&self) -> PathBuf {
        self.lang_kal_path.join("src/fst/analyser-gt-desc.hfst")
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_paths.processed.join(Self::STATS_FILE_NAME)
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            lang_kal_path: home.join("lang-kal"),
            data_paths: DataPaths::default(),
            alignment: AlignmentSettings::default(),
            cognates: CognateSettings::default(),
            tools: ToolSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            raw: PathBuf::from("data/raw"),
            processed: PathBuf::from("data/processed"),
            aligned: PathBuf::from("data/aligned"),
            test: PathBuf::from("data/test"),
        }
    }
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            word_score_weight: 0.3,
            char_score_weight: 0.2,
            position_score_weight: 0.2,
            lexical_score_weight: 0.3,
            min_sentence_length: 5,
        }
    }
}

impl Default for CognateSettings {
    fn default() -> Self {
        Self {
            min_word_length: 3,
            max_length_difference: 2,
        }
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tokenize_command: "hfst-tokenize".to_string(),
            lookup_command: "hfst-lookup".to_string(),
            tokenize_timeout_secs: 30,
            lookup_timeout_secs: 10,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AlignmentStats {
    const REQUIRED_FIELDS: [&'static str; 2] = ["avg_word_ratio", "avg_char_ratio"];

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        if !path.exists() {
            return Err(AlignmentError::not_found("statistics file", path));
        }
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io(format!("read {}", path.display()), e))?;
        Self::from_json(&data).map_err(|err| match err {
            AlignmentError::InvalidFormat { message, .. } => {
                AlignmentError::invalid_format(path.display().to_string(), message)
            }
            other => other,
        })
    }

    pub fn from_json(data: &str) -> Result<Self, AlignmentError> {
        let value: serde_json::Value = serde_json::from_str(data)
            .map_err(|e| AlignmentError::invalid_format("statistics", format!("invalid JSON: {e}")))?;
        let object = value.as_object().ok_or_else(|| {
            AlignmentError::invalid_format("statistics", "expected a JSON object")
        })?;

        let missing: Vec<&str> = Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !object.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(AlignmentError::invalid_format(
                "statistics",
                format!("missing required fields: {}", missing.join(", ")),
            ));
        }

        let field = |name: &str| -> Result<f64, AlignmentError> {
            let ratio = object.get(name).and_then(|v| v.as_f64()).ok_or_else(|| {
                AlignmentError::invalid_format("statistics", format!("{name} must be a number"))
            })?;
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(AlignmentError::invalid_format(
                    "statistics",
                    format!("{name} must be positive, got {ratio}"),
                ));
            }
            Ok(ratio)
        };

        Ok(Self {
            avg_word_ratio: field("avg_word_ratio")?,
            avg_char_ratio: field("avg_char_ratio")?,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), AlignmentError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AlignmentError::io(format!("create {}", parent.display()), e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AlignmentError::json("serialize statistics", e))?;
        std::fs::write(path, json + "\n")
            .map_err(|e| AlignmentError::io(format!("write {}", path.display()), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn aligner_config_default() {
        let config = AlignerConfig::default();
        assert_eq!(config.alignment.min_sentence_length, 5);
        assert_eq!(config.alignment.confidence_threshold, 0.5);
        assert_eq!(config.cognates.min_word_length, 3);
        assert_eq!(config.tools.tokenize_timeout_secs, 30);
        assert_eq!(config.tools.lookup_timeout_secs, 10);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.stats_path(),
            PathBuf::from("data/processed/alignment_stats.json")
        );
    }

    #[test]
    fn partial_config_keeps_defaults_for_missing_sections() {
        let json = r#"{
            "lang_kal_path": "/opt/lang-kal",
            "alignment": { "min_sentence_length": 8 },
            "cognates": { "max_edit_distance": 4 }
        }"#;
        let config: AlignerConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.alignment.min_sentence_length, 8);
        assert_eq!(config.alignment.word_score_weight, 0.3);
        assert_eq!(config.cognates.max_length_difference, 4);
        assert_eq!(
            config.analyzer_path(),
            PathBuf::from("/opt/lang-kal/src/fst/analyser-gt-desc.hfst")
        );
        assert_eq!(
            config.tokenizer_path(),
            PathBuf::from("/opt/lang-kal/tools/tokenisers/tokeniser-disamb-gt-desc.pmhfst")
        );
    }

    #[test]
    fn env_override_replaces_lang_kal_path() {
        let config = AlignerConfig::default().with_overrides_from(|key| {
            (key == "LANG_KAL_PATH").then(|| "/srv/lang-kal".to_string())
        });
        assert_eq!(config.lang_kal_path, PathBuf::from("/srv/lang-kal"));
    }

    #[test]
    fn validate_rejects_weights_not_summing_to_one() {
        let mut config = AlignerConfig::default();
        config.alignment.lexical_score_weight = 0.0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);

        config.alignment.word_score_weight = 0.4;
        config.alignment.char_score_weight = 0.3;
        config.alignment.position_score_weight = 0.3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_weight() {
        let mut config = AlignerConfig::default();
        config.alignment.word_score_weight = -0.1;
        config.alignment.lexical_score_weight = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_missing_config_is_not_found() {
        let err = AlignerConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn stats_from_json_reads_both_ratios() {
        let stats =
            AlignmentStats::from_json(r#"{"avg_word_ratio": 1.48, "avg_char_ratio": 0.75}"#)
                .unwrap();
        assert_eq!(stats.avg_word_ratio, 1.48);
        assert_eq!(stats.avg_char_ratio, 0.75);
    }

    #[test]
    fn stats_missing_char_ratio_is_invalid_format() {
        let err = AlignmentStats::from_json(r#"{"avg_word_ratio": 1.48}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert!(err.to_string().contains("avg_char_ratio"));
    }

    #[test]
    fn stats_invalid_json_is_invalid_format() {
        let err = AlignmentStats::from_json("{invalid json}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn stats_zero_ratio_is_rejected() {
        let err = AlignmentStats::from_json(r#"{"avg_word_ratio": 0, "avg_char_ratio": 0.75}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn stats_save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/alignment_stats.json");
        let stats = AlignmentStats {
            avg_word_ratio: 1.48,
            avg_char_ratio: 0.75,
        };
        stats.save(&path).expect("save stats");
        assert_eq!(AlignmentStats::load(&path).unwrap(), stats);
    }

    #[test]
    fn stats_load_missing_file_is_not_found() {
        let err = AlignmentStats::load(Path::new("/nonexistent/stats.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
