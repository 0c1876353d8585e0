use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "MedBot";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the knowledge base location.
pub const KNOWLEDGE_BASE_ENV: &str = "MEDBOT_KNOWLEDGE_BASE";

/// Knowledge base location when no override is set (relative to the working directory).
pub const DEFAULT_KNOWLEDGE_BASE: &str = "data/symptoms_diseases.json";

/// Resolve the knowledge base file: `MEDBOT_KNOWLEDGE_BASE` if set and non-empty,
/// otherwise `data/symptoms_diseases.json`.
pub fn knowledge_base_path() -> PathBuf {
    match std::env::var(KNOWLEDGE_BASE_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_KNOWLEDGE_BASE),
    }
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medbot_lib=info,warn"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {0}: {1}")]
    Read(String, String),

    #[error("Cannot parse config file {0}: {1}")]
    Parse(String, String),

    #[error("Config value out of range: {field} = {value}")]
    OutOfRange { field: &'static str, value: String },
}

/// Tunables of the triage pipeline.
///
/// Built once at startup and handed by reference to every component
/// constructor. Nothing reads it through global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Disease knowledge base (JSON object keyed by disease name).
    pub knowledge_base_path: PathBuf,
    /// Maximum number of ranked diseases returned by the matcher.
    pub top_n: usize,
    /// Similarity floor: scores at or below it are dropped.
    pub min_similarity: f64,
    /// A matched disease escalates only when its score is strictly above this.
    pub escalation_threshold: f64,
    /// Vocabulary cap of the TF-IDF space.
    pub max_features: usize,
    /// Largest n-gram size of the TF-IDF space (unigrams always included).
    pub ngram_max: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            knowledge_base_path: knowledge_base_path(),
            top_n: 5,
            min_similarity: 0.1,
            escalation_threshold: 0.3,
            max_features: 1000,
            ngram_max: 2,
        }
    }
}

impl TriageConfig {
    /// Load a config from a JSON file. Missing fields take their default value.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the pipeline meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(out_of_range("top_n", self.top_n));
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(out_of_range("min_similarity", self.min_similarity));
        }
        if !(0.0..=1.0).contains(&self.escalation_threshold) {
            return Err(out_of_range("escalation_threshold", self.escalation_threshold));
        }
        if self.max_features == 0 {
            return Err(out_of_range("max_features", self.max_features));
        }
        if !(1..=3).contains(&self.ngram_max) {
            return Err(out_of_range("ngram_max", self.ngram_max));
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn app_name_is_medbot() {
        assert_eq!(APP_NAME, "MedBot");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn default_config_matches_reference_behaviour() {
        let config = TriageConfig::default();
        assert_eq!(config.top_n, 5);
        assert!((config.min_similarity - 0.1).abs() < f64::EPSILON);
        assert!((config.escalation_threshold - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.max_features, 1000);
        assert_eq!(config.ngram_max, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_top_n() {
        let config = TriageConfig {
            top_n: 0,
            ..TriageConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "top_n", .. }));
    }

    #[test]
    fn validate_rejects_threshold_above_one() {
        let config = TriageConfig {
            escalation_threshold: 1.5,
            ..TriageConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_ngram_out_of_range() {
        let config = TriageConfig {
            ngram_max: 0,
            ..TriageConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_file_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"top_n": 3, "knowledge_base_path": "kb.json"}}"#).unwrap();

        let config = TriageConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.knowledge_base_path, PathBuf::from("kb.json"));
        assert_eq!(config.max_features, 1000);
    }

    #[test]
    fn json_file_with_invalid_value_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_similarity": -0.2}}"#).unwrap();

        let err = TriageConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn missing_json_file_is_read_error() {
        let err = TriageConfig::from_json_file(Path::new("/nonexistent/medbot.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(..)));
    }

    #[test]
    fn default_log_filter_targets_crate() {
        assert!(default_log_filter().contains("medbot_lib"));
    }
}
