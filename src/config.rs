use crate::language::WhatlangDetector;
use crate::ranking::DEFAULT_TOP_N;
use crate::stopwords::StopWords;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("top_n must be at least 1")]
    ZeroTopN,
    #[error("seed_boost must be a finite, non-negative number (got {0})")]
    InvalidSeedBoost(f64),
    #[error("min_confidence must be within [0, 1] (got {0})")]
    InvalidConfidence(f64),
}

/// Tunables for one keyword engine. The target language is not configured
/// here; it travels with each corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub top_n: usize,
    pub tag_weight: usize,
    pub seed_boost: f64,
    pub min_term_length: usize,
    pub reach_top_n: usize,
    pub reach_min_occurrences: usize,
    pub fetch_timeout_ms: u64,
    /// Replaces the built-in stopword list when set
    pub stopwords: Option<Vec<String>>,
    pub extra_stopwords: Vec<String>,
    /// Detector allowlist, ISO 639-1 or 639-3 codes; empty means all
    pub languages: Vec<String>,
    pub min_confidence: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            tag_weight: 3,
            seed_boost: 1.5,
            min_term_length: 3,
            reach_top_n: 10,
            reach_min_occurrences: 2,
            fetch_timeout_ms: 5000,
            stopwords: None,
            extra_stopwords: Vec::new(),
            languages: Vec::new(),
            min_confidence: 0.0,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        if !self.seed_boost.is_finite() || self.seed_boost < 0.0 {
            return Err(ConfigError::InvalidSeedBoost(self.seed_boost));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidConfidence(self.min_confidence));
        }
        Ok(())
    }

    pub fn build_stopwords(&self) -> StopWords {
        let mut stopwords = match &self.stopwords {
            Some(words) => StopWords::from_words(words),
            None => StopWords::default(),
        };
        stopwords.extend(&self.extra_stopwords);
        stopwords
    }

    pub fn build_detector(&self) -> WhatlangDetector {
        WhatlangDetector::with_languages(&self.languages).with_min_confidence(self.min_confidence)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
