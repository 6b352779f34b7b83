use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::eval::bleu::{Bleu, DEFAULT_EPSILON, DEFAULT_MAX_NGRAM};
use crate::eval::scorer::DEFAULT_K;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rageval: RagevalConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

/// RagEval-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RagevalConfig {
    /// JSON file with retrieval results, ground truth, generated and reference texts.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RagevalConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            log_level: default_log_level(),
        }
    }
}

/// Retrieval scoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_k")]
    pub k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { k: default_k() }
    }
}

/// Generation scoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_max_ngram")]
    pub max_ngram: usize,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_ngram: default_max_ngram(),
            epsilon: default_epsilon(),
        }
    }
}

/// Pass/fail thresholds for the CLI exit code. Unset means no check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default)]
    pub min_recall: Option<f64>,
    #[serde(default)]
    pub min_bleu: Option<f64>,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("eval_dataset.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_k() -> usize {
    DEFAULT_K
}

fn default_max_ngram() -> usize {
    DEFAULT_MAX_NGRAM
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in RAGEVAL_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("RAGEVAL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::load_from(&config_path)
    }

    /// Load and validate a specific config file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml_str(&config_str)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.retrieval.k == 0 {
            anyhow::bail!("retrieval.k must be greater than 0");
        }

        // Reuse the scorer's own checks for max_ngram and epsilon
        self.bleu().context("invalid [generation] settings")?;

        for (name, value) in [
            ("thresholds.min_recall", self.thresholds.min_recall),
            ("thresholds.min_bleu", self.thresholds.min_bleu),
        ] {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    anyhow::bail!("{} must be between 0.0 and 1.0", name);
                }
            }
        }

        Ok(())
    }

    /// BLEU settings from the [generation] section
    pub fn bleu(&self) -> crate::Result<Bleu> {
        Bleu::new(self.generation.max_ngram, self.generation.epsilon)
    }

    /// Get dataset path
    pub fn dataset_path(&self) -> &Path {
        &self.rageval.dataset_path
    }
}
