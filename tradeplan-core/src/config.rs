//! Run configuration.
//!
//! One explicit structure passed into the pipeline — no process-wide
//! mutable state. TOML-loadable; every field has a default matching the
//! tool's long-standing constants, so an empty file (or no file) is a
//! complete configuration. The provider access token is deliberately NOT
//! part of this structure: it is supplied at the CLI boundary and never
//! persisted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse config file: {0}")]
    Parse(String),
}

/// Quote provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    /// Batch-quote endpoint; symbols are appended as a comma-joined path
    /// segment.
    pub base_url: String,
    /// Symbols per request.
    pub batch_size: usize,
    /// Pause between (and after) batch requests, in seconds.
    pub rate_limit_secs: u64,
}

impl ProviderSettings {
    pub fn rate_limit(&self) -> Duration {
        Duration::from_secs(self.rate_limit_secs)
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.iex.cloud/v1/data/core/quote".into(),
            batch_size: 100,
            rate_limit_secs: 60,
        }
    }
}

/// On-disk layout: the data directory and the files inside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub dir: PathBuf,
    pub cache_file: String,
    pub backup_file: String,
    pub raw_results_file: String,
    pub universe_file: String,
    /// Cache expiry window, in days.
    pub expire_days: u64,
}

impl StorageSettings {
    pub fn cache_path(&self) -> PathBuf {
        self.dir.join(&self.cache_file)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.dir.join(&self.backup_file)
    }

    pub fn raw_results_path(&self) -> PathBuf {
        self.dir.join(&self.raw_results_file)
    }

    pub fn universe_path(&self) -> PathBuf {
        self.dir.join(&self.universe_file)
    }

    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expire_days * 24 * 60 * 60)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: "data_store".into(),
            cache_file: "sa.csv".into(),
            backup_file: "sa.bak.csv".into(),
            raw_results_file: "raw_results.json".into(),
            universe_file: "sp_500_stocks.csv".into(),
            expire_days: 7,
        }
    }
}

/// Output spreadsheet settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    pub file: PathBuf,
    pub sheet: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            file: "recommended_trades.xlsx".into(),
            sheet: "Recommended Trades".into(),
        }
    }
}

/// The complete run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanConfig {
    pub provider: ProviderSettings,
    pub storage: StorageSettings,
    pub output: OutputSettings,
}

impl PlanConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
