//! Serializable backtest configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) describes the demo run:
//!
//! ```toml
//! data_path = "data/demo.csv"
//! initial_cash = 100000.0
//! start = "2018-01-01"
//! end = "2024-12-31"
//! results_dir = "results"
//!
//! [strategy]
//! kind = "moving_average"
//! short_window = 20
//! long_window = 50
//! ```

use std::path::{Path, PathBuf};

use barlab_core::components::{StrategyConfigError, StrategySpec};
use barlab_core::data::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("initial cash must be positive and finite, got {0}")]
    InitialCash(f64),

    #[error("start date {start} is after end date {end}")]
    DateOrder { start: NaiveDate, end: NaiveDate },

    #[error("invalid strategy: {0}")]
    Strategy(#[from] StrategyConfigError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Everything needed to reproduce a single backtest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BacktestConfig {
    /// CSV file with at least a date and a close column.
    pub data_path: PathBuf,

    /// Name of the date column in `data_path`.
    pub date_column: String,

    pub initial_cash: f64,

    /// First bar to replay (inclusive).
    pub start: NaiveDate,

    /// Last bar to replay (inclusive).
    pub end: NaiveDate,

    pub strategy: StrategySpec,

    /// Directory that receives `equity.csv` and `summary.json`.
    pub results_dir: PathBuf,

    /// Seed for the synthetic series written when `data_path` does not exist.
    pub synthetic_seed: u64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/demo.csv"),
            date_column: "date".into(),
            initial_cash: 100_000.0,
            start: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or(NaiveDate::MIN),
            strategy: StrategySpec::default(),
            results_dir: PathBuf::from("results"),
            synthetic_seed: 42,
        }
    }
}

impl BacktestConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_cash.is_finite() && self.initial_cash > 0.0) {
            return Err(ConfigError::InitialCash(self.initial_cash));
        }
        if self.start > self.end {
            return Err(ConfigError::DateOrder {
                start: self.start,
                end: self.end,
            });
        }
        self.strategy.build()?;
        Ok(())
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::between(self.start, self.end)
    }

    /// Deterministic BLAKE3 hash of the serialized config.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        let json = serde_json::to_string(self)?;
        let hash = blake3::hash(json.as_bytes());
        Ok(hash.to_hex().to_string())
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
