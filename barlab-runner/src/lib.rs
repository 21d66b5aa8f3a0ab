//! BarLab Runner: backtest orchestration, configuration, data files, metrics.
//!
//! This crate builds on `barlab-core` to provide:
//! - TOML run configuration with demo defaults
//! - CSV data source and a reproducible synthetic series
//! - Performance summary (return, CAGR, volatility, Sharpe, drawdown)
//! - Equity CSV and JSON summary reporters
//! - Single-backtest runner

pub mod config;
pub mod data_loader;
pub mod metrics;
pub mod reporting;
pub mod runner;

pub use config::{BacktestConfig, ConfigError, RunId};
pub use data_loader::{dataset_hash, generate_sine_bars, write_bars_csv, CsvSource};
pub use metrics::PerformanceSummary;
pub use reporting::{EquityCsvReporter, SummaryDocument, SummaryReporter};
pub use runner::{run_backtest, run_backtest_from_source, BacktestResult, RunError};
