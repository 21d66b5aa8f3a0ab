//! Backtest runner: wires together config, data, replay engine, and reporters.
//!
//! Two entry points:
//! - `run_backtest()`: resolves the CSV file (generating synthetic data if it
//!   is missing), then runs. Used by the CLI.
//! - `run_backtest_from_source()`: takes any `DataSource`. Used by tests and
//!   callers that already hold bars in memory.

use std::path::PathBuf;

use barlab_core::components::{SignalGenerator, StrategyConfigError};
use barlab_core::data::{DataError, DataSource};
use barlab_core::domain::{Bar, Valuation};
use barlab_core::engine::{ReplayEngine, ReplayError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{BacktestConfig, ConfigError, RunId};
use crate::data_loader::{dataset_hash, generate_sine_bars, write_bars_csv, CsvSource};
use crate::metrics::PerformanceSummary;
use crate::reporting::{EquityCsvReporter, SummaryReporter};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("replay error: {0}")]
    Replay(#[from] ReplayError),
}

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub run_id: RunId,
    pub strategy: String,
    /// BLAKE3 of the dates and closes handed to the engine.
    pub dataset_hash: String,
    pub bar_count: usize,
    /// `None` when no bars fell inside the configured range.
    pub summary: Option<PerformanceSummary>,
    pub history: Vec<Valuation>,
    pub equity_path: PathBuf,
    pub summary_path: PathBuf,
    /// True when the data file was missing and a synthetic series was written.
    pub synthetic_data: bool,
}

/// Run a single backtest from a `BacktestConfig`, reading `config.data_path`.
///
/// A missing data file is replaced by a synthetic sine-drift series spanning
/// `config.start..=config.end`, written to `config.data_path` first.
pub fn run_backtest(config: &BacktestConfig) -> Result<BacktestResult, RunError> {
    config.validate()?;

    let synthetic_data = ensure_data_file(config)?;
    let source = CsvSource::new(&config.data_path).with_date_column(config.date_column.clone());

    let mut result = run_backtest_from_source(config, &source)?;
    result.synthetic_data = synthetic_data;
    Ok(result)
}

/// Run a backtest against an arbitrary source. Writes artifacts to
/// `config.results_dir`.
pub fn run_backtest_from_source(
    config: &BacktestConfig,
    source: &dyn DataSource,
) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let run_id = config.run_id()?;
    let strategy = config.strategy.build()?;
    let strategy_name = strategy.name().to_string();

    tracing::info!(
        run_id = %run_id,
        strategy = %strategy_name,
        source = source.name(),
        start = %config.start,
        end = %config.end,
        "starting backtest"
    );

    // Buffered so the input can be hashed before the reporters are built.
    // A failing row stays in place and aborts the replay at that position.
    let bars: Vec<Result<Bar, DataError>> = source
        .load(&config.date_range())
        .map_err(ReplayError::from)?
        .collect();
    let dataset_hash = dataset_hash(bars.iter().map_while(|bar| bar.as_ref().ok()));
    tracing::debug!(dataset_hash = %dataset_hash, bars = bars.len(), "loaded input");

    let mut equity = EquityCsvReporter::in_dir(&config.results_dir);
    let mut summary =
        SummaryReporter::in_dir(&config.results_dir, run_id.clone(), &strategy_name)
            .with_dataset_hash(dataset_hash.clone())
            .with_equity_path(equity.path());

    let mut engine = ReplayEngine::new(strategy, config.initial_cash);
    let outcome = engine.run(bars, &mut [&mut equity, &mut summary])?;

    let equity_path = equity.path().to_path_buf();
    let summary_path = summary.path().to_path_buf();
    let (_, portfolio) = engine.into_parts();

    Ok(BacktestResult {
        run_id,
        strategy: strategy_name,
        dataset_hash,
        bar_count: outcome.bar_count,
        summary: summary.into_summary(),
        history: portfolio.into_history(),
        equity_path,
        summary_path,
        synthetic_data: false,
    })
}

/// Write a synthetic series to `config.data_path` if nothing is there yet.
/// Returns whether data was generated.
fn ensure_data_file(config: &BacktestConfig) -> Result<bool, DataError> {
    if config.data_path.exists() {
        return Ok(false);
    }

    let days = (config.end - config.start).num_days().max(0) as usize + 1;
    tracing::warn!(
        path = %config.data_path.display(),
        days,
        seed = config.synthetic_seed,
        "data file not found, generating synthetic series"
    );
    let bars = generate_sine_bars(config.start, days, config.synthetic_seed);
    write_bars_csv(&config.data_path, &bars)?;
    Ok(true)
}
