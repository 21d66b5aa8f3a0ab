//! Factory system: converts a `StrategySpec` into a validated generator.
//!
//! Strategy kinds form a closed set. Each variant carries its own parameters
//! and is validated by the generator's constructor, so an invalid spec fails
//! before the first bar is replayed.

use serde::{Deserialize, Serialize};

use super::signal::{MaCrossover, MeanReversion, Signal, SignalGenerator, StrategyConfigError};
use crate::domain::Bar;

// ─── Spec ────────────────────────────────────────────────────────────

/// Serializable strategy selection.
///
/// In TOML:
/// ```toml
/// [strategy]
/// kind = "mean_reversion"
/// lookback = 20
/// entry_z = 1.5
/// exit_z = 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum StrategySpec {
    /// Short SMA above long SMA -> fully invested.
    MovingAverage {
        #[serde(default = "default_short_window")]
        short_window: usize,
        #[serde(default = "default_long_window")]
        long_window: usize,
    },
    /// Z-score dip buying with an exit band.
    MeanReversion {
        #[serde(default = "default_lookback")]
        lookback: usize,
        #[serde(default = "default_entry_z")]
        entry_z: f64,
        #[serde(default = "default_exit_z")]
        exit_z: f64,
    },
}

fn default_short_window() -> usize {
    20
}

fn default_long_window() -> usize {
    50
}

fn default_lookback() -> usize {
    20
}

fn default_entry_z() -> f64 {
    1.5
}

fn default_exit_z() -> f64 {
    0.5
}

impl Default for StrategySpec {
    fn default() -> Self {
        Self::MovingAverage {
            short_window: default_short_window(),
            long_window: default_long_window(),
        }
    }
}

impl StrategySpec {
    /// Registry key for this kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MovingAverage { .. } => "moving_average",
            Self::MeanReversion { .. } => "mean_reversion",
        }
    }

    /// Validate parameters and build the generator.
    pub fn build(&self) -> Result<Strategy, StrategyConfigError> {
        match *self {
            Self::MovingAverage {
                short_window,
                long_window,
            } => Ok(Strategy::MovingAverage(MaCrossover::new(
                short_window,
                long_window,
            )?)),
            Self::MeanReversion {
                lookback,
                entry_z,
                exit_z,
            } => Ok(Strategy::MeanReversion(MeanReversion::new(
                lookback, entry_z, exit_z,
            )?)),
        }
    }
}

// ─── Built strategy ──────────────────────────────────────────────────

/// A validated generator, one variant per strategy kind.
#[derive(Debug, Clone)]
pub enum Strategy {
    MovingAverage(MaCrossover),
    MeanReversion(MeanReversion),
}

impl SignalGenerator for Strategy {
    fn name(&self) -> &str {
        match self {
            Self::MovingAverage(s) => s.name(),
            Self::MeanReversion(s) => s.name(),
        }
    }

    fn warmup_bars(&self) -> usize {
        match self {
            Self::MovingAverage(s) => s.warmup_bars(),
            Self::MeanReversion(s) => s.warmup_bars(),
        }
    }

    fn on_bar(&mut self, bar: &Bar) -> Signal {
        match self {
            Self::MovingAverage(s) => s.on_bar(bar),
            Self::MeanReversion(s) => s.on_bar(bar),
        }
    }
}
