//! Mean reversion signal: long-only z-score entry/exit with hysteresis.
//!
//! Enters when the close falls to `-entry_z` standard deviations below the
//! lookback mean and stays long until the z-score recovers to `-exit_z`.
//! Because `entry_z > exit_z`, a single noisy bar cannot toggle the state.

use crate::domain::Bar;
use crate::indicators::RollingWindow;

use super::{Signal, SignalGenerator, StrategyConfigError};

/// Long/flat state machine driven by a population z-score.
///
/// The `long` flag only changes on bars with a full, non-degenerate window;
/// it persists unchanged through warm-up and flat windows.
#[derive(Debug, Clone)]
pub struct MeanReversion {
    lookback: usize,
    entry_z: f64,
    exit_z: f64,
    prices: RollingWindow,
    long: bool,
}

impl MeanReversion {
    pub fn new(lookback: usize, entry_z: f64, exit_z: f64) -> Result<Self, StrategyConfigError> {
        if lookback <= 1 {
            return Err(StrategyConfigError::LookbackTooShort(lookback));
        }
        if !(entry_z.is_finite() && exit_z.is_finite() && entry_z > 0.0 && exit_z > 0.0) {
            return Err(StrategyConfigError::NonPositiveThreshold { entry_z, exit_z });
        }
        if entry_z <= exit_z {
            return Err(StrategyConfigError::ThresholdOrder { entry_z, exit_z });
        }

        Ok(Self {
            lookback,
            entry_z,
            exit_z,
            prices: RollingWindow::new(lookback),
            long: false,
        })
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    pub fn entry_z(&self) -> f64 {
        self.entry_z
    }

    pub fn exit_z(&self) -> f64 {
        self.exit_z
    }

    pub fn is_long(&self) -> bool {
        self.long
    }

    /// Z-score of the latest close against the full window.
    /// `None` during warm-up or when the window's deviation is exactly zero.
    pub fn z_score(&self) -> Option<f64> {
        if !self.prices.is_full() {
            return None;
        }
        let (mean, std) = self.prices.mean_and_population_std()?;
        if std == 0.0 {
            return None;
        }
        let close = self.prices.latest()?;
        Some((close - mean) / std)
    }

    fn transition(&mut self, z: f64) {
        if !self.long && z <= -self.entry_z {
            self.long = true;
        } else if self.long && z >= -self.exit_z {
            self.long = false;
        }
    }
}

impl SignalGenerator for MeanReversion {
    fn name(&self) -> &str {
        "mean_reversion"
    }

    fn warmup_bars(&self) -> usize {
        self.prices.capacity()
    }

    fn on_bar(&mut self, bar: &Bar) -> Signal {
        self.prices.push(bar.close);

        let Some(z) = self.z_score() else {
            return Signal::flat();
        };
        self.transition(z);

        if self.long {
            Signal::long()
        } else {
            Signal::flat()
        }
    }
}
