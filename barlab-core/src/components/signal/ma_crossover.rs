//! Moving average crossover signal: long while the short SMA is above the long SMA.
//!
//! Unlike an event-style cross detector, this generator reports the current
//! regime on every bar: `1.0` when `short_sma > long_sma`, otherwise `0.0`.
//! Ties resolve to flat.

use crate::domain::Bar;
use crate::indicators::RollingWindow;

use super::{Signal, SignalGenerator, StrategyConfigError};

/// Simple-moving-average crossover over a single window of closes.
///
/// The window holds `long_window` closes; the short SMA is taken over its
/// most recent `short_window` entries. Output depends only on the closes
/// currently in the window.
#[derive(Debug, Clone)]
pub struct MaCrossover {
    short_window: usize,
    long_window: usize,
    prices: RollingWindow,
}

impl MaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, StrategyConfigError> {
        if short_window == 0 || long_window == 0 {
            return Err(StrategyConfigError::NonPositiveWindow {
                short_window,
                long_window,
            });
        }
        if short_window >= long_window {
            return Err(StrategyConfigError::WindowOrder {
                short_window,
                long_window,
            });
        }

        Ok(Self {
            short_window,
            long_window,
            prices: RollingWindow::new(long_window),
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    /// `(short_sma, long_sma)` once the window is full.
    pub fn averages(&self) -> Option<(f64, f64)> {
        if !self.prices.is_full() {
            return None;
        }
        let long_sma = self.prices.mean()?;
        let short_sma = self.prices.tail_mean(self.short_window)?;
        Some((short_sma, long_sma))
    }
}

impl SignalGenerator for MaCrossover {
    fn name(&self) -> &str {
        "moving_average"
    }

    fn warmup_bars(&self) -> usize {
        self.prices.capacity()
    }

    fn on_bar(&mut self, bar: &Bar) -> Signal {
        self.prices.push(bar.close);

        match self.averages() {
            Some((short_sma, long_sma)) if short_sma > long_sma => Signal::long(),
            _ => Signal::flat(),
        }
    }
}
