//! Signal generation: consumes bars one at a time, emits a target weight.
//!
//! Signals are portfolio-agnostic: they see the bar stream and their own
//! bounded history, never cash or position state.

pub mod ma_crossover;
pub mod mean_reversion;

pub use ma_crossover::MaCrossover;
pub use mean_reversion::MeanReversion;

use crate::domain::Bar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Desired fraction of portfolio value held in the asset.
///
/// `0.0` is fully in cash, `1.0` fully invested. Values outside that range
/// are passed through to sizing unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub target_weight: f64,
}

impl Signal {
    pub fn new(target_weight: f64) -> Self {
        Self { target_weight }
    }

    /// Stay in (or move to) cash.
    pub fn flat() -> Self {
        Self::new(0.0)
    }

    /// Fully invested.
    pub fn long() -> Self {
        Self::new(1.0)
    }

    pub fn is_flat(&self) -> bool {
        self.target_weight == 0.0
    }
}

/// Invalid strategy parameters, raised before any bar is processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyConfigError {
    #[error("windows must be positive (short_window={short_window}, long_window={long_window})")]
    NonPositiveWindow {
        short_window: usize,
        long_window: usize,
    },
    #[error("short_window ({short_window}) must be < long_window ({long_window})")]
    WindowOrder {
        short_window: usize,
        long_window: usize,
    },
    #[error("lookback must be greater than 1 (got {0})")]
    LookbackTooShort(usize),
    #[error("entry_z and exit_z must be positive and finite (entry_z={entry_z}, exit_z={exit_z})")]
    NonPositiveThreshold { entry_z: f64, exit_z: f64 },
    #[error("entry_z ({entry_z}) must be greater than exit_z ({exit_z})")]
    ThresholdOrder { entry_z: f64, exit_z: f64 },
}

/// Trait for signal generators.
///
/// Generators are stateful: `on_bar` is called exactly once per bar, in date
/// order, and may update internal windows before answering.
pub trait SignalGenerator: Send + Sync {
    /// Human-readable name (e.g., "moving_average").
    fn name(&self) -> &str;

    /// Number of bars needed before this signal can leave cash.
    fn warmup_bars(&self) -> usize;

    /// Consume `bar` and return the target weight for it.
    fn on_bar(&mut self, bar: &Bar) -> Signal;
}

impl<G: SignalGenerator + ?Sized> SignalGenerator for Box<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn warmup_bars(&self) -> usize {
        (**self).warmup_bars()
    }

    fn on_bar(&mut self, bar: &Bar) -> Signal {
        (**self).on_bar(bar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct AlwaysLong;

    impl SignalGenerator for AlwaysLong {
        fn name(&self) -> &str {
            "always_long"
        }

        fn warmup_bars(&self) -> usize {
            0
        }

        fn on_bar(&mut self, _bar: &Bar) -> Signal {
            Signal::long()
        }
    }

    #[test]
    fn boxed_generator_delegates() {
        let mut sig: Box<dyn SignalGenerator> = Box::new(AlwaysLong);
        let bar = Bar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 1.0);
        assert_eq!(sig.name(), "always_long");
        assert_eq!(sig.warmup_bars(), 0);
        assert_eq!(sig.on_bar(&bar), Signal::long());
    }

    #[test]
    fn signal_constructors() {
        assert!(Signal::flat().is_flat());
        assert_eq!(Signal::long().target_weight, 1.0);
        assert!(!Signal::new(0.25).is_flat());
    }

    #[test]
    fn config_error_messages() {
        let err = StrategyConfigError::WindowOrder {
            short_window: 5,
            long_window: 5,
        };
        assert_eq!(err.to_string(), "short_window (5) must be < long_window (5)");
        assert_eq!(
            StrategyConfigError::LookbackTooShort(1).to_string(),
            "lookback must be greater than 1 (got 1)"
        );
    }
}
