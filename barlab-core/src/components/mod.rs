//! Component traits: the pieces a replay is composed of.
//!
//! - Signal generator: consumes bars, emits a target weight
//! - Fill model: realizes orders against a bar
//! - Factory: builds a validated generator from a `StrategySpec`
//!
//! Sizing lives in `crate::sizers`.

pub mod execution;
pub mod factory;
pub mod signal;

pub use execution::{CloseFill, FillModel};
pub use factory::{Strategy, StrategySpec};
pub use signal::{MaCrossover, MeanReversion, Signal, SignalGenerator, StrategyConfigError};
