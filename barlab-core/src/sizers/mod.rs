//! Position sizers: turn a signal into an order
//!
//! Sizers are portfolio-aware (they see cash and the current position) but
//! signal-agnostic: they do not care which generator produced the weight.

pub mod target_weight;

pub use target_weight::{target_weight_order, TargetWeightSizer};

use crate::components::signal::Signal;
use crate::domain::{Bar, Order};

/// Order sizing logic
///
/// # Responsibilities
/// - Convert signal + ledger state + bar price -> one order
///
/// # Non-Responsibilities
/// - Sizers do NOT decide entry/exit (that's the signal's job)
/// - Sizers do NOT fill orders (that's the fill model's job)
pub trait Sizer: Send + Sync {
    /// Build the order that moves the position toward the signal.
    fn size(&self, signal: Signal, cash: f64, quantity: f64, bar: &Bar) -> Order;

    /// Sizer name for logging
    fn name(&self) -> &str;
}
