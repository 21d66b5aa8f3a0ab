//! Target-weight sizer
//!
//! Rebalances the single position so that its notional equals
//! `target_weight * (cash + quantity * price)`.

use crate::components::signal::Signal;
use crate::domain::{Bar, Order};
use crate::sizers::Sizer;

/// Sizes orders from the signal's target weight at the bar close.
///
/// Weights outside `[0, 1]` are used as given, producing leveraged or short
/// exposure. A non-positive price yields a zero-quantity order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetWeightSizer;

impl Sizer for TargetWeightSizer {
    fn size(&self, signal: Signal, cash: f64, quantity: f64, bar: &Bar) -> Order {
        target_weight_order(signal.target_weight, cash, quantity, bar.close)
    }

    fn name(&self) -> &str {
        "target_weight"
    }
}

/// Order that takes `quantity` to `target_weight` of current value at `price`.
pub fn target_weight_order(target_weight: f64, cash: f64, quantity: f64, price: f64) -> Order {
    let current_value = cash + quantity * price;
    let target_notional = target_weight * current_value;
    let current_notional = quantity * price;
    let delta_notional = target_notional - current_notional;

    let order_quantity = if price > 0.0 {
        delta_notional / price
    } else {
        0.0
    };

    Order::new(order_quantity, price)
}
