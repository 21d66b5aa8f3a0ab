//! Orders produced by the sizer and consumed by the execution simulator.

use serde::{Deserialize, Serialize};

/// Immediate market order for the single traded asset.
///
/// `quantity` is signed: positive buys, negative sells. `price` is the
/// reference price used for sizing (the bar close).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub quantity: f64,
    pub price: f64,
}

impl Order {
    pub fn new(quantity: f64, price: f64) -> Self {
        Self { quantity, price }
    }

    pub fn is_buy(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn is_sell(&self) -> bool {
        self.quantity < 0.0
    }

    /// A zero-quantity order leaves the ledger untouched when executed.
    pub fn is_noop(&self) -> bool {
        self.quantity == 0.0
    }
}
