use serde::{Deserialize, Serialize};

/// Realized result of simulated execution. Always a full fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub quantity: f64,
    pub price: f64,
}

impl Fill {
    pub fn new(quantity: f64, price: f64) -> Self {
        Self { quantity, price }
    }

    /// Signed cash consumed by the fill (negative for sells).
    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }
}
