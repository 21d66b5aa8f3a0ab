//! Execution model: determines how orders get filled.
//!
//! Fills are immediate and complete. The model only decides the fill price;
//! applying the fill to cash and position is the ledger's job.

pub mod close_fill;

pub use close_fill::CloseFill;

use crate::domain::{Bar, Fill, Order};

/// Trait for fill models.
pub trait FillModel: Send + Sync {
    /// Human-readable name (e.g., "close").
    fn name(&self) -> &str;

    /// Realize `order` against `bar`.
    fn fill(&self, order: &Order, bar: &Bar) -> Fill;

    /// Fill a batch of orders in submission order.
    fn fill_all(&self, orders: &[Order], bar: &Bar) -> Vec<Fill> {
        orders.iter().map(|order| self.fill(order, bar)).collect()
    }
}
