//! Close fill model: every order fills in full at the bar's close.

use crate::domain::{Bar, Fill, Order};

use super::FillModel;

/// Market order filled at the close of the bar it was sized on.
/// No slippage, no partial fills, no rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloseFill;

impl FillModel for CloseFill {
    fn name(&self) -> &str {
        "close"
    }

    fn fill(&self, order: &Order, bar: &Bar) -> Fill {
        Fill::new(order.quantity, bar.close)
    }
}
