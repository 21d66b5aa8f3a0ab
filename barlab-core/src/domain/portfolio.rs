//! Portfolio ledger: cash, position quantity and the valuation history.

use crate::components::execution::{CloseFill, FillModel};
use crate::components::signal::Signal;
use crate::sizers::{Sizer, TargetWeightSizer};

use super::bar::Bar;
use super::fill::Fill;
use super::order::Order;
use super::valuation::Valuation;

/// Single-asset ledger.
///
/// Mutated only through the three per-bar calls, in this order:
/// [`generate_orders`](Self::generate_orders) (pure),
/// [`execute_orders`](Self::execute_orders) (applies fills to cash and
/// quantity) and [`update`](Self::update) (appends one valuation record).
///
/// After every fill `cash' = cash - qty * price` and `quantity' = quantity + qty`,
/// so a trade at a single price never changes `cash + quantity * price`.
#[derive(Debug, Clone)]
pub struct Portfolio<S = TargetWeightSizer, F = CloseFill> {
    cash: f64,
    initial_cash: f64,
    quantity: f64,
    last_price: Option<f64>,
    history: Vec<Valuation>,
    sizer: S,
    fill_model: F,
}

impl Portfolio {
    /// Ledger with the target-weight sizer and fills at the bar close.
    pub fn new(initial_cash: f64) -> Self {
        Self::with_models(initial_cash, TargetWeightSizer, CloseFill)
    }
}

impl<S: Sizer, F: FillModel> Portfolio<S, F> {
    pub fn with_models(initial_cash: f64, sizer: S, fill_model: F) -> Self {
        Self {
            cash: initial_cash,
            initial_cash,
            quantity: 0.0,
            last_price: None,
            history: Vec::new(),
            sizer,
            fill_model,
        }
    }

    /// Translate a signal into orders for this bar. Does not touch the ledger.
    pub fn generate_orders(&self, signal: Signal, bar: &Bar) -> Vec<Order> {
        vec![self.sizer.size(signal, self.cash, self.quantity, bar)]
    }

    /// Fill every order and apply it to cash and position immediately.
    pub fn execute_orders(&mut self, orders: &[Order], bar: &Bar) -> Vec<Fill> {
        let mut fills = Vec::with_capacity(orders.len());
        for order in orders {
            let fill = self.fill_model.fill(order, bar);
            self.apply_fill(&fill);
            if fill.quantity != 0.0 {
                tracing::debug!(
                    date = %bar.date,
                    quantity = fill.quantity,
                    price = fill.price,
                    cash = self.cash,
                    position = self.quantity,
                    "fill applied"
                );
            }
            fills.push(fill);
        }
        fills
    }

    /// Mark to the bar close and append the valuation record.
    ///
    /// The fills were already applied by `execute_orders`; they are accepted
    /// here only so the call sequence reads bar -> orders -> fills -> update.
    pub fn update(&mut self, _fills: &[Fill], bar: &Bar) {
        self.last_price = Some(bar.close);
        let value = self.value_at(bar.close);
        self.history.push(Valuation {
            date: bar.date,
            price: bar.close,
            cash: self.cash,
            quantity: self.quantity,
            value,
        });
    }

    fn apply_fill(&mut self, fill: &Fill) {
        self.cash -= fill.quantity * fill.price;
        self.quantity += fill.quantity;
    }

    /// `cash + quantity * price`.
    pub fn value_at(&self, price: f64) -> f64 {
        self.cash + self.quantity * price
    }

    /// Value at the last close seen by `update`. `None` before the first update.
    pub fn total_value(&self) -> Option<f64> {
        self.last_price.map(|price| self.value_at(price))
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn last_price(&self) -> Option<f64> {
        self.last_price
    }

    /// Append-only valuation history, one record per processed bar.
    pub fn history(&self) -> &[Valuation] {
        &self.history
    }

    pub fn into_history(self) -> Vec<Valuation> {
        self.history
    }

    pub fn sizer(&self) -> &S {
        &self.sizer
    }

    pub fn fill_model(&self) -> &F {
        &self.fill_model
    }
}
