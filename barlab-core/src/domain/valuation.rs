//! Valuation records: the audit trail handed to reporters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Snapshot of the ledger after one bar has been fully processed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub date: NaiveDate,
    pub price: f64,
    pub cash: f64,
    pub quantity: f64,
    pub value: f64,
}
