//! Data contract checks applied to every bar before it reaches the strategy.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Bar;

/// A bar that breaks the data source contract. Always fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("bar {date} has no usable close price (got {close})")]
    MissingClose { date: NaiveDate, close: f64 },

    #[error("bar dated {date} does not follow previous bar dated {previous}")]
    NonMonotonicDate {
        previous: NaiveDate,
        date: NaiveDate,
    },
}

/// Remembers the last accepted date and rejects anything not strictly after it.
#[derive(Debug, Clone, Default)]
pub struct BarContract {
    last_date: Option<NaiveDate>,
}

impl BarContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `bar` and, if it passes, record its date.
    pub fn check(&mut self, bar: &Bar) -> Result<(), ContractViolation> {
        if bar.is_void() {
            return Err(ContractViolation::MissingClose {
                date: bar.date,
                close: bar.close,
            });
        }
        if let Some(previous) = self.last_date {
            if bar.date <= previous {
                return Err(ContractViolation::NonMonotonicDate {
                    previous,
                    date: bar.date,
                });
            }
        }
        self.last_date = Some(bar.date);
        Ok(())
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }
}
