//! Data source trait and structured error types.
//!
//! The DataSource trait abstracts over where bars come from (CSV file,
//! in-memory series, synthetic generator) so the replay engine never touches
//! I/O directly and tests can feed bars by hand.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Bar;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data file not found: {0}")]
    NotFound(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: cannot parse {field} value '{value}'")]
    Parse {
        row: usize,
        field: String,
        value: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Other(String),
}

/// Inclusive date window. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// No bounds: every bar is in range.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Lazy, finite, single-pass stream of bars in ascending date order.
pub type BarStream<'a> = Box<dyn Iterator<Item = Result<Bar, DataError>> + 'a>;

/// Trait for data sources (CSV import, in-memory series, etc).
pub trait DataSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Open a stream of bars within `range`, ascending by date.
    ///
    /// Implementations must deliver strictly increasing dates; the replay
    /// engine does not re-sort and rejects any bar that breaks the order.
    fn load(&self, range: &DateRange) -> Result<BarStream<'_>, DataError>;
}

/// In-memory bar series, filtered by range on load.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    bars: Vec<Bar>,
}

impl VecSource {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    /// Close-only bars on consecutive calendar days from `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Self {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar::new(start + chrono::Duration::days(i as i64), close))
            .collect();
        Self::new(bars)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }
}

impl DataSource for VecSource {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, range: &DateRange) -> Result<BarStream<'_>, DataError> {
        let range = *range;
        Ok(Box::new(
            self.bars
                .iter()
                .filter(move |bar| range.contains(bar.date))
                .cloned()
                .map(Ok),
        ))
    }
}
