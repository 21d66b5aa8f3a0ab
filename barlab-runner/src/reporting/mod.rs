//! Reporters that turn the valuation history into files.

pub mod equity;
pub mod summary;

pub use equity::EquityCsvReporter;
pub use summary::{SummaryDocument, SummaryReporter};
