//! Data source contract consumed by the replay engine

pub mod provider;

pub use provider::{BarStream, DataError, DataSource, DateRange, VecSource};
