//! Replay engine: bar-by-bar loop plus the contracts around it.
//!
//! The engine pulls bars from a data source and, for each bar, runs:
//!
//! 1. Contract check (finite close, strictly increasing date)
//! 2. Signal generation
//! 3. Order sizing against the ledger
//! 4. Execution at the close
//! 5. Valuation record
//!
//! After the last bar the history is handed to every registered reporter.

pub mod contract;
pub mod loop_runner;
pub mod report;
pub mod state;

pub use contract::{BarContract, ContractViolation};
pub use loop_runner::{ReplayEngine, ReplayError};
pub use report::{HistoryCapture, ReportError, Reporter};
pub use state::{ReplayOutcome, ReplayState};
