//! Replay lifecycle state and run outcome types.

use serde::{Deserialize, Serialize};

/// Lifecycle of a replay engine. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayState {
    /// Accepting bars.
    Running,
    /// Source exhausted (or the run aborted); no further bars accepted.
    Done,
}

impl ReplayState {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Summary of a completed replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    /// Total number of bars processed.
    pub bar_count: usize,
    /// Cash at the end of the run.
    pub final_cash: f64,
    /// Position quantity at the end of the run.
    pub final_quantity: f64,
    /// Portfolio value at the last close (None if no bars were processed).
    pub final_value: Option<f64>,
}
