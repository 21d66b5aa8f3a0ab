//! Reporter contract: receives the full valuation history once the replay is done.

use thiserror::Error;

use crate::domain::Valuation;

/// Errors raised while producing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report '{reporter}' failed: {reason}")]
    Failed { reporter: String, reason: String },
}

impl ReportError {
    pub fn failed(reporter: impl Into<String>, reason: impl ToString) -> Self {
        Self::Failed {
            reporter: reporter.into(),
            reason: reason.to_string(),
        }
    }
}

/// Trait for reporters (equity CSV, JSON summary, in-memory capture, ...).
pub trait Reporter {
    /// Human-readable name of this reporter.
    fn name(&self) -> &str;

    /// Consume the ordered valuation history of a completed replay.
    fn generate(&mut self, history: &[Valuation]) -> Result<(), ReportError>;
}

/// Keeps a copy of the delivered history. Handy in tests and for callers that
/// post-process results in memory.
#[derive(Debug, Clone, Default)]
pub struct HistoryCapture {
    pub history: Vec<Valuation>,
    pub calls: usize,
}

impl Reporter for HistoryCapture {
    fn name(&self) -> &str {
        "capture"
    }

    fn generate(&mut self, history: &[Valuation]) -> Result<(), ReportError> {
        self.history = history.to_vec();
        self.calls += 1;
        Ok(())
    }
}
