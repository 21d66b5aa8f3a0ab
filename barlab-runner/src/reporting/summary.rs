//! JSON run summary: headline statistics plus where the artifacts went.

use std::path::{Path, PathBuf};

use barlab_core::domain::Valuation;
use barlab_core::engine::{ReportError, Reporter};
use serde::{Deserialize, Serialize};

use crate::metrics::PerformanceSummary;

/// On-disk shape of `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    pub run_id: String,
    pub strategy: String,
    /// BLAKE3 of the replayed dates and closes.
    pub dataset_hash: Option<String>,
    /// `None` when the replay produced no bars.
    pub summary: Option<PerformanceSummary>,
    pub equity_path: Option<PathBuf>,
    pub summary_path: PathBuf,
}

/// Computes a [`PerformanceSummary`] and writes it as pretty JSON.
#[derive(Debug, Clone)]
pub struct SummaryReporter {
    path: PathBuf,
    run_id: String,
    strategy: String,
    dataset_hash: Option<String>,
    equity_path: Option<PathBuf>,
    summary: Option<PerformanceSummary>,
}

impl SummaryReporter {
    pub fn new(
        path: impl Into<PathBuf>,
        run_id: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            run_id: run_id.into(),
            strategy: strategy.into(),
            dataset_hash: None,
            equity_path: None,
            summary: None,
        }
    }

    /// `summary.json` inside `dir`.
    pub fn in_dir(dir: &Path, run_id: impl Into<String>, strategy: impl Into<String>) -> Self {
        Self::new(dir.join("summary.json"), run_id, strategy)
    }

    /// Record the equity CSV location in the document.
    pub fn with_equity_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.equity_path = Some(path.into());
        self
    }

    pub fn with_dataset_hash(mut self, hash: impl Into<String>) -> Self {
        self.dataset_hash = Some(hash.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Summary computed by the last `generate` call.
    pub fn summary(&self) -> Option<&PerformanceSummary> {
        self.summary.as_ref()
    }

    pub fn into_summary(self) -> Option<PerformanceSummary> {
        self.summary
    }

    fn document(&self) -> SummaryDocument {
        SummaryDocument {
            run_id: self.run_id.clone(),
            strategy: self.strategy.clone(),
            dataset_hash: self.dataset_hash.clone(),
            summary: self.summary.clone(),
            equity_path: self.equity_path.clone(),
            summary_path: self.path.clone(),
        }
    }
}

impl Reporter for SummaryReporter {
    fn name(&self) -> &str {
        "summary_json"
    }

    fn generate(&mut self, history: &[Valuation]) -> Result<(), ReportError> {
        self.summary = PerformanceSummary::from_history(history);
        if self.summary.is_none() {
            tracing::warn!("no bars were replayed; summary has no statistics");
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.document())
            .map_err(|e| ReportError::failed("summary_json", e))?;
        std::fs::write(&self.path, json)?;

        tracing::info!(path = %self.path.display(), "wrote summary");
        Ok(())
    }
}
