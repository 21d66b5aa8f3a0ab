//! Equity curve export (CSV).

use std::path::{Path, PathBuf};

use barlab_core::domain::Valuation;
use barlab_core::engine::{ReportError, Reporter};

/// Writes one `date,price,cash,quantity,value` row per valuation record.
#[derive(Debug, Clone)]
pub struct EquityCsvReporter {
    path: PathBuf,
    rows_written: usize,
}

impl EquityCsvReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rows_written: 0,
        }
    }

    /// `equity.csv` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("equity.csv"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

impl Reporter for EquityCsvReporter {
    fn name(&self) -> &str {
        "equity_csv"
    }

    fn generate(&mut self, history: &[Valuation]) -> Result<(), ReportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|e| ReportError::failed("equity_csv", e))?;
        for record in history {
            writer
                .serialize(record)
                .map_err(|e| ReportError::failed("equity_csv", e))?;
        }
        writer.flush()?;

        self.rows_written = history.len();
        tracing::info!(path = %self.path.display(), rows = history.len(), "wrote equity curve");
        Ok(())
    }
}
