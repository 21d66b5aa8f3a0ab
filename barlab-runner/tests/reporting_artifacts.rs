//! Integration tests for the equity CSV and JSON summary reporters.

use barlab_core::domain::Valuation;
use barlab_core::engine::Reporter;
use barlab_runner::metrics::PerformanceSummary;
use barlab_runner::reporting::{EquityCsvReporter, SummaryDocument, SummaryReporter};
use chrono::NaiveDate;
use tempfile::TempDir;

fn sample_history() -> Vec<Valuation> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    [(10.0, 500.0, 50.0), (12.0, 1100.0, 0.0), (11.0, 1100.0, 0.0)]
        .iter()
        .enumerate()
        .map(|(i, &(price, cash, quantity))| Valuation {
            date: start + chrono::Duration::days(i as i64),
            price,
            cash,
            quantity,
            value: cash + quantity * price,
        })
        .collect()
}

#[test]
fn equity_csv_has_header_and_one_row_per_record() {
    let dir = TempDir::new().unwrap();
    let mut reporter = EquityCsvReporter::in_dir(&dir.path().join("results"));

    reporter.generate(&sample_history()).unwrap();

    let text = std::fs::read_to_string(reporter.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,price,cash,quantity,value");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "2024-01-02,10.0,500.0,50.0,1000.0");
    assert_eq!(reporter.rows_written(), 3);
}

#[test]
fn equity_csv_rows_deserialize_back() {
    let dir = TempDir::new().unwrap();
    let mut reporter = EquityCsvReporter::new(dir.path().join("equity.csv"));
    let history = sample_history();
    reporter.generate(&history).unwrap();

    let mut reader = csv::Reader::from_path(reporter.path()).unwrap();
    let rows: Vec<Valuation> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(rows, history);
}

#[test]
fn summary_json_contains_statistics_and_paths() {
    let dir = TempDir::new().unwrap();
    let equity_path = dir.path().join("equity.csv");
    let mut reporter = SummaryReporter::in_dir(dir.path(), "abc123", "moving_average")
        .with_dataset_hash("feedbeef")
        .with_equity_path(&equity_path);

    let history = sample_history();
    reporter.generate(&history).unwrap();

    let doc: SummaryDocument =
        serde_json::from_str(&std::fs::read_to_string(reporter.path()).unwrap()).unwrap();
    assert_eq!(doc.run_id, "abc123");
    assert_eq!(doc.strategy, "moving_average");
    assert_eq!(doc.dataset_hash.as_deref(), Some("feedbeef"));
    assert_eq!(doc.equity_path, Some(equity_path));
    assert_eq!(doc.summary_path, dir.path().join("summary.json"));

    let expected = PerformanceSummary::from_history(&history).unwrap();
    assert_eq!(doc.summary.as_ref(), Some(&expected));
    assert_eq!(reporter.summary(), Some(&expected));
    assert!((expected.total_return - 0.1).abs() < 1e-12);
}

#[test]
fn summary_for_empty_history_has_no_statistics() {
    let dir = TempDir::new().unwrap();
    let mut reporter = SummaryReporter::in_dir(dir.path(), "empty", "mean_reversion");
    reporter.generate(&[]).unwrap();

    assert!(reporter.summary().is_none());
    let doc: SummaryDocument =
        serde_json::from_str(&std::fs::read_to_string(reporter.path()).unwrap()).unwrap();
    assert!(doc.summary.is_none());
    assert!(doc.equity_path.is_none());
    assert!(doc.dataset_hash.is_none());
}

#[test]
fn summary_json_floats_read_back_bit_for_bit() {
    let dir = TempDir::new().unwrap();
    let mut reporter = SummaryReporter::in_dir(dir.path(), "bits", "moving_average");
    let history = sample_history();
    reporter.generate(&history).unwrap();

    let written = reporter.summary().unwrap().clone();
    // 0.10000000000000009 parses back one ulp low without exact float parsing.
    assert_eq!(written.total_return, 1100.0 / 1000.0 - 1.0);

    let doc: SummaryDocument =
        serde_json::from_str(&std::fs::read_to_string(reporter.path()).unwrap()).unwrap();
    let read = doc.summary.unwrap();
    for (a, b) in [
        (read.total_return, written.total_return),
        (read.cagr, written.cagr),
        (read.volatility, written.volatility),
        (read.sharpe, written.sharpe),
        (read.max_drawdown, written.max_drawdown),
    ] {
        assert_eq!(a.to_bits(), b.to_bits(), "{a} != {b}");
    }
}
