//! Bar loading for the runner.
//!
//! `CsvSource` reads a single-asset price file and yields bars in ascending
//! date order. When no file exists, [`generate_sine_bars`] produces a
//! reproducible synthetic series that [`write_bars_csv`] can persist.

use std::path::{Path, PathBuf};

use barlab_core::data::{BarStream, DataError, DataSource, DateRange};
use barlab_core::domain::Bar;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};

/// CSV-backed data source.
///
/// Requires the date column and a `close` column; `open`, `high`, `low`,
/// `volume` and `symbol` are picked up when present. Header matching is
/// case-insensitive. Rows outside the requested range are dropped and the
/// remainder is sorted by date before it is yielded.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    date_column: String,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            date_column: "date".into(),
        }
    }

    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = column.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, filter and sort every row of the file.
    pub fn read_bars(&self, range: &DateRange) -> Result<Vec<Bar>, DataError> {
        if !self.path.exists() {
            return Err(DataError::NotFound(self.path.display().to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(csv_error)?;

        let headers = reader.headers().map_err(csv_error)?.clone();
        let columns = Columns::resolve(&headers, &self.date_column)?;

        let mut bars = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            // Header is line 1.
            let row = i + 2;
            let bar = columns.parse_row(&record, row)?;
            if range.contains(bar.date) {
                bars.push(bar);
            }
        }

        bars.sort_by_key(|bar| bar.date);
        tracing::debug!(path = %self.path.display(), bars = bars.len(), "loaded csv");
        Ok(bars)
    }
}

impl DataSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self, range: &DateRange) -> Result<BarStream<'_>, DataError> {
        let bars = self.read_bars(range)?;
        Ok(Box::new(bars.into_iter().map(Ok)))
    }
}

// ─── Column resolution ──────────────────────────────────────────────

#[derive(Debug)]
struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
    symbol: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, date_column: &str) -> Result<Self, DataError> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require =
            |name: &str| find(name).ok_or_else(|| DataError::MissingColumn(name.to_string()));

        Ok(Self {
            date: require(date_column)?,
            close: require("close")?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            volume: find("volume"),
            symbol: find("symbol"),
        })
    }

    fn parse_row(&self, record: &csv::StringRecord, row: usize) -> Result<Bar, DataError> {
        let raw_date = record.get(self.date).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| DataError::Parse {
            row,
            field: "date".into(),
            value: raw_date.to_string(),
        })?;

        let mut bar = match parse_optional(record, Some(self.close), "close", row)? {
            Some(close) => Bar::new(date, close),
            None => Bar::void(date),
        };

        bar.open = parse_optional(record, self.open, "open", row)?;
        bar.high = parse_optional(record, self.high, "high", row)?;
        bar.low = parse_optional(record, self.low, "low", row)?;
        bar.volume = parse_optional(record, self.volume, "volume", row)?;
        bar.symbol = self
            .symbol
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase);

        Ok(bar)
    }
}

/// Empty or absent cells are `None`; anything else must parse as a number.
fn parse_optional(
    record: &csv::StringRecord,
    column: Option<usize>,
    field: &str,
    row: usize,
) -> Result<Option<f64>, DataError> {
    let Some(raw) = column.and_then(|i| record.get(i)) else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some).map_err(|_| DataError::Parse {
        row,
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

fn csv_error(err: csv::Error) -> DataError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io) = err.into_kind() {
            return DataError::Io(io);
        }
        return DataError::Other("csv I/O error".into());
    }
    DataError::Other(err.to_string())
}

// ─── Synthetic data ─────────────────────────────────────────────────

/// Reproducible weekday-only sine-drift series starting at 100.0.
///
/// Walks `days` calendar days from `start`. On each weekday the price is
/// multiplied by `1 + 0.001 * sin(i / 20) + U(-0.003, 0.003)`, where `i` is
/// the calendar-day index, and the close is rounded to four decimals.
pub fn generate_sine_bars(start: NaiveDate, days: usize, seed: u64) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 100.0_f64;
    let mut bars = Vec::new();

    for i in 0..days {
        let date = start + chrono::Duration::days(i as i64);
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }
        let noise: f64 = rng.gen_range(-0.003..0.003);
        price *= 1.0 + 0.001 * (i as f64 / 20.0).sin() + noise;
        bars.push(Bar::new(date, (price * 10_000.0).round() / 10_000.0));
    }

    bars
}

/// Write `date,close` rows, creating parent directories as needed.
pub fn write_bars_csv(path: &Path, bars: &[Bar]) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(["date", "close"]).map_err(csv_error)?;
    for bar in bars {
        writer
            .write_record([bar.date.format("%Y-%m-%d").to_string(), bar.close.to_string()])
            .map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// BLAKE3 hash over dates and closes, for tagging results with their input.
pub fn dataset_hash<'a>(bars: impl IntoIterator<Item = &'a Bar>) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.close.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2024-01-02"), Some(d(2024, 1, 2)));
        assert_eq!(parse_date("2024-01-02 16:00:00"), Some(d(2024, 1, 2)));
        assert_eq!(parse_date("2024-01-02T16:00:00"), Some(d(2024, 1, 2)));
        assert_eq!(parse_date("2024-01-02T16:00:00+00:00"), Some(d(2024, 1, 2)));
        assert_eq!(parse_date("01/02/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn synthetic_data_is_deterministic() {
        let a = generate_sine_bars(d(2015, 1, 1), 120, 7);
        let b = generate_sine_bars(d(2015, 1, 1), 120, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_give_different_series() {
        let a = generate_sine_bars(d(2015, 1, 1), 30, 1);
        let b = generate_sine_bars(d(2015, 1, 1), 30, 2);
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
    }

    #[test]
    fn synthetic_data_skips_weekends() {
        // 2024-01-01 is a Monday; two full weeks.
        let bars = generate_sine_bars(d(2024, 1, 1), 14, 0);
        assert_eq!(bars.len(), 10);
        assert!(bars
            .iter()
            .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn synthetic_closes_are_rounded_and_near_start() {
        let bars = generate_sine_bars(d(2024, 1, 1), 10, 3);
        for bar in &bars {
            let scaled = bar.close * 10_000.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
        }
        // Each step moves at most 0.4%.
        assert!((bars[0].close - 100.0).abs() <= 0.5);
    }

    #[test]
    fn dataset_hash_tracks_content() {
        let bars = generate_sine_bars(d(2024, 1, 1), 20, 3);
        assert_eq!(dataset_hash(&bars), dataset_hash(&bars.clone()));
        let mut changed = bars.clone();
        changed[0].close += 1.0;
        assert_ne!(dataset_hash(&bars), dataset_hash(&changed));
    }
}
