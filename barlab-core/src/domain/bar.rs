//! Bar: the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation of the traded asset.
///
/// Only `date` and `close` are read by the engine. The remaining OHLCV fields
/// are carried through for collaborators that want them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Bar {
    /// Close-only bar, the minimum the engine needs.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            open: None,
            high: None,
            low: None,
            volume: None,
            symbol: None,
        }
    }

    /// Bar whose close is missing. The data layer produces these for rows
    /// without a close; the replay engine refuses them.
    pub fn void(date: NaiveDate) -> Self {
        Self::new(date, f64::NAN)
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_ohlv(mut self, open: f64, high: f64, low: f64, volume: f64) -> Self {
        self.open = Some(open);
        self.high = Some(high);
        self.low = Some(low);
        self.volume = Some(volume);
        self
    }

    /// Returns true if the close is NaN or infinite (void bar).
    pub fn is_void(&self) -> bool {
        !self.close.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 103.0)
            .with_symbol("SPY")
            .with_ohlv(100.0, 105.0, 98.0, 50_000.0)
    }

    #[test]
    fn bar_is_not_void() {
        assert!(!sample_bar().is_void());
    }

    #[test]
    fn bar_detects_void() {
        let bar = Bar::void(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(bar.is_void());

        let mut inf = sample_bar();
        inf.close = f64::INFINITY;
        assert!(inf.is_void());
    }

    #[test]
    fn zero_close_is_not_void() {
        let bar = Bar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 0.0);
        assert!(!bar.is_void());
    }

    #[test]
    fn close_only_bar_serializes_without_optional_fields() {
        let bar = Bar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 10.0);
        let json = serde_json::to_string(&bar).unwrap();
        assert_eq!(json, r#"{"date":"2024-01-02","close":10.0}"#);

        let full = sample_bar();
        let deser: Bar = serde_json::from_str(&serde_json::to_string(&full).unwrap()).unwrap();
        assert_eq!(deser, full);
    }
}
