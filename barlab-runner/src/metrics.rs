//! Performance metrics: pure functions over the valuation history.
//!
//! Returns are daily percentage changes of portfolio value with the first
//! bar's return taken as zero. Annualisation assumes 252 trading days;
//! CAGR uses calendar days over 365.25.

use barlab_core::domain::Valuation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trading days per year used for annualisation.
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Headline statistics for one completed backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub start_value: f64,
    pub end_value: f64,
    pub total_return: f64,
    pub cagr: f64,
    pub volatility: f64,
    pub sharpe: f64,
    /// Largest peak-to-trough decline as a negative fraction.
    pub max_drawdown: f64,
    /// Calendar days from the peak preceding the deepest trough to that trough.
    pub max_drawdown_days: i64,
}

impl PerformanceSummary {
    /// Compute every statistic. `None` for an empty history.
    pub fn from_history(history: &[Valuation]) -> Option<Self> {
        let first = history.first()?;
        let last = history.last()?;

        let equity: Vec<f64> = history.iter().map(|v| v.value).collect();
        let returns = daily_returns(&equity);
        let volatility = annualized_volatility(&returns);
        let total = total_return(first.value, last.value);
        let calendar_days = (last.date - first.date).num_days();
        let (max_drawdown, max_drawdown_days) = drawdown(history);

        Some(Self {
            start_date: first.date,
            end_date: last.date,
            bar_count: history.len(),
            start_value: first.value,
            end_value: last.value,
            total_return: total,
            cagr: cagr(total, calendar_days),
            volatility,
            sharpe: sharpe_ratio(&returns, volatility),
            max_drawdown,
            max_drawdown_days,
        })
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// `end / start - 1`. Zero when the starting value is not positive.
pub fn total_return(start_value: f64, end_value: f64) -> f64 {
    if start_value <= 0.0 {
        return 0.0;
    }
    end_value / start_value - 1.0
}

/// Compound annual growth rate over `calendar_days`.
///
/// Years are floored at 1e-9 so a single-bar history does not divide by
/// zero. A total loss (or worse) reports -1.
pub fn cagr(total_return: f64, calendar_days: i64) -> f64 {
    let growth = 1.0 + total_return;
    if growth <= 0.0 {
        return -1.0;
    }
    let years = (calendar_days as f64 / 365.25).max(1e-9);
    growth.powf(1.0 / years) - 1.0
}

/// Annualised sample standard deviation of daily returns.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    std_dev(returns) * PERIODS_PER_YEAR.sqrt()
}

/// `mean(returns) * 252 / volatility`, zero when volatility is zero.
pub fn sharpe_ratio(returns: &[f64], volatility: f64) -> f64 {
    if volatility <= 0.0 {
        return 0.0;
    }
    mean_f64(returns) * PERIODS_PER_YEAR / volatility
}

/// Deepest drawdown and its length in calendar days.
///
/// The trough is the first bar with the lowest `value / running_peak`; the
/// peak is the first bar holding the highest value up to the trough.
/// `(0.0, 0)` for empty, flat or monotonically rising histories.
pub fn drawdown(history: &[Valuation]) -> (f64, i64) {
    let Some(first) = history.first() else {
        return (0.0, 0);
    };

    let mut running_peak = first.value;
    let mut peak_idx = 0;
    let mut worst = 0.0_f64;
    let mut worst_span = (0, 0);

    for (i, v) in history.iter().enumerate() {
        if v.value > running_peak {
            running_peak = v.value;
            peak_idx = i;
        }
        if running_peak > 0.0 {
            let dd = v.value / running_peak - 1.0;
            if dd < worst {
                worst = dd;
                worst_span = (peak_idx, i);
            }
        }
    }

    let (peak, trough) = worst_span;
    let days = (history[trough].date - history[peak].date).num_days();
    (worst, days)
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Daily percentage changes; the first entry is 0.0, as are changes from a
/// non-positive value.
pub fn daily_returns(equity: &[f64]) -> Vec<f64> {
    if equity.is_empty() {
        return Vec::new();
    }
    let mut returns = Vec::with_capacity(equity.len());
    returns.push(0.0);
    returns.extend(equity.windows(2).map(|w| {
        if w[0] > 0.0 {
            w[1] / w[0] - 1.0
        } else {
            0.0
        }
    }));
    returns
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1). Zero for fewer than two values.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
