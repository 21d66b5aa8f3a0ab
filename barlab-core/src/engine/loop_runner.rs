//! Bar-by-bar replay loop for a single strategy and ledger.
//!
//! For every bar, in delivery order:
//! 1. Contract check: finite close, date strictly after the previous bar
//! 2. Signal: strategy consumes the bar and returns a target weight
//! 3. Orders: ledger sizes the rebalance order
//! 4. Execution: ledger fills the order at the close and applies it
//! 5. Update: ledger appends the post-trade valuation record
//!
//! When the source is exhausted the engine moves to `Done` and hands the
//! history to every reporter. Any error aborts the run; nothing is retried
//! or rolled back.

use thiserror::Error;

use crate::components::execution::{CloseFill, FillModel};
use crate::components::signal::{Signal, SignalGenerator};
use crate::data::{DataError, DataSource, DateRange};
use crate::domain::{Bar, Portfolio, Valuation};
use crate::sizers::{Sizer, TargetWeightSizer};

use super::contract::{BarContract, ContractViolation};
use super::report::{ReportError, Reporter};
use super::state::{ReplayOutcome, ReplayState};

/// Errors that abort a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("data contract violation: {0}")]
    Contract(#[from] ContractViolation),

    #[error("data source error: {0}")]
    Source(#[from] DataError),

    #[error("reporting error: {0}")]
    Report(#[from] ReportError),

    #[error("replay already finished; build a new engine for another run")]
    AlreadyDone,
}

/// Sequential replay of one strategy against one portfolio.
///
/// The engine owns both the strategy and the ledger for the whole run; no
/// other code can mutate them while bars are being processed.
#[derive(Debug)]
pub struct ReplayEngine<G, S = TargetWeightSizer, F = CloseFill> {
    strategy: G,
    portfolio: Portfolio<S, F>,
    contract: BarContract,
    state: ReplayState,
    bar_count: usize,
}

impl<G: SignalGenerator> ReplayEngine<G> {
    /// Engine with a fresh all-cash portfolio using the default sizer and fill model.
    pub fn new(strategy: G, initial_cash: f64) -> Self {
        Self::with_portfolio(strategy, Portfolio::new(initial_cash))
    }
}

impl<G, S, F> ReplayEngine<G, S, F>
where
    G: SignalGenerator,
    S: Sizer,
    F: FillModel,
{
    pub fn with_portfolio(strategy: G, portfolio: Portfolio<S, F>) -> Self {
        Self {
            strategy,
            portfolio,
            contract: BarContract::new(),
            state: ReplayState::Running,
            bar_count: 0,
        }
    }

    /// Process a single bar through signal -> orders -> execution -> update.
    ///
    /// Returns the signal the strategy emitted for this bar.
    pub fn step(&mut self, bar: &Bar) -> Result<Signal, ReplayError> {
        if self.state.is_done() {
            return Err(ReplayError::AlreadyDone);
        }
        self.contract.check(bar)?;

        let signal = self.strategy.on_bar(bar);
        let orders = self.portfolio.generate_orders(signal, bar);
        let fills = self.portfolio.execute_orders(&orders, bar);
        self.portfolio.update(&fills, bar);

        self.bar_count += 1;
        Ok(signal)
    }

    /// Replay every bar from `bars`, then finish and report.
    ///
    /// On the first error the engine moves to `Done` without invoking any
    /// reporter. The history recorded up to the failing bar stays readable
    /// through [`history`](Self::history) but is not a complete backtest.
    pub fn run<I>(
        &mut self,
        bars: I,
        reporters: &mut [&mut dyn Reporter],
    ) -> Result<ReplayOutcome, ReplayError>
    where
        I: IntoIterator<Item = Result<Bar, DataError>>,
    {
        if self.state.is_done() {
            return Err(ReplayError::AlreadyDone);
        }

        tracing::info!(
            strategy = self.strategy.name(),
            sizer = self.portfolio.sizer().name(),
            fill_model = self.portfolio.fill_model().name(),
            initial_cash = self.portfolio.initial_cash(),
            "replay started"
        );

        for bar in bars {
            let processed = bar
                .map_err(ReplayError::from)
                .and_then(|bar| self.step(&bar).map(|_| ()));
            if let Err(err) = processed {
                tracing::error!(bars = self.bar_count, error = %err, "replay aborted");
                self.state = ReplayState::Done;
                return Err(err);
            }
        }

        self.finish(reporters)
    }

    /// Load bars in `range` from `source` and replay them.
    pub fn run_source(
        &mut self,
        source: &dyn DataSource,
        range: &DateRange,
        reporters: &mut [&mut dyn Reporter],
    ) -> Result<ReplayOutcome, ReplayError> {
        let bars = source.load(range)?;
        self.run(bars, reporters)
    }

    /// Mark the replay `Done` and deliver the history to each reporter in order.
    pub fn finish(
        &mut self,
        reporters: &mut [&mut dyn Reporter],
    ) -> Result<ReplayOutcome, ReplayError> {
        if self.state.is_done() {
            return Err(ReplayError::AlreadyDone);
        }
        self.state = ReplayState::Done;

        let outcome = self.outcome();
        tracing::info!(
            bars = outcome.bar_count,
            final_value = outcome.final_value,
            "replay finished"
        );

        for reporter in reporters.iter_mut() {
            tracing::debug!(reporter = reporter.name(), "delivering history");
            reporter.generate(self.portfolio.history())?;
        }

        Ok(outcome)
    }

    pub fn outcome(&self) -> ReplayOutcome {
        ReplayOutcome {
            bar_count: self.bar_count,
            final_cash: self.portfolio.cash(),
            final_quantity: self.portfolio.quantity(),
            final_value: self.portfolio.total_value(),
        }
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    pub fn history(&self) -> &[Valuation] {
        self.portfolio.history()
    }

    pub fn portfolio(&self) -> &Portfolio<S, F> {
        &self.portfolio
    }

    pub fn strategy(&self) -> &G {
        &self.strategy
    }

    pub fn into_parts(self) -> (G, Portfolio<S, F>) {
        (self.strategy, self.portfolio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::signal::MaCrossover;
    use crate::engine::report::HistoryCapture;
    use chrono::NaiveDate;

    struct FixedWeight(f64);

    impl SignalGenerator for FixedWeight {
        fn name(&self) -> &str {
            "fixed_weight"
        }

        fn warmup_bars(&self) -> usize {
            0
        }

        fn on_bar(&mut self, _bar: &Bar) -> Signal {
            Signal::new(self.0)
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn ok_bars(closes: &[f64]) -> Vec<Result<Bar, DataError>> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Ok(Bar::new(d(i as u32 + 1), c)))
            .collect()
    }

    #[test]
    fn one_record_per_bar_in_order() {
        let mut engine = ReplayEngine::new(FixedWeight(1.0), 1000.0);
        let mut capture = HistoryCapture::default();
        let outcome = engine
            .run(ok_bars(&[10.0, 11.0, 12.0]), &mut [&mut capture])
            .unwrap();

        assert_eq!(outcome.bar_count, 3);
        assert_eq!(engine.state(), ReplayState::Done);
        assert_eq!(capture.calls, 1);
        assert_eq!(capture.history.len(), 3);
        let dates: Vec<_> = capture.history.iter().map(|v| v.date).collect();
        assert_eq!(dates, vec![d(1), d(2), d(3)]);
        assert_eq!(capture.history, engine.history());
    }

    #[test]
    fn default_engine_uses_target_weight_sizing_and_close_fills() {
        let engine = ReplayEngine::new(FixedWeight(0.5), 1000.0);
        assert_eq!(engine.portfolio().sizer().name(), "target_weight");
        assert_eq!(engine.portfolio().fill_model().name(), "close");
        assert_eq!(engine.strategy().name(), "fixed_weight");
    }

    #[test]
    fn fully_invested_tracks_price() {
        let mut engine = ReplayEngine::new(FixedWeight(1.0), 1000.0);
        let outcome = engine.run(ok_bars(&[10.0, 20.0]), &mut []).unwrap();
        // 100 shares bought at 10, marked at 20.
        assert_eq!(outcome.final_quantity, 100.0);
        assert_eq!(outcome.final_value, Some(2000.0));
    }

    #[test]
    fn every_reporter_receives_history() {
        let mut engine = ReplayEngine::new(MaCrossover::new(2, 3).unwrap(), 1000.0);
        let mut first = HistoryCapture::default();
        let mut second = HistoryCapture::default();
        engine
            .run(ok_bars(&[100.0, 101.0, 102.0, 101.0]), &mut [&mut first, &mut second])
            .unwrap();
        assert_eq!(first.history, second.history);
        assert_eq!(first.history.len(), 4);
    }

    #[test]
    fn non_monotonic_date_aborts_without_reporting() {
        let mut engine = ReplayEngine::new(FixedWeight(0.0), 1000.0);
        let mut capture = HistoryCapture::default();
        let bars = vec![
            Ok(Bar::new(d(2), 10.0)),
            Ok(Bar::new(d(3), 10.0)),
            Ok(Bar::new(d(3), 10.0)),
            Ok(Bar::new(d(4), 10.0)),
        ];

        let err = engine.run(bars, &mut [&mut capture]).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Contract(ContractViolation::NonMonotonicDate { .. })
        ));
        assert_eq!(capture.calls, 0);
        // Partial history up to the failing bar stays inspectable.
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.state(), ReplayState::Done);
    }

    #[test]
    fn void_bar_aborts() {
        let mut engine = ReplayEngine::new(FixedWeight(1.0), 1000.0);
        let bars = vec![Ok(Bar::new(d(1), 10.0)), Ok(Bar::void(d(2)))];
        let err = engine.run(bars, &mut []).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Contract(ContractViolation::MissingClose { .. })
        ));
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn source_error_propagates() {
        let mut engine = ReplayEngine::new(FixedWeight(1.0), 1000.0);
        let bars = vec![
            Ok(Bar::new(d(1), 10.0)),
            Err(DataError::Other("disk on fire".into())),
        ];
        let err = engine.run(bars, &mut []).unwrap_err();
        assert!(matches!(err, ReplayError::Source(DataError::Other(_))));
    }

    #[test]
    fn done_engine_rejects_further_work() {
        let mut engine = ReplayEngine::new(FixedWeight(1.0), 1000.0);
        engine.run(ok_bars(&[10.0]), &mut []).unwrap();

        assert!(matches!(
            engine.step(&Bar::new(d(9), 10.0)),
            Err(ReplayError::AlreadyDone)
        ));
        assert!(matches!(
            engine.run(ok_bars(&[10.0]), &mut []),
            Err(ReplayError::AlreadyDone)
        ));
        assert!(matches!(engine.finish(&mut []), Err(ReplayError::AlreadyDone)));
    }

    #[test]
    fn empty_source_reports_empty_history() {
        let mut engine = ReplayEngine::new(FixedWeight(1.0), 1000.0);
        let mut capture = HistoryCapture::default();
        let outcome = engine.run(Vec::new(), &mut [&mut capture]).unwrap();
        assert_eq!(outcome.bar_count, 0);
        assert_eq!(outcome.final_value, None);
        assert_eq!(outcome.final_cash, 1000.0);
        assert_eq!(capture.calls, 1);
        assert!(capture.history.is_empty());
    }

    #[test]
    fn step_returns_emitted_signal() {
        let mut engine = ReplayEngine::new(MaCrossover::new(2, 3).unwrap(), 1000.0);
        let weights: Vec<f64> = [100.0, 101.0, 102.0, 101.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                engine
                    .step(&Bar::new(d(i as u32 + 1), c))
                    .unwrap()
                    .target_weight
            })
            .collect();
        assert_eq!(weights, vec![0.0, 0.0, 1.0, 1.0]);
    }
}
