//! Fetch-to-report pipeline tests over in-process providers.

use chrono::{Datelike, NaiveDate};
use excorr_core::analytics::ComparisonReport;
use excorr_core::data::{
    DataError, DataProvider, FetchError, FetchProgress, FetchResult, RetryPolicy,
    RetryingFetcher, SyntheticProvider,
};
use excorr_core::domain::MarketIndex;
use std::sync::Mutex;

// ── Helpers ──────────────────────────────────────────────────────────

/// Serves synthetic data, but every request for `broken` fails transiently.
struct PartlyDownProvider {
    inner: SyntheticProvider,
    broken: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl PartlyDownProvider {
    fn healthy() -> Self {
        Self {
            inner: SyntheticProvider::new(),
            broken: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_broken(ticker: &str) -> Self {
        Self {
            broken: Some(ticker.to_string()),
            ..Self::healthy()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl DataProvider for PartlyDownProvider {
    fn name(&self) -> &str {
        "partly-down"
    }

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        self.calls.lock().unwrap().push(ticker.to_string());
        if self.broken.as_deref() == Some(ticker) {
            return Err(DataError::SourceUnavailable { status: 503 });
        }
        self.inner.fetch(ticker, start, end)
    }
}

#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl FetchProgress for RecordingProgress {
    fn on_start(&self, index: MarketIndex, position: usize, total: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {index} {}/{total}", position + 1));
    }

    fn on_attempt_failed(&self, index: MarketIndex, attempt: u32, max_attempts: u32, _error: &DataError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("retry {index} {attempt}/{max_attempts}"));
    }

    fn on_complete(&self, index: MarketIndex, _position: usize, _total: usize, _observations: usize) {
        self.events.lock().unwrap().push(format!("done {index}"));
    }
}

// ── Stacking ─────────────────────────────────────────────────────────

#[test]
fn rows_follow_enumeration_order_not_request_order() {
    let provider = PartlyDownProvider::healthy();
    let fetcher = RetryingFetcher::new(&provider, RetryPolicy::default());

    let table = fetcher
        .fetch_stacked_monthly_returns(&[MarketIndex::Hsi, MarketIndex::Gspc, MarketIndex::Hsi, MarketIndex::N225])
        .unwrap();

    assert_eq!(
        table.indices(),
        vec![MarketIndex::Gspc, MarketIndex::N225, MarketIndex::Hsi]
    );
    assert_eq!(provider.calls(), vec!["^GSPC", "^N225", "^HSI"]);
}

#[test]
fn full_window_gives_121_months_and_ten_trend_years() {
    let provider = PartlyDownProvider::healthy();
    let fetcher = RetryingFetcher::new(&provider, RetryPolicy::default());
    let table = fetcher.fetch_stacked_monthly_returns(&MarketIndex::ALL).unwrap();

    // November 2007 through November 2017
    assert_eq!(table.row_count(), 5);
    assert_eq!(table.column_count(), 121);
    assert_eq!(table.dates()[0], NaiveDate::from_ymd_opt(2007, 11, 30).unwrap());
    assert_eq!(*table.dates().last().unwrap(), NaiveDate::from_ymd_opt(2017, 11, 30).unwrap());

    for (_, row) in table.rows() {
        assert!(row[0].is_nan());
        assert!(row[1..].iter().all(|r| r.is_finite()));
    }

    let report = ComparisonReport::build(&table, MarketIndex::Gspc).unwrap();
    assert_eq!(report.comparisons.len(), 4);
    assert_eq!(report.trend_years(), (2008..=2017).collect::<Vec<_>>());
    for comparison in &report.comparisons {
        assert_eq!(comparison.scatter.len(), 120);
        assert!(comparison.coefficient > 0.0 && comparison.coefficient < 1.0);
        assert!(comparison.trend.ensure_defined().is_ok());
        // 2008 through 2016 are full years; 2017 runs to November
        assert_eq!(comparison.trend.observations()[0], 12);
        assert_eq!(*comparison.trend.observations().last().unwrap(), 11);
    }
}

#[test]
fn table_hash_is_stable_across_runs() {
    let provider = PartlyDownProvider::healthy();
    let fetcher = RetryingFetcher::new(&provider, RetryPolicy::default());
    let a = fetcher.fetch_stacked_monthly_returns(&MarketIndex::ALL).unwrap();
    let b = fetcher.fetch_stacked_monthly_returns(&MarketIndex::ALL).unwrap();
    assert_eq!(a.dataset_hash(), b.dataset_hash());
}

// ── Failure handling ─────────────────────────────────────────────────

#[test]
fn exhausted_index_aborts_without_partial_table() {
    let provider = PartlyDownProvider::with_broken("^N225");
    let progress = RecordingProgress::default();
    let fetcher = RetryingFetcher::new(&provider, RetryPolicy::default()).with_progress(&progress);

    let err = fetcher
        .fetch_stacked_monthly_returns(&MarketIndex::ALL)
        .unwrap_err();

    match err {
        FetchError::Exhausted { index, attempts, .. } => {
            assert_eq!(index, MarketIndex::N225);
            assert_eq!(attempts, 11);
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }

    // GSPC and NSEI once each, eleven tries at N225, nothing after it
    let calls = provider.calls();
    assert_eq!(calls.len(), 13);
    assert!(!calls.iter().any(|t| t == "^FTSE" || t == "^HSI"));

    let events = progress.events.lock().unwrap();
    assert_eq!(events.first().unwrap(), "start GSPC 1/5");
    assert_eq!(events.last().unwrap(), "retry N225 11/11");
    assert_eq!(events.iter().filter(|e| e.starts_with("retry")).count(), 11);
}

#[test]
fn exhaustion_message_asks_to_try_later() {
    let provider = PartlyDownProvider::with_broken("^FTSE");
    let fetcher = RetryingFetcher::new(&provider, RetryPolicy::immediate(2));
    let err = fetcher.fetch_daily(MarketIndex::Ftse).unwrap_err();

    assert!(err.is_exhausted());
    let message = err.to_string();
    assert!(message.contains("FTSE"), "{message}");
    assert!(message.contains("try again later"), "{message}");
    assert_eq!(provider.calls().len(), 3);
}

#[test]
fn fetched_daily_series_stays_inside_window() {
    let provider = PartlyDownProvider::healthy();
    let fetcher = RetryingFetcher::new(&provider, RetryPolicy::default());
    let window = fetcher.window();
    let daily = fetcher.fetch_daily(MarketIndex::Nsei).unwrap();

    assert_eq!(daily.index(), MarketIndex::Nsei);
    assert!(daily.first_date() >= window.start);
    assert!(daily.last_date() <= window.end);
    assert_eq!(daily.first_date().year(), 2007);
}
