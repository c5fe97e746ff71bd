//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over price sources (Yahoo Finance, CSV
//! exports, synthetic data) so the retrying fetcher can be driven by any of
//! them and mocked for tests.

use crate::domain::{MarketIndex, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily observation from a provider, before series validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub close: f64,
    pub adj_close: f64,
}

/// Structured error types for data operations.
///
/// [`DataError::is_transient`] decides which failures the fetcher retries.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("data source temporarily unavailable (HTTP {status})")]
    SourceUnavailable { status: u16 },

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("data source reported an error: {code}: {description}")]
    Upstream { code: String, description: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("import error: {0}")]
    Import(String),

    #[error("invalid price series: {0}")]
    Series(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Whether another attempt might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DataError::NetworkUnreachable(_)
                | DataError::SourceUnavailable { .. }
                | DataError::RateLimited { .. }
                | DataError::Upstream { .. }
        )
    }
}

/// Result of a successful fetch for a single ticker.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub ticker: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

/// Trait for price sources.
///
/// One call is one attempt: providers never retry internally, the
/// [`RetryingFetcher`](super::RetryingFetcher) owns the retry loop.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a ticker over an inclusive date range.
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}

/// Progress callbacks for the sequential multi-index fetch.
pub trait FetchProgress {
    /// Called when starting to fetch an index.
    fn on_start(&self, index: MarketIndex, position: usize, total: usize);

    /// Called after a transient failure, before the next attempt (if any).
    fn on_attempt_failed(&self, index: MarketIndex, attempt: u32, max_attempts: u32, error: &DataError);

    /// Called when an index is fetched and converted (`observations` daily points).
    fn on_complete(&self, index: MarketIndex, position: usize, total: usize, observations: usize);
}

/// Progress reporter that does nothing.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_start(&self, _index: MarketIndex, _position: usize, _total: usize) {}

    fn on_attempt_failed(&self, _index: MarketIndex, _attempt: u32, _max_attempts: u32, _error: &DataError) {}

    fn on_complete(&self, _index: MarketIndex, _position: usize, _total: usize, _observations: usize) {}
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, index: MarketIndex, position: usize, total: usize) {
        println!(
            "[{}/{}] Fetching {} ({})...",
            position + 1,
            total,
            index.display_name(),
            index.ticker()
        );
    }

    fn on_attempt_failed(&self, index: MarketIndex, attempt: u32, max_attempts: u32, error: &DataError) {
        println!("  attempt {attempt}/{max_attempts} for {index} failed: {error}");
    }

    fn on_complete(&self, index: MarketIndex, _position: usize, _total: usize, observations: usize) {
        println!("  OK: {index} ({observations} daily observations)");
    }
}
