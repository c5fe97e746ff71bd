//! Retrying fetcher: masks transient provider failures behind a bounded
//! number of attempts, then hands daily series to the return engine.

use super::provider::{DataError, DataProvider, FetchProgress, RawBar, SilentProgress};
use super::retry::RetryPolicy;
use crate::analytics::monthly_return;
use crate::domain::{
    DailyPriceSeries, MarketIndex, MonthlyReturnSeries, PricePoint, SeriesError,
    StackedReturnTable,
};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors surfaced by the fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(
        "failed to download {index} after {attempts} attempts; \
         the data source may be down, please try again later"
    )]
    Exhausted {
        index: MarketIndex,
        attempts: u32,
        #[source]
        last: DataError,
    },

    #[error("download of {index} failed: {source}")]
    Rejected {
        index: MarketIndex,
        #[source]
        source: DataError,
    },

    #[error("cannot assemble return table: {0}")]
    Table(#[from] SeriesError),
}

impl FetchError {
    /// The index whose fetch failed, if the failure is tied to one.
    pub fn index(&self) -> Option<MarketIndex> {
        match self {
            FetchError::Exhausted { index, .. } | FetchError::Rejected { index, .. } => {
                Some(*index)
            }
            FetchError::Table(_) => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, FetchError::Exhausted { .. })
    }
}

/// The fixed ten-year observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Evaluated at compile time: an invalid date fails the build.
const fn window_date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid fetch window date"),
    }
}

impl FetchWindow {
    /// 2007-11-09 through 2017-11-09, inclusive.
    pub const TEN_YEAR: FetchWindow = FetchWindow {
        start: window_date(2007, 11, 9),
        end: window_date(2017, 11, 9),
    };

    pub const fn ten_year() -> Self {
        Self::TEN_YEAR
    }
}

/// Fetches daily series over the fixed window, retrying transient failures.
pub struct RetryingFetcher<'a> {
    provider: &'a dyn DataProvider,
    policy: RetryPolicy,
    window: FetchWindow,
    progress: &'a dyn FetchProgress,
}

impl<'a> RetryingFetcher<'a> {
    pub fn new(provider: &'a dyn DataProvider, policy: RetryPolicy) -> Self {
        Self {
            provider,
            policy,
            window: FetchWindow::ten_year(),
            progress: &SilentProgress,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn FetchProgress) -> Self {
        self.progress = progress;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn window(&self) -> FetchWindow {
        self.window
    }

    /// Daily adjusted closes for `index` over the fixed window.
    ///
    /// Transient provider errors are retried up to `policy.max_retries`
    /// times; anything else is returned immediately as
    /// [`FetchError::Rejected`].
    pub fn fetch_daily(&self, index: MarketIndex) -> Result<DailyPriceSeries, FetchError> {
        let ticker = index.ticker();
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            if attempt > 1 {
                let delay = self.policy.delay_before(attempt - 1);
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
            }

            debug!(provider = self.provider.name(), %ticker, attempt, max_attempts, "fetching daily prices");

            match self.provider.fetch(&ticker, self.window.start, self.window.end) {
                Ok(result) => {
                    let series = daily_series_from_bars(index, result.bars)
                        .map_err(|e| FetchError::Rejected {
                            index,
                            source: DataError::Series(e),
                        })?;
                    info!(
                        %ticker,
                        attempt,
                        observations = series.len(),
                        source = ?result.source,
                        "fetched daily prices"
                    );
                    return Ok(series);
                }
                Err(e) if e.is_transient() => {
                    warn!(%ticker, attempt, max_attempts, error = %e, "transient fetch failure");
                    self.progress.on_attempt_failed(index, attempt, max_attempts, &e);
                    if attempt >= max_attempts {
                        error!(%ticker, attempts = attempt, "retry budget exhausted");
                        return Err(FetchError::Exhausted {
                            index,
                            attempts: attempt,
                            last: e,
                        });
                    }
                }
                Err(e) => {
                    error!(%ticker, attempt, error = %e, "non-retryable fetch failure");
                    return Err(FetchError::Rejected { index, source: e });
                }
            }
        }
    }

    /// Monthly returns for `index`: [`fetch_daily`](Self::fetch_daily)
    /// followed by [`monthly_return`].
    pub fn fetch_monthly_return(&self, index: MarketIndex) -> Result<MonthlyReturnSeries, FetchError> {
        let daily = self.fetch_daily(index)?;
        Ok(monthly_return(&daily))
    }

    /// Fetch every requested index one after another and stack the monthly
    /// returns.
    ///
    /// Indices are processed in enumeration order whatever order they were
    /// requested in; duplicates are ignored. The first failure aborts the
    /// whole operation and no partial table is returned.
    pub fn fetch_stacked_monthly_returns(
        &self,
        indices: &[MarketIndex],
    ) -> Result<StackedReturnTable, FetchError> {
        let ordered: Vec<MarketIndex> = MarketIndex::ALL
            .into_iter()
            .filter(|i| indices.contains(i))
            .collect();
        let total = ordered.len();
        let mut table = StackedReturnTable::new();

        for (position, index) in ordered.into_iter().enumerate() {
            self.progress.on_start(index, position, total);
            let daily = self.fetch_daily(index)?;
            self.progress
                .on_complete(index, position, total, daily.len());
            table.push(index, monthly_return(&daily))?;
        }

        info!(
            rows = table.row_count(),
            months = table.column_count(),
            "stacked monthly returns"
        );
        Ok(table)
    }
}

/// Convert provider bars to a validated daily adjusted-close series.
pub fn daily_series_from_bars(
    index: MarketIndex,
    bars: Vec<RawBar>,
) -> Result<DailyPriceSeries, SeriesError> {
    let points = bars
        .into_iter()
        .map(|b| PricePoint::new(b.date, b.adj_close))
        .collect();
    DailyPriceSeries::new(index, points)
}
