//! Exchange correlations core: index data fetching, monthly returns, and
//! correlation statistics.
//!
//! This crate contains the two working parts of the analysis:
//! - A retrying fetcher that pulls ten years of daily adjusted closes per
//!   index from an unreliable provider, retrying transient failures a
//!   bounded number of times
//! - A pure return/correlation engine: month-end resampling, monthly
//!   returns, the stacked return table, whole-period and per-year Pearson
//!   correlation, and the comparison report handed to presentation code

pub mod analytics;
pub mod config;
pub mod data;
pub mod domain;

pub use analytics::{correlation_trend, monthly_return, to_monthly, ComparisonReport};
pub use config::{ConfigError, FetchConfig, HttpConfig};
pub use data::{DataError, DataProvider, FetchError, RetryPolicy, RetryingFetcher};
pub use domain::{
    CorrelationTrend, DailyPriceSeries, MarketIndex, MonthlyReturnSeries, SeriesError,
    StackedReturnTable,
};
