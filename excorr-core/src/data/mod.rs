//! Price data: providers, the retry policy, and the retrying fetcher.

pub mod csv_import;
pub mod fetcher;
pub mod provider;
pub mod retry;
pub mod synthetic;
pub mod yahoo;

pub use csv_import::CsvProvider;
pub use fetcher::{daily_series_from_bars, FetchError, FetchWindow, RetryingFetcher};
pub use provider::{
    DataError, DataProvider, DataSource, FetchProgress, FetchResult, RawBar, SilentProgress,
    StdoutProgress,
};
pub use retry::{RetryDelay, RetryPolicy};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
