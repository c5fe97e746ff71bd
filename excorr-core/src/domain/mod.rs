//! Domain types: the index table, price and return series, the stacked
//! return table, and correlation trends.

pub mod index;
pub mod series;
pub mod table;
pub mod trend;

pub use index::{IndexInfo, MarketIndex, UnknownIndex, INDEX_TABLE};
pub use series::{DailyPriceSeries, MonthlyReturnSeries, PricePoint, SeriesError};
pub use table::StackedReturnTable;
pub use trend::CorrelationTrend;
