//! Return and correlation computations. Pure functions, no I/O.

pub mod correlation;
pub mod report;
pub mod resample;
pub mod returns;

pub use correlation::{correlation_trend, pearson, whole_period_correlation};
pub use report::{Comparison, ComparisonReport, ScatterPoint};
pub use resample::to_monthly;
pub use returns::{monthly_return, returns_from_prices};
