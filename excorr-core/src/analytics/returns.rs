//! Monthly returns from month-end prices.

use super::resample::to_monthly;
use crate::domain::{DailyPriceSeries, MonthlyReturnSeries, PricePoint};

/// Monthly fractional returns: `price[i] / price[i-1] - 1`, with a NaN at
/// index 0.
pub fn monthly_return(daily: &DailyPriceSeries) -> MonthlyReturnSeries {
    returns_from_prices(&to_monthly(daily))
}

/// Returns for an already-resampled month-end price sequence.
pub fn returns_from_prices(monthly: &[PricePoint]) -> MonthlyReturnSeries {
    let dates = monthly.iter().map(|p| p.date).collect();
    let returns = monthly
        .iter()
        .enumerate()
        .map(|(i, p)| match i {
            0 => f64::NAN,
            _ => p.price / monthly[i - 1].price - 1.0,
        })
        .collect();
    MonthlyReturnSeries::from_parallel(dates, returns)
}
