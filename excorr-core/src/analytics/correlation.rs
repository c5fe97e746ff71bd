//! Pearson correlation, whole-period and per calendar year.

use crate::domain::{CorrelationTrend, MonthlyReturnSeries, SeriesError};

/// Pearson correlation coefficient of two equal-length samples.
///
/// Returns NaN when the lengths differ, there are fewer than two points, any
/// value is NaN, or either sample has zero variance. Finite results are
/// clamped to [-1, 1].
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n != y.len() || n < 2 {
        return f64::NAN;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom.is_nan() || denom == 0.0 {
        return f64::NAN;
    }
    let r = cov / denom;
    if r.is_nan() {
        r
    } else {
        r.clamp(-1.0, 1.0)
    }
}

/// Correlation over the whole period, skipping months where either series
/// is NaN (which always includes the leading sentinel).
pub fn whole_period_correlation(
    a: &MonthlyReturnSeries,
    b: &MonthlyReturnSeries,
) -> Result<f64, SeriesError> {
    a.check_aligned(b)?;
    let (x, y): (Vec<f64>, Vec<f64>) = a
        .returns()
        .iter()
        .zip(b.returns())
        .filter(|(ra, rb)| !ra.is_nan() && !rb.is_nan())
        .map(|(ra, rb)| (*ra, *rb))
        .unzip();
    Ok(pearson(&x, &y))
}

/// Year-by-year correlation of `a` against `b`.
///
/// Covers every calendar year from the first to the last year of `a`, then
/// drops the first year: its bucket contains the NaN sentinel at index 0.
/// The result therefore starts at `first_year + 1`. Years with fewer than
/// two months, NaN values, or flat returns carry a NaN coefficient.
pub fn correlation_trend(
    a: &MonthlyReturnSeries,
    b: &MonthlyReturnSeries,
) -> Result<CorrelationTrend, SeriesError> {
    a.check_aligned(b)?;

    let Some((min_year, max_year)) = a.year_span() else {
        return Ok(CorrelationTrend::default());
    };

    let mut trend = CorrelationTrend::with_capacity((max_year - min_year) as usize);
    for year in (min_year + 1)..=max_year {
        let (x, y): (Vec<f64>, Vec<f64>) = a
            .positions_in_year(year)
            .map(|i| (a.returns()[i], b.returns()[i]))
            .unzip();
        let usable = x
            .iter()
            .zip(&y)
            .filter(|(ra, rb)| !ra.is_nan() && !rb.is_nan())
            .count();
        trend.push(year, pearson(&x, &y), usable);
    }

    Ok(trend)
}
