//! End-to-end checks of the per-year correlation trend on constructed data.

use chrono::{Months, NaiveDate};
use excorr_core::analytics::{correlation_trend, whole_period_correlation};
use excorr_core::domain::{MonthlyReturnSeries, SeriesError};

/// Month-end dates for every month of `first_year..=last_year`.
fn month_ends(first_year: i32, last_year: i32) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    for year in first_year..=last_year {
        for month in 1..=12 {
            let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let end = first.checked_add_months(Months::new(1)).unwrap().pred_opt().unwrap();
            dates.push(end);
        }
    }
    dates
}

/// Two series over 2015–2017 with correlation 1 in 2015, 0 in 2016, -1 in 2017.
fn constructed_pair() -> (MonthlyReturnSeries, MonthlyReturnSeries) {
    let a_year = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
    // Orthogonal to a_year with zero mean: covariance and correlation are 0.
    let b_2016 = [1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0];

    let mut a = Vec::new();
    let mut b = Vec::new();
    for v in a_year {
        a.push(v / 100.0);
        b.push(v / 100.0);
    }
    for (va, vb) in a_year.iter().zip(b_2016) {
        a.push(va / 100.0);
        b.push(vb / 100.0);
    }
    for v in a_year {
        a.push(v / 100.0);
        b.push(-v / 100.0);
    }
    a[0] = f64::NAN;
    b[0] = f64::NAN;

    let dates = month_ends(2015, 2017);
    (
        MonthlyReturnSeries::new(dates.clone(), a).unwrap(),
        MonthlyReturnSeries::new(dates, b).unwrap(),
    )
}

#[test]
fn first_year_is_dropped_and_known_coefficients_recovered() {
    let (a, b) = constructed_pair();
    let trend = correlation_trend(&a, &b).unwrap();

    assert_eq!(trend.years(), &[2016, 2017]);
    assert_eq!(trend.coefficients().len(), 2);
    assert!(trend.coefficients()[0].abs() < 1e-12, "2016: {}", trend.coefficients()[0]);
    assert!((trend.coefficients()[1] + 1.0).abs() < 1e-12, "2017: {}", trend.coefficients()[1]);
    assert_eq!(trend.observations(), &[12, 12]);
    assert!(trend.ensure_defined().is_ok());
}

#[test]
fn years_bracket_the_series_span() {
    let (a, b) = constructed_pair();
    let trend = correlation_trend(&a, &b).unwrap();
    let (min_year, max_year) = a.year_span().unwrap();

    assert_eq!(trend.years().len(), trend.coefficients().len());
    assert_eq!(trend.years()[0], min_year + 1);
    assert_eq!(*trend.years().last().unwrap(), max_year);
}

#[test]
fn whole_period_mixes_the_three_regimes() {
    let (a, b) = constructed_pair();
    let r = whole_period_correlation(&a, &b).unwrap();
    assert!(r > -1.0 && r < 1.0);
    assert!(r.abs() < 0.2, "regimes roughly cancel out, got {r}");
}

#[test]
fn sparse_year_propagates_nan_unless_checked() {
    // Source-compatible behavior: an undefined year is NaN, not an error.
    let mut dates = month_ends(2015, 2016);
    dates.push(NaiveDate::from_ymd_opt(2017, 1, 31).unwrap());
    let returns: Vec<f64> = (0..dates.len())
        .map(|i| if i == 0 { f64::NAN } else { ((i * 7 % 5) as f64 - 2.0) / 100.0 })
        .collect();
    let a = MonthlyReturnSeries::new(dates.clone(), returns.clone()).unwrap();
    let b = MonthlyReturnSeries::new(dates, returns.iter().map(|r| r * 3.0).collect()).unwrap();

    let trend = correlation_trend(&a, &b).unwrap();
    assert_eq!(trend.years(), &[2016, 2017]);
    assert!((trend.coefficients()[0] - 1.0).abs() < 1e-12);
    assert!(trend.coefficients()[1].is_nan());

    // Opt-in strict mode surfaces the gap as an explicit error.
    assert_eq!(
        trend.ensure_defined(),
        Err(SeriesError::InsufficientData {
            year: 2017,
            observations: 1
        })
    );
}

#[test]
fn misaligned_inputs_are_a_caller_error() {
    let a = MonthlyReturnSeries::new(month_ends(2015, 2016), vec![0.01; 24]).unwrap();
    let b = MonthlyReturnSeries::new(month_ends(2015, 2015), vec![0.01; 12]).unwrap();
    assert!(matches!(
        correlation_trend(&a, &b),
        Err(SeriesError::Misaligned { .. })
    ));
}
