//! Daily price and monthly return series.

use super::MarketIndex;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or combining series.
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("series for {index} has no usable observations")]
    EmptySeries { index: MarketIndex },

    #[error("series for {index} has two observations on {date}")]
    DuplicateDate { index: MarketIndex, date: NaiveDate },

    #[error("series for {index} has a non-positive price {price} on {date}")]
    InvalidPrice {
        index: MarketIndex,
        date: NaiveDate,
        price: f64,
    },

    #[error("series has {dates} dates but {values} values")]
    LengthMismatch { dates: usize, values: usize },

    #[error("return series are not aligned: {detail}")]
    Misaligned { detail: String },

    #[error("row {index} has {found} months, table expects {expected}")]
    RowLengthMismatch {
        index: MarketIndex,
        expected: usize,
        found: usize,
    },

    #[error("row {index} covers different months than the rest of the table")]
    RowDatesMismatch { index: MarketIndex },

    #[error("row {index} is already in the table")]
    DuplicateRow { index: MarketIndex },

    #[error("table has no row for {index}")]
    MissingRow { index: MarketIndex },

    #[error("correlation for {year} is undefined ({observations} usable observations)")]
    InsufficientData { year: i32, observations: usize },
}

/// A single adjusted-close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Daily adjusted closes for one index, ascending by date, one per trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDailySeries")]
pub struct DailyPriceSeries {
    index: MarketIndex,
    points: Vec<PricePoint>,
}

impl DailyPriceSeries {
    /// Build a series from raw observations.
    ///
    /// Observations with a non-finite price (missing adjusted close) are
    /// dropped, the rest sorted by date. Duplicate dates, non-positive
    /// prices, and an empty result are rejected.
    pub fn new(index: MarketIndex, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        let mut points: Vec<PricePoint> =
            points.into_iter().filter(|p| p.price.is_finite()).collect();
        points.sort_by_key(|p| p.date);

        if points.is_empty() {
            return Err(SeriesError::EmptySeries { index });
        }

        for window in points.windows(2) {
            if window[0].date == window[1].date {
                return Err(SeriesError::DuplicateDate {
                    index,
                    date: window[1].date,
                });
            }
        }

        if let Some(bad) = points.iter().find(|p| p.price <= 0.0) {
            return Err(SeriesError::InvalidPrice {
                index,
                date: bad.date,
                price: bad.price,
            });
        }

        Ok(Self { index, points })
    }

    pub fn index(&self) -> MarketIndex {
        self.index
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed series; kept for slice-like ergonomics.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}

/// Month-end dates paired with fractional returns versus the prior month.
///
/// The first return is always NaN: there is no prior month to compare to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReturnSeries")]
pub struct MonthlyReturnSeries {
    dates: Vec<NaiveDate>,
    returns: Vec<f64>,
}

impl MonthlyReturnSeries {
    pub fn new(dates: Vec<NaiveDate>, returns: Vec<f64>) -> Result<Self, SeriesError> {
        if dates.len() != returns.len() {
            return Err(SeriesError::LengthMismatch {
                dates: dates.len(),
                values: returns.len(),
            });
        }
        Ok(Self { dates, returns })
    }

    /// Caller guarantees `dates.len() == returns.len()`.
    pub(crate) fn from_parallel(dates: Vec<NaiveDate>, returns: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), returns.len());
        Self { dates, returns }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.returns.iter().copied())
    }

    /// First and last calendar year covered, `None` when empty.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let min = self.dates.iter().map(|d| d.year()).min()?;
        let max = self.dates.iter().map(|d| d.year()).max()?;
        Some((min, max))
    }

    /// Positions of the months falling in `year`.
    pub fn positions_in_year(&self, year: i32) -> impl Iterator<Item = usize> + '_ {
        self.dates
            .iter()
            .enumerate()
            .filter(move |(_, d)| d.year() == year)
            .map(|(i, _)| i)
    }

    /// Check that `other` shares this series' date index.
    pub fn check_aligned(&self, other: &MonthlyReturnSeries) -> Result<(), SeriesError> {
        if self.len() != other.len() {
            return Err(SeriesError::Misaligned {
                detail: format!("{} months vs {} months", self.len(), other.len()),
            });
        }
        if let Some((a, b)) = self
            .dates
            .iter()
            .zip(&other.dates)
            .find(|(a, b)| a != b)
        {
            return Err(SeriesError::Misaligned {
                detail: format!("{a} paired with {b}"),
            });
        }
        Ok(())
    }
}

// Deserialization goes through the validating constructors.

#[derive(Deserialize)]
struct RawDailySeries {
    index: MarketIndex,
    points: Vec<PricePoint>,
}

impl TryFrom<RawDailySeries> for DailyPriceSeries {
    type Error = SeriesError;

    fn try_from(raw: RawDailySeries) -> Result<Self, Self::Error> {
        Self::new(raw.index, raw.points)
    }
}

/// JSON writes NaN returns as `null`; read them back as NaN.
#[derive(Deserialize)]
struct RawReturnSeries {
    dates: Vec<NaiveDate>,
    returns: Vec<Option<f64>>,
}

impl TryFrom<RawReturnSeries> for MonthlyReturnSeries {
    type Error = SeriesError;

    fn try_from(raw: RawReturnSeries) -> Result<Self, Self::Error> {
        let returns = raw.returns.into_iter().map(|r| r.unwrap_or(f64::NAN)).collect();
        Self::new(raw.dates, returns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn daily_series_sorts_and_drops_missing_prices() {
        let series = DailyPriceSeries::new(
            MarketIndex::Gspc,
            vec![
                PricePoint::new(d(2020, 1, 3), 102.0),
                PricePoint::new(d(2020, 1, 2), 101.0),
                PricePoint::new(d(2020, 1, 6), f64::NAN),
            ],
        )
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), d(2020, 1, 2));
        assert_eq!(series.last_date(), d(2020, 1, 3));
    }

    #[test]
    fn daily_series_rejects_duplicates() {
        let err = DailyPriceSeries::new(
            MarketIndex::Hsi,
            vec![
                PricePoint::new(d(2020, 1, 2), 1.0),
                PricePoint::new(d(2020, 1, 2), 2.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::DuplicateDate { .. }));
    }

    #[test]
    fn daily_series_rejects_empty_and_non_positive() {
        let empty = DailyPriceSeries::new(MarketIndex::Ftse, vec![PricePoint::new(d(2020, 1, 2), f64::NAN)]);
        assert_eq!(
            empty.unwrap_err(),
            SeriesError::EmptySeries {
                index: MarketIndex::Ftse
            }
        );

        let zero = DailyPriceSeries::new(MarketIndex::Ftse, vec![PricePoint::new(d(2020, 1, 2), 0.0)]);
        assert!(matches!(zero.unwrap_err(), SeriesError::InvalidPrice { .. }));
    }

    #[test]
    fn monthly_series_length_checked() {
        let err = MonthlyReturnSeries::new(vec![d(2020, 1, 31)], vec![]).unwrap_err();
        assert_eq!(err, SeriesError::LengthMismatch { dates: 1, values: 0 });
    }

    #[test]
    fn alignment_detects_shifted_dates() {
        let a = MonthlyReturnSeries::new(vec![d(2020, 1, 31), d(2020, 2, 29)], vec![f64::NAN, 0.1]).unwrap();
        let b = MonthlyReturnSeries::new(vec![d(2020, 2, 29), d(2020, 3, 31)], vec![f64::NAN, 0.1]).unwrap();
        assert!(a.check_aligned(&a.clone()).is_ok());
        assert!(matches!(a.check_aligned(&b), Err(SeriesError::Misaligned { .. })));
    }

    #[test]
    fn year_span_and_positions() {
        let s = MonthlyReturnSeries::new(
            vec![d(2019, 12, 31), d(2020, 1, 31), d(2020, 2, 29)],
            vec![f64::NAN, 0.01, 0.02],
        )
        .unwrap();
        assert_eq!(s.year_span(), Some((2019, 2020)));
        assert_eq!(s.positions_in_year(2020).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn deserializing_daily_series_validates() {
        let empty = r#"{"index":"GSPC","points":[]}"#;
        assert!(serde_json::from_str::<DailyPriceSeries>(empty).is_err());

        let negative = r#"{"index":"GSPC","points":[{"date":"2020-01-02","price":-1.0}]}"#;
        assert!(serde_json::from_str::<DailyPriceSeries>(negative).is_err());

        let unsorted = r#"{"index":"HSI","points":[
            {"date":"2020-01-03","price":11.0},
            {"date":"2020-01-02","price":10.0}]}"#;
        let series: DailyPriceSeries = serde_json::from_str(unsorted).unwrap();
        assert_eq!(series.index(), MarketIndex::Hsi);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2020, 1, 3).unwrap());
    }

    #[test]
    fn return_series_json_keeps_sentinel() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap(),
        ];
        let series = MonthlyReturnSeries::new(dates, vec![f64::NAN, 0.25]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        assert!(json.contains("null"));

        let back: MonthlyReturnSeries = serde_json::from_str(&json).unwrap();
        assert!(back.returns()[0].is_nan());
        assert_eq!(back.returns()[1], 0.25);
        assert_eq!(back.dates(), series.dates());

        let short = r#"{"dates":["2020-01-31","2020-02-29"],"returns":[null]}"#;
        assert!(serde_json::from_str::<MonthlyReturnSeries>(short).is_err());
    }
}
