//! Daily → month-end resampling.

use crate::domain::{DailyPriceSeries, PricePoint};
use chrono::{Datelike, Duration, Months, NaiveDate};

/// Resample a daily series to month-end frequency.
///
/// Emits one point per calendar month from the first observation's month to
/// the last observation's month. Each point is dated at the calendar
/// month-end and carries the last adjusted close observed on or before that
/// date, so a month-end falling on a non-trading day is forward-filled.
pub fn to_monthly(daily: &DailyPriceSeries) -> Vec<PricePoint> {
    let points = daily.points();
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let last_month = first_of_month(daily.last_date());
    let mut month = first_of_month(first.date);
    let mut cursor = 0;
    let mut last_price = first.price;
    let mut out = Vec::new();

    while month <= last_month {
        let end = month_end(month);
        while cursor < points.len() && points[cursor].date <= end {
            last_price = points[cursor].price;
            cursor += 1;
        }
        out.push(PricePoint::new(end, last_price));

        match end.succ_opt() {
            Some(next) => month = next,
            None => break,
        }
    }

    out
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Last calendar day of the month starting at `first`.
pub(crate) fn month_end(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
