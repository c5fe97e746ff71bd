//! Comparison of one selected index against the other four.
//!
//! The report carries everything a presentation layer needs: overall
//! coefficients, percent-return scatter pairs, and per-year trends.

use super::correlation::{correlation_trend, whole_period_correlation};
use crate::domain::{CorrelationTrend, MarketIndex, SeriesError, StackedReturnTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One month's returns for the selected and compared index, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub date: NaiveDate,
    pub selected_pct: f64,
    pub other_pct: f64,
}

/// Statistics of the selected index against one other index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub index: MarketIndex,
    pub display_name: String,
    /// Whole-period Pearson coefficient.
    pub coefficient: f64,
    pub scatter: Vec<ScatterPoint>,
    pub trend: CorrelationTrend,
}

/// Output only: serialized for presentation, never read back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub selected: MarketIndex,
    pub selected_name: String,
    pub months: usize,
    pub dataset_hash: String,
    /// One entry per other index, in enumeration order.
    pub comparisons: Vec<Comparison>,
}

impl ComparisonReport {
    /// Compare `selected` against every other index in the table.
    pub fn build(table: &StackedReturnTable, selected: MarketIndex) -> Result<Self, SeriesError> {
        let base = table
            .series(selected)
            .ok_or(SeriesError::MissingRow { index: selected })?;

        let mut comparisons = Vec::new();
        for other in selected.others() {
            let series = table
                .series(other)
                .ok_or(SeriesError::MissingRow { index: other })?;

            let scatter = base
                .iter()
                .zip(series.returns())
                .filter(|((_, a), b)| !a.is_nan() && !b.is_nan())
                .map(|((date, a), b)| ScatterPoint {
                    date,
                    selected_pct: a * 100.0,
                    other_pct: b * 100.0,
                })
                .collect();

            comparisons.push(Comparison {
                index: other,
                display_name: other.display_name().to_string(),
                coefficient: whole_period_correlation(&base, &series)?,
                scatter,
                trend: correlation_trend(&base, &series)?,
            });
        }

        Ok(Self {
            selected,
            selected_name: selected.display_name().to_string(),
            months: table.column_count(),
            dataset_hash: table.dataset_hash(),
            comparisons,
        })
    }

    pub fn comparison(&self, index: MarketIndex) -> Option<&Comparison> {
        self.comparisons.iter().find(|c| c.index == index)
    }

    /// Union of trend years across comparisons, ascending.
    pub fn trend_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .comparisons
            .iter()
            .flat_map(|c| c.trend.years().iter().copied())
            .collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}
