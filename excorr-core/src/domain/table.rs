//! Stacked monthly return table: one row per index, one column per month.

use super::{MarketIndex, MonthlyReturnSeries, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monthly returns for several indices sharing one month axis.
///
/// Rows are keyed by [`MarketIndex`], so iteration follows enumeration order
/// no matter which order rows were pushed in. Every row has exactly
/// `dates.len()` columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct StackedReturnTable {
    dates: Vec<NaiveDate>,
    rows: BTreeMap<MarketIndex, Vec<f64>>,
}

impl StackedReturnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. The first row seeds the month axis; later rows must
    /// cover exactly the same months.
    pub fn push(&mut self, index: MarketIndex, series: MonthlyReturnSeries) -> Result<(), SeriesError> {
        if self.rows.contains_key(&index) {
            return Err(SeriesError::DuplicateRow { index });
        }

        if self.rows.is_empty() {
            self.dates = series.dates().to_vec();
        } else {
            if series.len() != self.dates.len() {
                return Err(SeriesError::RowLengthMismatch {
                    index,
                    expected: self.dates.len(),
                    found: series.len(),
                });
            }
            if series.dates() != self.dates.as_slice() {
                return Err(SeriesError::RowDatesMismatch { index });
            }
        }

        self.rows.insert(index, series.returns().to_vec());
        Ok(())
    }

    /// Month-end dates shared by every row.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn row(&self, index: MarketIndex) -> Option<&[f64]> {
        self.rows.get(&index).map(|r| r.as_slice())
    }

    /// Rebuild the row for `index` as a standalone series.
    pub fn series(&self, index: MarketIndex) -> Option<MonthlyReturnSeries> {
        let row = self.rows.get(&index)?;
        MonthlyReturnSeries::new(self.dates.clone(), row.clone()).ok()
    }

    /// Rows in enumeration order.
    pub fn rows(&self) -> impl Iterator<Item = (MarketIndex, &[f64])> {
        self.rows.iter().map(|(i, r)| (*i, r.as_slice()))
    }

    pub fn indices(&self) -> Vec<MarketIndex> {
        self.rows.keys().copied().collect()
    }

    pub fn contains(&self, index: MarketIndex) -> bool {
        self.rows.contains_key(&index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Deterministic BLAKE3 hash over the month axis and every row.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for date in &self.dates {
            hasher.update(date.to_string().as_bytes());
        }
        for (index, row) in &self.rows {
            hasher.update(index.symbol().as_bytes());
            for value in row {
                hasher.update(&value.to_le_bytes());
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[derive(Deserialize)]
struct RawTable {
    dates: Vec<NaiveDate>,
    rows: BTreeMap<MarketIndex, Vec<Option<f64>>>,
}

impl TryFrom<RawTable> for StackedReturnTable {
    type Error = SeriesError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let mut rows = BTreeMap::new();
        for (index, row) in raw.rows {
            if row.len() != raw.dates.len() {
                return Err(SeriesError::RowLengthMismatch {
                    index,
                    expected: raw.dates.len(),
                    found: row.len(),
                });
            }
            rows.insert(index, row.into_iter().map(|r| r.unwrap_or(f64::NAN)).collect());
        }
        Ok(Self {
            dates: raw.dates,
            rows,
        })
    }
}
