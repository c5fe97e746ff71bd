//! CSV import provider.
//!
//! Reads Yahoo-style daily exports from a directory, one file per index:
//! `{dir}/{SYMBOL}.csv` with at least `Date`, `Close` and `Adj Close`
//! columns. Yahoo writes `null` for sessions without data; those rows are
//! skipped.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Close")]
    close: String,
    #[serde(rename = "Adj Close", default)]
    adj_close: Option<String>,
}

/// Provider backed by CSV exports on disk.
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `^GSPC` → `{dir}/GSPC.csv`
    fn path_for(&self, ticker: &str) -> PathBuf {
        let bare = ticker.trim_start_matches('^');
        self.dir.join(format!("{bare}.csv"))
    }

    fn read_bars(path: &Path, start: NaiveDate, end: NaiveDate) -> Result<Vec<RawBar>, DataError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| DataError::Import(format!("open {}: {e}", path.display())))?;

        let mut bars = Vec::new();
        let mut skipped = 0usize;
        for (line, record) in reader.deserialize::<CsvRow>().enumerate() {
            let row = record
                .map_err(|e| DataError::Import(format!("{} row {}: {e}", path.display(), line + 1)))?;

            let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|e| {
                DataError::Import(format!("{} row {}: bad date '{}': {e}", path.display(), line + 1, row.date))
            })?;
            if date < start || date > end {
                continue;
            }

            let Some(close) = parse_price(&row.close) else {
                skipped += 1;
                continue;
            };
            let adj_close = match row.adj_close.as_deref() {
                Some(raw) => match parse_price(raw) {
                    Some(v) => v,
                    None => {
                        skipped += 1;
                        continue;
                    }
                },
                None => close,
            };

            bars.push(RawBar {
                date,
                close,
                adj_close,
            });
        }
        debug!(path = %path.display(), rows = bars.len(), skipped, "read csv export");
        Ok(bars)
    }
}

/// Parse a price cell; `null`, empty, and non-numeric cells are missing.
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }

        let bars = Self::read_bars(&path, start, end)?;
        Ok(FetchResult {
            ticker: ticker.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}
