//! Synthetic price provider for offline runs.
//!
//! Produces a deterministic random walk per ticker: a shared market factor
//! plus a ticker-specific component, so different indices come out
//! positively but imperfectly correlated. Clearly fake; every result is
//! tagged with [`DataSource::Synthetic`].

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MARKET_SEED: &str = "excorr-synthetic-market";

/// Deterministic random-walk provider.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    /// Weight of the shared market factor in each daily return (0..=1).
    market_weight: f64,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self {
            start_price: 1_000.0,
            market_weight: 0.6,
        }
    }

    pub fn with_market_weight(mut self, weight: f64) -> Self {
        self.market_weight = weight.clamp(0.0, 1.0);
        self
    }

    fn seeded(label: &str) -> StdRng {
        let seed: [u8; 32] = *blake3::hash(label.as_bytes()).as_bytes();
        StdRng::from_seed(seed)
    }

    fn generate(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
        let mut market = Self::seeded(MARKET_SEED);
        let mut own = Self::seeded(ticker);

        let mut bars = Vec::new();
        let mut price = self.start_price;
        let mut current = start;

        while current <= end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += Duration::days(1);
                continue;
            }

            let common: f64 = market.gen_range(-0.02..0.02);
            let specific: f64 = own.gen_range(-0.02..0.02);
            let daily_return = self.market_weight * common + (1.0 - self.market_weight) * specific;
            price *= 1.0 + daily_return;

            bars.push(RawBar {
                date: current,
                close: price,
                adj_close: price,
            });
            current += Duration::days(1);
        }

        bars
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        if end < start {
            return Err(DataError::Other(format!("empty range {start}..{end}")));
        }
        Ok(FetchResult {
            ticker: ticker.to_string(),
            bars: self.generate(ticker, start, end),
            source: DataSource::Synthetic,
        })
    }
}
