//! The fixed set of market indices under comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the five market indices the analysis covers.
///
/// Declaration order is the enumeration order: stacked tables, comparison
/// lists and `BTreeMap`s keyed by `MarketIndex` all follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketIndex {
    Gspc,
    Nsei,
    N225,
    Ftse,
    Hsi,
}

/// Static description of a market index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexInfo {
    pub index: MarketIndex,
    /// Bare symbol, e.g. `GSPC`.
    pub symbol: &'static str,
    /// Human-readable index name, e.g. `S&P 500`.
    pub display_name: &'static str,
    /// The stock exchange the index represents.
    pub exchange: &'static str,
}

/// Symbol → display name → exchange, in enumeration order.
pub const INDEX_TABLE: [IndexInfo; 5] = [
    IndexInfo {
        index: MarketIndex::Gspc,
        symbol: "GSPC",
        display_name: "S&P 500",
        exchange: "New York Stock Exchange/NASDAQ",
    },
    IndexInfo {
        index: MarketIndex::Nsei,
        symbol: "NSEI",
        display_name: "Nifty 50",
        exchange: "Bombay Stock Exchange",
    },
    IndexInfo {
        index: MarketIndex::N225,
        symbol: "N225",
        display_name: "Nikkei 225",
        exchange: "Tokyo Stock Exchange",
    },
    IndexInfo {
        index: MarketIndex::Ftse,
        symbol: "FTSE",
        display_name: "FTSE 100",
        exchange: "London Stock Exchange",
    },
    IndexInfo {
        index: MarketIndex::Hsi,
        symbol: "HSI",
        display_name: "Hang Seng",
        exchange: "Hong Kong Stock Exchange",
    },
];

impl MarketIndex {
    /// All indices in enumeration order.
    pub const ALL: [MarketIndex; 5] = [
        MarketIndex::Gspc,
        MarketIndex::Nsei,
        MarketIndex::N225,
        MarketIndex::Ftse,
        MarketIndex::Hsi,
    ];

    /// Position in the enumeration (0-based).
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn info(self) -> &'static IndexInfo {
        &INDEX_TABLE[self.position()]
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    pub fn display_name(self) -> &'static str {
        self.info().display_name
    }

    pub fn exchange(self) -> &'static str {
        self.info().exchange
    }

    /// Upstream ticker: Yahoo prefixes index symbols with `^`.
    pub fn ticker(self) -> String {
        format!("^{}", self.symbol())
    }

    /// The other four indices, in enumeration order.
    pub fn others(self) -> impl Iterator<Item = MarketIndex> {
        Self::ALL.into_iter().filter(move |i| *i != self)
    }
}

impl fmt::Display for MarketIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown market index '{0}' (expected one of GSPC, NSEI, N225, FTSE, HSI)")]
pub struct UnknownIndex(pub String);

impl FromStr for MarketIndex {
    type Err = UnknownIndex;

    /// Accepts the bare symbol, the `^`-prefixed ticker, or the display name
    /// (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed.strip_prefix('^').unwrap_or(trimmed);
        INDEX_TABLE
            .iter()
            .find(|info| {
                info.symbol.eq_ignore_ascii_case(bare)
                    || info.display_name.eq_ignore_ascii_case(trimmed)
            })
            .map(|info| info.index)
            .ok_or_else(|| UnknownIndex(s.to_string()))
    }
}
