//! Yahoo Finance data provider.
//!
//! Fetches daily bars from Yahoo's v8 chart API, one blocking request per
//! call. Failures are classified so the retrying fetcher can tell a flaky
//! upstream (connect errors, timeouts, 5xx, 429) from a request that will
//! never succeed (unknown symbol, auth, undecodable body).
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. The CSV import provider is the fallback when Yahoo is unusable.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use crate::config::HttpConfig;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://query2.finance.yahoo.com";

    pub fn new(http: &HttpConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.as_str())
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the provider at a different host (mirrors, local stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the chart API URL for a ticker and inclusive date range.
    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp() + 86_399;
        let encoded = ticker.replace('^', "%5E");
        format!(
            "{}/v8/finance/chart/{encoded}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Parse the chart API response into RawBars.
    fn parse_response(ticker: &str, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
        let result = match (resp.chart.result, resp.chart.error) {
            (_, Some(err)) if err.code == "Not Found" => {
                return Err(DataError::SymbolNotFound {
                    symbol: ticker.to_string(),
                })
            }
            (_, Some(err)) => {
                return Err(DataError::Upstream {
                    code: err.code,
                    description: err.description,
                })
            }
            (Some(result), None) => result,
            (None, None) => {
                return Err(DataError::ResponseFormatChanged(
                    "empty result with no error".into(),
                ))
            }
        };

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            })?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            // Exchange-local trading date
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let close = quote.close.get(i).copied().flatten();
            let adj_close = match &adj_closes {
                Some(v) => v.get(i).copied().flatten(),
                None => close,
            };

            // Holidays and half-published sessions come back as nulls
            let (Some(close), Some(adj_close)) = (close, adj_close) else {
                continue;
            };

            bars.push(RawBar {
                date,
                close,
                adj_close,
            });
        }

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }

        Ok(bars)
    }

    /// Execute a single HTTP request and classify the outcome.
    fn request(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<RawBar>, DataError> {
        let url = self.chart_url(ticker, start, end);
        debug!(%url, "requesting chart data");

        let resp = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() || e.is_timeout() || e.is_request() {
                DataError::NetworkUnreachable(e.to_string())
            } else {
                DataError::Other(e.to_string())
            }
        })?;

        let status = resp.status();
        debug!(%ticker, status = status.as_u16(), "chart response");

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired(format!(
                "Yahoo Finance refused the request (HTTP {status})"
            )));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }

        if status.is_server_error() {
            return Err(DataError::SourceUnavailable {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {ticker}")));
        }

        // The body can still be cut off after a 200: that is a transport
        // failure, not a format change.
        let body = resp.bytes().map_err(|e| {
            if e.is_body() || e.is_decode() || e.is_timeout() || e.is_connect() || e.is_request() {
                DataError::NetworkUnreachable(format!("reading response for {ticker}: {e}"))
            } else {
                DataError::Other(e.to_string())
            }
        })?;

        let chart: ChartResponse = serde_json::from_slice(&body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
        })?;

        Self::parse_response(ticker, chart)
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = self.request(ticker, start, end)?;
        Ok(FetchResult {
            ticker: ticker.to_string(),
            bars,
            source: DataSource::YahooFinance,
        })
    }
}
