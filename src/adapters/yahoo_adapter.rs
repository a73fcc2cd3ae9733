//! Yahoo Finance data adapter.
//!
//! Fetches 1-minute or daily bars from Yahoo's v8 chart API in a single
//! blocking request. There is no retry: a failed fetch aborts the run.
//! Yahoo only serves 1-minute bars for roughly the last 30 days, in
//! windows of at most 7 days.

use crate::domain::error::FxError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::{DataPort, FetchRequest};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

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
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, FxError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, FxError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| FxError::Network {
                symbol: String::new(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, request: &FetchRequest) -> String {
        let epoch = |d: NaiveDate| {
            d.and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp())
                .unwrap_or_default()
        };
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval={}",
            self.base_url,
            request.symbol,
            epoch(request.start),
            epoch(request.end),
            request.interval.code()
        )
    }
}

/// Rate limiting and server failures are network errors. Other client
/// errors fall through: Yahoo reports unknown symbols and out-of-range
/// intervals as 404/422 with a `chart.error` payload.
fn check_status(symbol: &str, status: reqwest::StatusCode) -> Result<(), FxError> {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || !(status.is_success() || status.is_client_error())
    {
        return Err(FxError::Network {
            symbol: symbol.to_string(),
            reason: format!("HTTP {status}"),
        });
    }
    Ok(())
}

/// Decode a chart API body into bars in `timezone`. Rows without an open
/// or close are dropped.
fn parse_chart(symbol: &str, timezone: Tz, body: &str) -> Result<Vec<PriceBar>, FxError> {
    let format_err = |reason: String| FxError::DataFormat {
        symbol: symbol.to_string(),
        reason,
    };
    let no_data = |reason: String| FxError::NoData {
        symbol: symbol.to_string(),
        reason,
    };

    let resp: ChartResponse =
        serde_json::from_str(body).map_err(|e| format_err(format!("invalid chart JSON: {e}")))?;

    let data = match (resp.chart.result, resp.chart.error) {
        (_, Some(err)) => return Err(no_data(format!("{}: {}", err.code, err.description))),
        (Some(result), None) => result
            .into_iter()
            .next()
            .ok_or_else(|| no_data("empty result".into()))?,
        (None, None) => return Err(no_data("empty result with no error".into())),
    };

    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| format_err("no quote data".into()))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let at = |v: &[Option<f64>]| v.get(i).copied().flatten();
        let (Some(open), Some(close)) = (at(&quote.open), at(&quote.close)) else {
            continue;
        };
        let timestamp = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| format_err(format!("invalid timestamp: {ts}")))?
            .with_timezone(&timezone);

        bars.push(PriceBar {
            timestamp,
            open,
            high: at(&quote.high).unwrap_or(open.max(close)),
            low: at(&quote.low).unwrap_or(open.min(close)),
            close,
            volume: quote.volume.get(i).copied().flatten(),
        });
    }

    if bars.is_empty() {
        return Err(no_data("no bars in requested range".into()));
    }
    Ok(bars)
}

impl DataPort for YahooAdapter {
    fn fetch_bars(&self, request: &FetchRequest) -> Result<PriceSeries, FxError> {
        let symbol = request.symbol.as_str();
        let url = self.chart_url(request);
        info!(
            symbol,
            interval = %request.interval,
            "fetching {} to {}",
            request.start,
            request.end
        );

        let network_err = |reason: String| FxError::Network {
            symbol: symbol.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| network_err(e.to_string()))?;
        check_status(symbol, resp.status())?;
        let body = resp.text().map_err(|e| network_err(e.to_string()))?;
        let bars = parse_chart(symbol, request.timezone, &body)?;
        info!(symbol, bars = bars.len(), "fetched bars");
        Ok(PriceSeries::from_unsorted(symbol, request.timezone, bars))
    }
}
