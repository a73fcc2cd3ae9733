//! Price bar and price series representation.

use crate::domain::error::FxError;
use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use std::fmt;

/// Bar width requested from a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarInterval {
    Minute,
    Day,
}

impl BarInterval {
    /// Provider/file code: `1m` or `1d`.
    pub fn code(&self) -> &'static str {
        match self {
            BarInterval::Minute => "1m",
            BarInterval::Day => "1d",
        }
    }
}

impl fmt::Display for BarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: DateTime<Tz>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PriceBar {
    /// Calendar date in the bar's own timezone.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Wall-clock time in the bar's own timezone.
    pub fn clock_time(&self) -> NaiveTime {
        self.timestamp.time()
    }
}

/// Chronologically ordered bars for one symbol, unique timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    timezone: Tz,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from bars that must already be strictly increasing.
    pub fn new(symbol: &str, timezone: Tz, bars: Vec<PriceBar>) -> Result<Self, FxError> {
        if let Some(pos) = bars
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            let reason = if bars[pos + 1].timestamp == bars[pos].timestamp {
                format!("duplicate timestamp {}", bars[pos].timestamp)
            } else {
                format!(
                    "timestamp {} precedes {}",
                    bars[pos + 1].timestamp,
                    bars[pos].timestamp
                )
            };
            return Err(FxError::InvalidSeries {
                symbol: symbol.to_string(),
                reason,
            });
        }

        let bars = bars
            .into_iter()
            .map(|bar| PriceBar {
                timestamp: bar.timestamp.with_timezone(&timezone),
                ..bar
            })
            .collect();

        Ok(Self {
            symbol: symbol.to_string(),
            timezone,
            bars,
        })
    }

    /// Sort by timestamp and drop later duplicates, then build the series.
    pub fn from_unsorted(symbol: &str, timezone: Tz, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        let bars = bars
            .into_iter()
            .map(|bar| PriceBar {
                timestamp: bar.timestamp.with_timezone(&timezone),
                ..bar
            })
            .collect();
        Self {
            symbol: symbol.to_string(),
            timezone,
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
