//! Price data access port trait.

use crate::domain::error::FxError;
use crate::domain::ohlcv::{BarInterval, PriceSeries};
use chrono::NaiveDate;
use chrono_tz::Tz;

/// What to fetch: `start` inclusive, `end` exclusive, bars converted to `timezone`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: BarInterval,
    pub timezone: Tz,
}

pub trait DataPort {
    /// Network failures surface as `FxError::Network`, empty results as
    /// `FxError::NoData`, unparseable payloads as `FxError::DataFormat`.
    fn fetch_bars(&self, request: &FetchRequest) -> Result<PriceSeries, FxError>;
}
