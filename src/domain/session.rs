//! Session-window filtering and per-day slicing of intraday series.

use crate::domain::ohlcv::{PriceBar, PriceSeries};
use chrono::{NaiveDate, NaiveTime};

/// Inclusive clock-time range within a trading day, e.g. 07:00–10:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SessionWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// London morning session, 07:00–10:00.
    pub fn london_morning() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time <= self.end
    }
}

/// Bars of one calendar date that fall inside the session window.
#[derive(Debug, Clone, Copy)]
pub struct DaySlice<'a> {
    pub date: NaiveDate,
    pub bars: &'a [PriceBar],
}

impl<'a> DaySlice<'a> {
    pub fn new(date: NaiveDate, bars: &'a [PriceBar]) -> Self {
        Self { date, bars }
    }
}

/// Split a series into one slice per calendar date, keeping only the bars
/// inside `window`. Dates with no bars in the window produce no slice.
pub fn split_days(series: &PriceSeries, window: SessionWindow) -> Vec<DaySlice<'_>> {
    let bars = series.bars();
    let mut days = Vec::new();
    let mut i = 0;

    while i < bars.len() {
        if !window.contains(bars[i].clock_time()) {
            i += 1;
            continue;
        }
        let date = bars[i].date();
        let start = i;
        while i < bars.len() && bars[i].date() == date && window.contains(bars[i].clock_time()) {
            i += 1;
        }
        days.push(DaySlice::new(date, &bars[start..i]));
    }

    days
}
