//! Reference-price lookup within one trading day.
//!
//! A reference price is the open of the bar stamped exactly at the target
//! clock time or, failing that, the open of the earliest bar in the closed
//! interval `[target, target + window]`.

use crate::domain::error::LookupError;
use crate::domain::session::DaySlice;
use chrono::{NaiveTime, Timelike};

pub const DEFAULT_TOLERANCE_MINUTES: u32 = 5;

const LAST_MINUTE_OF_DAY: u32 = 23 * 60 + 59;

pub fn price_at(
    day: &DaySlice<'_>,
    hour: u32,
    minute: u32,
    window: u32,
) -> Result<f64, LookupError> {
    let target = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or(LookupError::InvalidTarget { hour, minute })?;

    if let Some(bar) = day.bars.iter().find(|b| b.clock_time() == target) {
        return Ok(bar.open);
    }

    // Window end rolls over the hour (08:58 + 5m = 09:03) and stops at 23:59.
    let end_minutes = (hour * 60 + minute)
        .saturating_add(window)
        .min(LAST_MINUTE_OF_DAY);
    let end = NaiveTime::from_hms_opt(end_minutes / 60, end_minutes % 60, 0)
        .ok_or(LookupError::InvalidTarget { hour, minute })?;

    day.bars
        .iter()
        .filter(|b| {
            let t = b.clock_time();
            t >= target && t <= end
        })
        .min_by_key(|b| b.timestamp)
        .map(|b| b.open)
        .ok_or(LookupError::NoPriceAvailable {
            hour,
            minute,
            window,
        })
}

/// Convenience wrapper taking the target as a `NaiveTime` (seconds ignored).
pub fn price_at_time(
    day: &DaySlice<'_>,
    time: NaiveTime,
    window: u32,
) -> Result<f64, LookupError> {
    price_at(day, time.hour(), time.minute(), window)
}
