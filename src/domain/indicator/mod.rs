//! Moving-average indicators over a price series.
//!
//! - `IndicatorPoint`: one value per bar, flagged invalid during warm-up
//! - `IndicatorSeries`: the per-bar values of one indicator

pub mod sma;

use chrono::DateTime;
use chrono_tz::Tz;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Tz>,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub period: usize,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value at bar `index`, or `None` before the window is full.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for IndicatorSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMA({})", self.period)
    }
}
