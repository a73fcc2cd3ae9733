//! London-session momentum: one trade per day from three reference opens.
//!
//! The 07:00 → 08:00 move picks the direction; the position is held from
//! the 08:00 open to the 10:00 open.

use crate::domain::error::LookupError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::price_lookup::{price_at_time, DEFAULT_TOLERANCE_MINUTES};
use crate::domain::session::{split_days, DaySlice, SessionWindow};
use chrono::{Days, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumConfig {
    pub symbol: String,
    pub timezone: Tz,
    pub start_date: NaiveDate,
    /// Exclusive.
    pub end_date: NaiveDate,
    pub session: SessionWindow,
    pub signal_time: NaiveTime,
    pub entry_time: NaiveTime,
    pub exit_time: NaiveTime,
    pub tolerance_minutes: u32,
}

pub const DEFAULT_LOOKBACK_DAYS: u64 = 7;

impl MomentumConfig {
    /// EUR/USD over the week ending `today`, London morning session.
    pub fn with_defaults(today: NaiveDate) -> Self {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);
        Self {
            symbol: "EURUSD=X".to_string(),
            timezone: chrono_tz::Europe::London,
            start_date: today
                .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
                .unwrap_or(today),
            end_date: today,
            session: SessionWindow::london_morning(),
            signal_time: hm(7, 0),
            entry_time: hm(8, 0),
            exit_time: hm(10, 0),
            tolerance_minutes: DEFAULT_TOLERANCE_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("long"),
            Direction::Short => f.write_str("short"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub direction: Direction,
    pub signal_price: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub ret: f64,
}

impl Trade {
    /// Direction is long only on a strict rise from the signal to the entry price.
    pub fn from_prices(
        date: NaiveDate,
        signal_price: f64,
        entry_price: f64,
        exit_price: f64,
    ) -> Self {
        let direction = if entry_price > signal_price {
            Direction::Long
        } else {
            Direction::Short
        };
        let ret = match direction {
            Direction::Long => (exit_price - entry_price) / entry_price,
            Direction::Short => (entry_price - exit_price) / entry_price,
        };
        Self {
            date,
            direction,
            signal_price,
            entry_price,
            exit_price,
            ret,
        }
    }
}

/// Why a day produced no trade.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error(transparent)]
    NoPrice(#[from] LookupError),

    #[error("{0}")]
    Unclassified(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Traded(Trade),
    Skipped { date: NaiveDate, reason: SkipReason },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDay {
    pub date: NaiveDate,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentumRun {
    pub trades: Vec<Trade>,
    pub skipped: Vec<SkippedDay>,
}

impl MomentumRun {
    pub fn returns(&self) -> Vec<f64> {
        self.trades.iter().map(|t| t.ret).collect()
    }
}

fn checked_price(label: &str, price: f64) -> Result<f64, SkipReason> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(SkipReason::Unclassified(format!(
            "invalid {label} price {price}"
        )))
    }
}

fn try_trade(day: &DaySlice<'_>, config: &MomentumConfig) -> Result<Trade, SkipReason> {
    let window = config.tolerance_minutes;
    let signal = price_at_time(day, config.signal_time, window)?;
    let entry = price_at_time(day, config.entry_time, window)?;
    let exit = price_at_time(day, config.exit_time, window)?;

    let trade = Trade::from_prices(
        day.date,
        checked_price("signal", signal)?,
        checked_price("entry", entry)?,
        checked_price("exit", exit)?,
    );
    if !trade.ret.is_finite() {
        return Err(SkipReason::Unclassified(format!(
            "non-finite return {}",
            trade.ret
        )));
    }
    Ok(trade)
}

pub fn simulate_day(day: &DaySlice<'_>, config: &MomentumConfig) -> DayOutcome {
    match try_trade(day, config) {
        Ok(trade) => DayOutcome::Traded(trade),
        Err(reason) => DayOutcome::Skipped {
            date: day.date,
            reason,
        },
    }
}

/// Fold per-day outcomes into the run's trades and skipped days.
pub fn simulate(days: &[DaySlice<'_>], config: &MomentumConfig) -> MomentumRun {
    days.iter()
        .map(|day| simulate_day(day, config))
        .fold(MomentumRun::default(), |mut run, outcome| {
            match outcome {
                DayOutcome::Traded(trade) => {
                    info!(
                        date = %trade.date,
                        direction = %trade.direction,
                        "ret={:.5}",
                        trade.ret
                    );
                    run.trades.push(trade);
                }
                DayOutcome::Skipped { date, reason } => {
                    match &reason {
                        SkipReason::NoPrice(e) => warn!(%date, "skipped: {e}"),
                        SkipReason::Unclassified(e) => warn!(%date, "error: {e}"),
                    }
                    run.skipped.push(SkippedDay { date, reason });
                }
            }
            run
        })
}

/// Session-filter the series, then simulate every remaining day.
pub fn run_momentum(series: &PriceSeries, config: &MomentumConfig) -> MomentumRun {
    let days = split_days(series, config.session);
    info!(
        symbol = series.symbol(),
        days = days.len(),
        "simulating session {}-{}",
        config.session.start,
        config.session.end
    );
    simulate(&days, config)
}
