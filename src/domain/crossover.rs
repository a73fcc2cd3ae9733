//! Daily SMA crossover: long while the fast average is above the slow one.
//!
//! Returns are realized with a one-bar lag: bar `i` earns its close-to-close
//! return only if the signal on bar `i - 1` was long.

use crate::domain::error::FxError;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverConfig {
    pub symbol: String,
    pub timezone: Tz,
    pub start_date: NaiveDate,
    /// Exclusive.
    pub end_date: NaiveDate,
    pub fast_window: usize,
    pub slow_window: usize,
    /// Bars forced flat at the start of the series.
    pub warmup_bars: usize,
    pub periods_per_year: f64,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            symbol: "EURUSD=X".to_string(),
            timezone: Tz::UTC,
            start_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            fast_window: 20,
            slow_window: 50,
            warmup_bars: 50,
            periods_per_year: 252.0,
        }
    }
}

/// Signal transition between consecutive bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionChange {
    Enter,
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalPoint {
    pub timestamp: DateTime<Tz>,
    pub signal: u8,
    pub change: Option<PositionChange>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPoint {
    pub timestamp: DateTime<Tz>,
    pub raw_return: Option<f64>,
    pub strategy_return: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub timestamp: DateTime<Tz>,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverRun {
    pub fast: IndicatorSeries,
    pub slow: IndicatorSeries,
    pub signals: Vec<SignalPoint>,
    pub returns: Vec<ReturnPoint>,
    pub equity_curve: Vec<EquityPoint>,
}

impl CrossoverRun {
    /// Strategy returns for bars that have a previous signal.
    pub fn strategy_returns(&self) -> Vec<f64> {
        self.returns
            .iter()
            .filter_map(|r| r.strategy_return)
            .collect()
    }
}

pub fn generate_signals(
    fast: &IndicatorSeries,
    slow: &IndicatorSeries,
    warmup_bars: usize,
) -> Vec<SignalPoint> {
    let mut signals: Vec<SignalPoint> = Vec::with_capacity(fast.len());

    for (i, point) in fast.values.iter().enumerate() {
        let long = i >= warmup_bars
            && matches!(
                (fast.value_at(i), slow.value_at(i)),
                (Some(f), Some(s)) if f > s
            );
        let signal = u8::from(long);

        let change = signals.last().and_then(|prev| match (prev.signal, signal) {
            (0, 1) => Some(PositionChange::Enter),
            (1, 0) => Some(PositionChange::Exit),
            _ => None,
        });

        signals.push(SignalPoint {
            timestamp: point.timestamp,
            signal,
            change,
        });
    }

    signals
}

/// Signal held going into bar `index`; flat before the first bar.
pub fn previous_signal(signals: &[SignalPoint], index: usize) -> u8 {
    index
        .checked_sub(1)
        .and_then(|i| signals.get(i))
        .map(|p| p.signal)
        .unwrap_or(0)
}

pub fn simulate_returns(bars: &[PriceBar], signals: &[SignalPoint]) -> Vec<ReturnPoint> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let raw_return = i
                .checked_sub(1)
                .map(|prev| bar.close / bars[prev].close - 1.0);
            let position = f64::from(previous_signal(signals, i));
            ReturnPoint {
                timestamp: bar.timestamp,
                raw_return,
                strategy_return: raw_return.map(|r| r * position),
            }
        })
        .collect()
}

/// Cumulative product of (1 + r), seeded at 1, over bars with a defined return.
pub fn equity_curve(returns: &[ReturnPoint]) -> Vec<EquityPoint> {
    returns
        .iter()
        .filter_map(|p| p.strategy_return.map(|r| (p.timestamp, r)))
        .scan(1.0_f64, |equity, (timestamp, r)| {
            *equity *= 1.0 + r;
            Some(EquityPoint {
                timestamp,
                equity: *equity,
            })
        })
        .collect()
}

pub fn run_crossover(
    series: &PriceSeries,
    config: &CrossoverConfig,
) -> Result<CrossoverRun, FxError> {
    const MINIMUM_BARS: usize = 2;
    if series.len() < MINIMUM_BARS {
        return Err(FxError::InsufficientData {
            symbol: series.symbol().to_string(),
            bars: series.len(),
            minimum: MINIMUM_BARS,
        });
    }

    let bars = series.bars();
    let fast = calculate_sma(bars, config.fast_window);
    let slow = calculate_sma(bars, config.slow_window);
    info!(
        symbol = series.symbol(),
        bars = bars.len(),
        "computed {} / {}, warm-up {} bars",
        fast,
        slow,
        config.warmup_bars
    );

    let signals = generate_signals(&fast, &slow, config.warmup_bars);
    let returns = simulate_returns(bars, &signals);
    let equity_curve = equity_curve(&returns);

    Ok(CrossoverRun {
        fast,
        slow,
        signals,
        returns,
        equity_curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Days, TimeZone};

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        let start = Tz::UTC.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: start + Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: None,
            })
            .collect()
    }

    fn signal_points(signals: &[u8]) -> Vec<SignalPoint> {
        let bars = make_bars(&vec![1.0; signals.len()]);
        signals
            .iter()
            .zip(bars.iter())
            .map(|(&signal, bar)| SignalPoint {
                timestamp: bar.timestamp,
                signal,
                change: None,
            })
            .collect()
    }

    fn series(prices: &[f64]) -> PriceSeries {
        PriceSeries::new("EURUSD=X", Tz::UTC, make_bars(prices)).unwrap()
    }

    #[test]
    fn default_config_matches_classic_crossover() {
        let c = CrossoverConfig::default();
        assert_eq!(c.fast_window, 20);
        assert_eq!(c.slow_window, 50);
        assert_eq!(c.warmup_bars, 50);
        assert_eq!(c.start_date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
    }

    #[test]
    fn strategy_return_uses_previous_signal() {
        let bars = make_bars(&[1.0, 1.1, 1.21, 1.331]);
        let signals = signal_points(&[0, 0, 1, 1]);
        let returns = simulate_returns(&bars, &signals);

        assert_eq!(returns[0].raw_return, None);
        assert_eq!(returns[0].strategy_return, None);
        assert_eq!(returns[1].strategy_return, Some(0.0));
        assert_eq!(returns[2].strategy_return, Some(0.0));
        let r3 = returns[3].raw_return.unwrap();
        assert_relative_eq!(r3, 0.1, epsilon = 1e-12);
        assert_eq!(returns[3].strategy_return, Some(r3));
    }

    #[test]
    fn previous_signal_is_flat_for_first_bar() {
        let signals = signal_points(&[1, 0]);
        assert_eq!(previous_signal(&signals, 0), 0);
        assert_eq!(previous_signal(&signals, 1), 1);
    }

    #[test]
    fn equity_is_cumulative_product() {
        let bars = make_bars(&[1.0, 1.1, 0.99, 1.089]);
        let signals = signal_points(&[1, 1, 1, 1]);
        let returns = simulate_returns(&bars, &signals);
        let curve = equity_curve(&returns);

        assert_eq!(curve.len(), 3);
        assert_eq!(curve[0].timestamp, bars[1].timestamp);
        assert_relative_eq!(curve[0].equity, 1.1, epsilon = 1e-12);
        assert_relative_eq!(curve[1].equity, 0.99, epsilon = 1e-12);
        assert_relative_eq!(curve[2].equity, 1.089, epsilon = 1e-12);
    }

    #[test]
    fn signals_forced_flat_before_warmup() {
        // Rising prices put the fast average above the slow one from bar 2.
        let prices: Vec<f64> = (0..10).map(|i| 1.0 + i as f64 * 0.01).collect();
        let bars = make_bars(&prices);
        let fast = calculate_sma(&bars, 2);
        let slow = calculate_sma(&bars, 3);
        let signals = generate_signals(&fast, &slow, 6);

        assert!(signals[..6].iter().all(|s| s.signal == 0));
        assert!(signals[6..].iter().all(|s| s.signal == 1));
        assert_eq!(signals[6].change, Some(PositionChange::Enter));
        assert_eq!(signals.iter().filter(|s| s.change.is_some()).count(), 1);
    }

    #[test]
    fn first_bar_has_no_change_event() {
        let prices = [1.0, 2.0, 3.0];
        let bars = make_bars(&prices);
        let fast = calculate_sma(&bars, 1);
        let slow = calculate_sma(&bars, 2);
        let signals = generate_signals(&fast, &slow, 0);

        assert_eq!(signals[0].signal, 0);
        assert_eq!(signals[0].change, None);
        assert_eq!(signals[1].change, Some(PositionChange::Enter));
    }

    #[test]
    fn exit_event_when_trend_reverses() {
        let prices = [1.0, 2.0, 3.0, 2.0, 1.0];
        let bars = make_bars(&prices);
        let fast = calculate_sma(&bars, 1);
        let slow = calculate_sma(&bars, 2);
        let signals = generate_signals(&fast, &slow, 0);

        let changes: Vec<Option<PositionChange>> = signals.iter().map(|s| s.change).collect();
        assert_eq!(
            changes,
            vec![
                None,
                Some(PositionChange::Enter),
                None,
                Some(PositionChange::Exit),
                None
            ]
        );
    }

    #[test]
    fn run_crossover_rejects_short_series() {
        let result = run_crossover(&series(&[1.0]), &CrossoverConfig::default());
        assert!(matches!(
            result,
            Err(FxError::InsufficientData { bars: 1, minimum: 2, .. })
        ));
    }

    #[test]
    fn run_crossover_wires_all_stages() {
        let prices: Vec<f64> = (0..80).map(|i| 1.0 + i as f64 * 0.001).collect();
        let run = run_crossover(&series(&prices), &CrossoverConfig::default()).unwrap();

        assert_eq!(run.signals.len(), 80);
        assert_eq!(run.returns.len(), 80);
        assert_eq!(run.equity_curve.len(), 79);
        assert_eq!(run.strategy_returns().len(), 79);
        assert_eq!(run.signals[50].change, Some(PositionChange::Enter));
        assert_eq!(run.signals[49].signal, 0);
    }
}
