//! Run-level statistics for both strategies.

use super::crossover::{CrossoverRun, EquityPoint, PositionChange};
use super::momentum::{Direction, Trade};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumSummary {
    pub total_trades: usize,
    pub long_trades: usize,
    pub short_trades: usize,
    pub trades_won: usize,
    /// Mean per-trade return, in percent.
    pub avg_return: f64,
    /// Share of trades with a strictly positive return, in percent.
    pub win_rate: f64,
}

impl MomentumSummary {
    /// `None` when there are no trades to summarize.
    pub fn compute(trades: &[Trade]) -> Option<Self> {
        if trades.is_empty() {
            return None;
        }

        let total_trades = trades.len();
        let n = total_trades as f64;
        let long_trades = trades
            .iter()
            .filter(|t| t.direction == Direction::Long)
            .count();
        let trades_won = trades.iter().filter(|t| t.ret > 0.0).count();
        let avg_return = trades.iter().map(|t| t.ret).sum::<f64>() / n * 100.0;

        Some(MomentumSummary {
            total_trades,
            long_trades,
            short_trades: total_trades - long_trades,
            trades_won,
            avg_return,
            win_rate: trades_won as f64 / n * 100.0,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverSummary {
    pub sharpe_ratio: f64,
    /// (final equity - 1) in percent.
    pub total_return: f64,
    pub entries: usize,
    pub exits: usize,
    pub bars_in_market: usize,
}

impl CrossoverSummary {
    pub fn compute(run: &CrossoverRun, periods_per_year: f64) -> Self {
        let count = |kind: PositionChange| {
            run.signals
                .iter()
                .filter(|s| s.change == Some(kind))
                .count()
        };

        CrossoverSummary {
            sharpe_ratio: sharpe_ratio(&run.strategy_returns(), periods_per_year),
            total_return: total_return(&run.equity_curve),
            entries: count(PositionChange::Enter),
            exits: count(PositionChange::Exit),
            bars_in_market: run.signals.iter().filter(|s| s.signal == 1).count(),
        }
    }
}

/// Annualized mean / sample standard deviation.
///
/// NaN for fewer than two returns or a zero standard deviation.
pub fn sharpe_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return f64::NAN;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev == 0.0 {
        return f64::NAN;
    }

    mean / stddev * periods_per_year.sqrt()
}

/// NaN for an empty curve.
pub fn total_return(equity_curve: &[EquityPoint]) -> f64 {
    equity_curve
        .last()
        .map(|p| (p.equity - 1.0) * 100.0)
        .unwrap_or(f64::NAN)
}
