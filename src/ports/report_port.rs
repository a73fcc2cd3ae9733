//! Report rendering port trait.

use crate::domain::crossover::CrossoverRun;
use crate::domain::error::FxError;
use crate::domain::metrics::{CrossoverSummary, MomentumSummary};
use crate::domain::momentum::MomentumRun;
use crate::domain::ohlcv::PriceSeries;

pub struct MomentumReport<'a> {
    pub symbol: &'a str,
    pub run: &'a MomentumRun,
    pub summary: &'a MomentumSummary,
}

pub struct CrossoverReport<'a> {
    pub series: &'a PriceSeries,
    pub run: &'a CrossoverRun,
    pub summary: &'a CrossoverSummary,
}

/// Port for rendering backtest results.
pub trait ReportPort {
    fn report_momentum(&self, report: &MomentumReport<'_>) -> Result<(), FxError>;

    /// Called instead of `report_momentum` when every day was skipped.
    fn report_no_trades(&self, _run: &MomentumRun) -> Result<(), FxError> {
        Ok(())
    }

    fn report_crossover(&self, report: &CrossoverReport<'_>) -> Result<(), FxError>;
}
