//! Fan-out reporter: forwards every report to each wrapped reporter in order.

use crate::domain::error::FxError;
use crate::domain::momentum::MomentumRun;
use crate::ports::report_port::{CrossoverReport, MomentumReport, ReportPort};

#[derive(Default)]
pub struct CompositeReporter {
    reporters: Vec<Box<dyn ReportPort>>,
}

impl CompositeReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reporter: impl ReportPort + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl ReportPort for CompositeReporter {
    fn report_momentum(&self, report: &MomentumReport<'_>) -> Result<(), FxError> {
        self.reporters
            .iter()
            .try_for_each(|r| r.report_momentum(report))
    }

    fn report_no_trades(&self, run: &MomentumRun) -> Result<(), FxError> {
        self.reporters.iter().try_for_each(|r| r.report_no_trades(run))
    }

    fn report_crossover(&self, report: &CrossoverReport<'_>) -> Result<(), FxError> {
        self.reporters
            .iter()
            .try_for_each(|r| r.report_crossover(report))
    }
}
