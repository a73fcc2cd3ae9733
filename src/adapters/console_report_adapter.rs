//! Plain-text report written to stdout (or any writer).

use crate::domain::error::FxError;
use crate::domain::metrics::MomentumSummary;
use crate::domain::momentum::{MomentumRun, Trade};
use crate::ports::report_port::{CrossoverReport, MomentumReport, ReportPort};
use std::cell::RefCell;
use std::io::{self, Write};

pub const NO_TRADES_MESSAGE: &str =
    "No trades executed. Please verify data availability and time filters.";

pub struct ConsoleReportAdapter<W: Write = io::Stdout> {
    out: RefCell<W>,
}

impl ConsoleReportAdapter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleReportAdapter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleReportAdapter<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

pub fn format_trade_table(trades: &[Trade]) -> String {
    let mut table = format!(
        "{:<12} {:<6} {:>10} {:>10} {:>10} {:>10}\n",
        "date", "dir", "signal", "entry", "exit", "return"
    );
    for t in trades {
        table.push_str(&format!(
            "{:<12} {:<6} {:>10.5} {:>10.5} {:>10.5} {:>10.5}\n",
            t.date.to_string(),
            t.direction.to_string(),
            t.signal_price,
            t.entry_price,
            t.exit_price,
            t.ret
        ));
    }
    table
}

pub fn format_momentum_summary(summary: &MomentumSummary) -> String {
    format!(
        "\n--- STRATEGY RESULTS ---\n\
         Average daily return: {:.4}%\n\
         Win rate: {:.2}%\n\
         Trades: {} ({} long, {} short)\n",
        summary.avg_return,
        summary.win_rate,
        summary.total_trades,
        summary.long_trades,
        summary.short_trades
    )
}

impl<W: Write> ReportPort for ConsoleReportAdapter<W> {
    fn report_momentum(&self, report: &MomentumReport<'_>) -> Result<(), FxError> {
        let mut out = self.out.borrow_mut();
        writeln!(out, "\n{} session momentum", report.symbol)?;
        write!(out, "{}", format_momentum_summary(report.summary))?;
        if !report.run.skipped.is_empty() {
            writeln!(out, "Skipped days: {}", report.run.skipped.len())?;
        }
        writeln!(out, "Detailed trades:")?;
        write!(out, "{}", format_trade_table(&report.run.trades))?;
        out.flush()?;
        Ok(())
    }

    fn report_no_trades(&self, _run: &MomentumRun) -> Result<(), FxError> {
        let mut out = self.out.borrow_mut();
        writeln!(out, "\n{NO_TRADES_MESSAGE}")?;
        out.flush()?;
        Ok(())
    }

    fn report_crossover(&self, report: &CrossoverReport<'_>) -> Result<(), FxError> {
        let s = report.summary;
        let mut out = self.out.borrow_mut();
        writeln!(
            out,
            "{} {} / {} crossover",
            report.series.symbol(),
            report.run.fast,
            report.run.slow
        )?;
        writeln!(
            out,
            "Entries: {}, exits: {}, bars in market: {}",
            s.entries, s.exits, s.bars_in_market
        )?;
        writeln!(out, "Sharpe Ratio: {:.2}", s.sharpe_ratio)?;
        writeln!(out, "Total Return: {:.2}%", s.total_return)?;
        out.flush()?;
        Ok(())
    }
}
