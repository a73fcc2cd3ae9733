//! CLI definition and dispatch.

use chrono::{Days, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::composite_reporter::CompositeReporter;
use crate::adapters::console_report_adapter::ConsoleReportAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_report_adapter::SvgReportAdapter;
use crate::domain::config_validation::{validate_crossover_config, validate_momentum_config};
use crate::domain::crossover::{run_crossover, CrossoverConfig, CrossoverRun};
use crate::domain::error::FxError;
use crate::domain::metrics::{CrossoverSummary, MomentumSummary};
use crate::domain::momentum::{run_momentum, MomentumConfig, MomentumRun, DEFAULT_LOOKBACK_DAYS};
use crate::domain::ohlcv::BarInterval;
use crate::domain::session::SessionWindow;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{DataPort, FetchRequest};
use crate::ports::report_port::{CrossoverReport, MomentumReport, ReportPort};

#[derive(Parser, Debug)]
#[command(name = "fxbacktest", about = "FX strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// London-session momentum on 1-minute bars
    Momentum(RunArgs),
    /// Daily SMA crossover
    Crossover(RunArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// INI file overriding the built-in run configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Read bars from <DIR>/<SYMBOL>_<interval>.csv instead of Yahoo
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,
    /// Write SVG charts into this directory
    #[arg(long)]
    pub charts: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let today = Local::now().date_naive();
    let result = match cli.command {
        Command::Momentum(args) => run_momentum_command(&args, today),
        Command::Crossover(args) => run_crossover_command(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// No path means the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, FxError> {
    match path {
        None => Ok(FileConfigAdapter::empty()),
        Some(path) => {
            info!("loading config from {}", path.display());
            FileConfigAdapter::from_file(path).map_err(|e| FxError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

fn build_data_port(args: &RunArgs) -> Result<Box<dyn DataPort>, FxError> {
    if let Some(dir) = &args.csv_dir {
        return Ok(Box::new(CsvAdapter::new(dir.clone())));
    }

    #[cfg(feature = "yahoo")]
    {
        Ok(Box::new(crate::adapters::yahoo_adapter::YahooAdapter::new()?))
    }

    #[cfg(not(feature = "yahoo"))]
    {
        Err(FxError::ConfigMissing {
            section: "cli".into(),
            key: "csv-dir (yahoo feature is disabled)".into(),
        })
    }
}

fn build_reporter(args: &RunArgs) -> CompositeReporter {
    let reporter = CompositeReporter::new().with(ConsoleReportAdapter::new());
    match &args.charts {
        Some(dir) => reporter.with(SvgReportAdapter::new(dir.clone())),
        None => reporter,
    }
}

fn run_momentum_command(args: &RunArgs, today: NaiveDate) -> Result<(), FxError> {
    let config = load_config(args.config.as_deref())?;
    let momentum = build_momentum_config(&config, today)?;
    let data_port = build_data_port(args)?;
    let reporter = build_reporter(args);
    run_momentum_pipeline(data_port.as_ref(), &reporter, &momentum)?;
    Ok(())
}

fn run_crossover_command(args: &RunArgs) -> Result<(), FxError> {
    let config = load_config(args.config.as_deref())?;
    let crossover = build_crossover_config(&config)?;
    let data_port = build_data_port(args)?;
    let reporter = build_reporter(args);
    run_crossover_pipeline(data_port.as_ref(), &reporter, &crossover)?;
    Ok(())
}

fn get_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, FxError> {
    let value = config.get_uint(section, key, default as u64)?;
    usize::try_from(value)
        .map_err(|_| FxError::config_invalid(section, key, format!("{value} is too large")))
}

pub fn build_momentum_config(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<MomentumConfig, FxError> {
    const S: &str = "momentum";
    let defaults = MomentumConfig::with_defaults(today);

    let end_date = config.get_date(S, "end_date")?.unwrap_or(defaults.end_date);
    let start_date = match config.get_date(S, "start_date")? {
        Some(date) => date,
        None => {
            let lookback = config.get_uint(S, "lookback_days", DEFAULT_LOOKBACK_DAYS)?;
            end_date
                .checked_sub_days(Days::new(lookback))
                .ok_or_else(|| FxError::config_invalid(S, "lookback_days", "out of range"))?
        }
    };

    let tolerance = config.get_uint(S, "tolerance_minutes", defaults.tolerance_minutes.into())?;
    let tolerance_minutes = u32::try_from(tolerance)
        .map_err(|_| FxError::config_invalid(S, "tolerance_minutes", "out of range"))?;

    let momentum = MomentumConfig {
        symbol: config
            .get_string(S, "symbol")
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.symbol),
        timezone: config.get_timezone(S, "timezone", defaults.timezone)?,
        start_date,
        end_date,
        session: SessionWindow::new(
            config.get_time(S, "session_start", defaults.session.start)?,
            config.get_time(S, "session_end", defaults.session.end)?,
        ),
        signal_time: config.get_time(S, "signal_time", defaults.signal_time)?,
        entry_time: config.get_time(S, "entry_time", defaults.entry_time)?,
        exit_time: config.get_time(S, "exit_time", defaults.exit_time)?,
        tolerance_minutes,
    };

    validate_momentum_config(&momentum)?;
    Ok(momentum)
}

pub fn build_crossover_config(config: &dyn ConfigPort) -> Result<CrossoverConfig, FxError> {
    const S: &str = "crossover";
    let defaults = CrossoverConfig::default();

    let slow_window = get_usize(config, S, "slow_window", defaults.slow_window)?;
    let crossover = CrossoverConfig {
        symbol: config
            .get_string(S, "symbol")
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.symbol),
        timezone: config.get_timezone(S, "timezone", defaults.timezone)?,
        start_date: config.get_date(S, "start_date")?.unwrap_or(defaults.start_date),
        end_date: config.get_date(S, "end_date")?.unwrap_or(defaults.end_date),
        fast_window: get_usize(config, S, "fast_window", defaults.fast_window)?,
        slow_window,
        warmup_bars: get_usize(config, S, "warmup_bars", slow_window)?,
        periods_per_year: config.get_double(S, "periods_per_year", defaults.periods_per_year)?,
    };

    validate_crossover_config(&crossover)?;
    Ok(crossover)
}

/// Fetch minute bars, simulate every session day, and report.
///
/// A run where every day was skipped is reported through
/// `report_no_trades` and is not an error.
pub fn run_momentum_pipeline(
    data_port: &dyn DataPort,
    reporter: &dyn ReportPort,
    config: &MomentumConfig,
) -> Result<MomentumRun, FxError> {
    let request = FetchRequest {
        symbol: config.symbol.clone(),
        start: config.start_date,
        end: config.end_date,
        interval: BarInterval::Minute,
        timezone: config.timezone,
    };
    let series = data_port.fetch_bars(&request)?;
    info!(
        symbol = series.symbol(),
        bars = series.len(),
        timezone = %series.timezone(),
        "series loaded"
    );
    let run = run_momentum(&series, config);

    match MomentumSummary::compute(&run.trades) {
        None => {
            info!(skipped = run.skipped.len(), "no trades executed");
            reporter.report_no_trades(&run)?;
        }
        Some(summary) => {
            info!(
                trades = summary.total_trades,
                skipped = run.skipped.len(),
                "momentum run complete"
            );
            reporter.report_momentum(&MomentumReport {
                symbol: &config.symbol,
                run: &run,
                summary: &summary,
            })?;
        }
    }

    Ok(run)
}

/// Fetch daily bars, run the crossover chain, and report.
pub fn run_crossover_pipeline(
    data_port: &dyn DataPort,
    reporter: &dyn ReportPort,
    config: &CrossoverConfig,
) -> Result<(CrossoverRun, CrossoverSummary), FxError> {
    let request = FetchRequest {
        symbol: config.symbol.clone(),
        start: config.start_date,
        end: config.end_date,
        interval: BarInterval::Day,
        timezone: config.timezone,
    };
    let series = data_port.fetch_bars(&request)?;
    info!(
        symbol = series.symbol(),
        bars = series.len(),
        timezone = %series.timezone(),
        "series loaded"
    );
    let run = run_crossover(&series, config)?;
    let summary = CrossoverSummary::compute(&run, config.periods_per_year);
    info!(
        entries = summary.entries,
        exits = summary.exits,
        "crossover run complete"
    );

    reporter.report_crossover(&CrossoverReport {
        series: &series,
        run: &run,
        summary: &summary,
    })?;

    Ok((run, summary))
}
