#![allow(dead_code)]

use chrono::{Days, NaiveDate, TimeZone};
use chrono_tz::Europe::London;
use chrono_tz::Tz;
use fxbacktest::domain::error::FxError;
use fxbacktest::domain::metrics::{CrossoverSummary, MomentumSummary};
use fxbacktest::domain::momentum::MomentumRun;
pub use fxbacktest::domain::ohlcv::{PriceBar, PriceSeries};
use fxbacktest::ports::data_port::{DataPort, FetchRequest};
use fxbacktest::ports::report_port::{CrossoverReport, MomentumReport, ReportPort};
use std::cell::RefCell;

pub enum MockResponse {
    Bars(Vec<PriceBar>),
    NoData(String),
    Network(String),
}

pub struct MockDataPort {
    pub response: MockResponse,
    pub requests: RefCell<Vec<FetchRequest>>,
}

impl MockDataPort {
    pub fn with_bars(bars: Vec<PriceBar>) -> Self {
        Self {
            response: MockResponse::Bars(bars),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_no_data(reason: &str) -> Self {
        Self {
            response: MockResponse::NoData(reason.to_string()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_network_error(reason: &str) -> Self {
        Self {
            response: MockResponse::Network(reason.to_string()),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, request: &FetchRequest) -> Result<PriceSeries, FxError> {
        self.requests.borrow_mut().push(request.clone());
        match &self.response {
            MockResponse::Bars(bars) => Ok(PriceSeries::from_unsorted(
                &request.symbol,
                request.timezone,
                bars.clone(),
            )),
            MockResponse::NoData(reason) => Err(FxError::NoData {
                symbol: request.symbol.clone(),
                reason: reason.clone(),
            }),
            MockResponse::Network(reason) => Err(FxError::Network {
                symbol: request.symbol.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Records what each report call received.
#[derive(Default)]
pub struct MockReportPort {
    pub momentum: RefCell<Vec<(MomentumRun, MomentumSummary)>>,
    pub no_trades: RefCell<usize>,
    pub crossover: RefCell<Vec<(usize, CrossoverSummary)>>,
}

impl ReportPort for MockReportPort {
    fn report_momentum(&self, report: &MomentumReport<'_>) -> Result<(), FxError> {
        self.momentum
            .borrow_mut()
            .push((report.run.clone(), report.summary.clone()));
        Ok(())
    }

    fn report_no_trades(&self, _run: &MomentumRun) -> Result<(), FxError> {
        *self.no_trades.borrow_mut() += 1;
        Ok(())
    }

    fn report_crossover(&self, report: &CrossoverReport<'_>) -> Result<(), FxError> {
        self.crossover
            .borrow_mut()
            .push((report.series.len(), report.summary.clone()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// London-time 1-minute bar with every price field set to `open`.
pub fn london_bar(day: NaiveDate, h: u32, m: u32, open: f64) -> PriceBar {
    let naive = day.and_hms_opt(h, m, 0).unwrap();
    PriceBar {
        timestamp: London.from_local_datetime(&naive).unwrap(),
        open,
        high: open,
        low: open,
        close: open,
        volume: Some(0),
    }
}

/// A London morning with the three reference opens at 07:00, 08:00 and 10:00
/// and filler bars in between.
pub fn morning(day: NaiveDate, signal: f64, entry: f64, exit: f64) -> Vec<PriceBar> {
    vec![
        london_bar(day, 6, 59, signal),
        london_bar(day, 7, 0, signal),
        london_bar(day, 7, 30, (signal + entry) / 2.0),
        london_bar(day, 8, 0, entry),
        london_bar(day, 9, 0, (entry + exit) / 2.0),
        london_bar(day, 10, 0, exit),
        london_bar(day, 10, 1, exit),
    ]
}

/// One UTC daily bar per close, consecutive calendar days from `start`.
pub fn daily_bars(start: NaiveDate, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let day = start + Days::new(i as u64);
            PriceBar {
                timestamp: Tz::UTC
                    .from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap()),
                open: close,
                high: close,
                low: close,
                close,
                volume: None,
            }
        })
        .collect()
}

/// Falls for `down` bars, then rises for `up` bars.
pub fn v_shape(down: usize, up: usize) -> Vec<f64> {
    let mut closes: Vec<f64> = (0..down).map(|i| 1.20 - i as f64 * 0.002).collect();
    let bottom = closes.last().copied().unwrap_or(1.20);
    closes.extend((1..=up).map(|i| bottom + i as f64 * 0.002));
    closes
}
