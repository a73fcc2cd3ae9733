//! CSV file data adapter.
//!
//! Reads `<base>/<SYMBOL>_<interval>.csv` with a header row and columns
//! `timestamp,open,high,low,close[,volume]`.

use crate::domain::error::FxError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::{DataPort, FetchRequest};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, request: &FetchRequest) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", request.symbol, request.interval))
    }
}

/// RFC 3339 with any offset, or a naive `YYYY-MM-DD[ HH:MM:SS]` taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_price(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
    symbol: &str,
) -> Result<f64, FxError> {
    record
        .get(index)
        .ok_or_else(|| FxError::DataFormat {
            symbol: symbol.to_string(),
            reason: format!("missing {column} column"),
        })?
        .trim()
        .parse()
        .map_err(|e| FxError::DataFormat {
            symbol: symbol.to_string(),
            reason: format!("invalid {column} value: {e}"),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, request: &FetchRequest) -> Result<PriceSeries, FxError> {
        let symbol = request.symbol.as_str();
        let path = self.csv_path(request);
        let content = fs::read_to_string(&path).map_err(|e| FxError::NoData {
            symbol: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| FxError::DataFormat {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {e}"),
            })?;

            let raw_ts = record.get(0).ok_or_else(|| FxError::DataFormat {
                symbol: symbol.to_string(),
                reason: "missing timestamp column".into(),
            })?;
            let timestamp: DateTime<Tz> = parse_timestamp(raw_ts)
                .ok_or_else(|| FxError::DataFormat {
                    symbol: symbol.to_string(),
                    reason: format!("invalid timestamp '{raw_ts}'"),
                })?
                .with_timezone(&request.timezone);

            let date = timestamp.date_naive();
            if date < request.start || date >= request.end {
                continue;
            }

            let volume = match record.get(5).map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(raw.parse::<u64>().map_err(|e| FxError::DataFormat {
                    symbol: symbol.to_string(),
                    reason: format!("invalid volume value: {e}"),
                })?),
            };

            bars.push(PriceBar {
                timestamp,
                open: parse_price(&record, 1, "open", symbol)?,
                high: parse_price(&record, 2, "high", symbol)?,
                low: parse_price(&record, 3, "low", symbol)?,
                close: parse_price(&record, 4, "close", symbol)?,
                volume,
            });
        }

        if bars.is_empty() {
            return Err(FxError::NoData {
                symbol: symbol.to_string(),
                reason: format!(
                    "no {} bars between {} and {} in {}",
                    request.interval,
                    request.start,
                    request.end,
                    path.display()
                ),
            });
        }

        info!(symbol, bars = bars.len(), path = %path.display(), "loaded CSV bars");
        Ok(PriceSeries::from_unsorted(symbol, request.timezone, bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::BarInterval;
    use chrono::NaiveTime;
    use chrono_tz::Europe::London;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let minute_csv = "timestamp,open,high,low,close,volume\n\
            2024-06-03T06:00:00Z,1.1000,1.1002,1.0999,1.1001,0\n\
            2024-06-03T07:00:00Z,1.1010,1.1012,1.1009,1.1011,\n\
            2024-06-04 06:00:00,1.2000,1.2000,1.2000,1.2000,5\n\
            2024-06-03T05:59:00+00:00,1.0990,1.0990,1.0990,1.0990,0\n";
        fs::write(path.join("EURUSD=X_1m.csv"), minute_csv).unwrap();

        let daily_csv = "timestamp,open,high,low,close\n\
            2015-01-02,1.2,1.2,1.2,1.21\n\
            2015-01-05,1.19,1.19,1.19,1.195\n\
            2024-01-01,1.10,1.10,1.10,1.10\n";
        fs::write(path.join("EURUSD=X_1d.csv"), daily_csv).unwrap();

        fs::write(
            path.join("BAD_1d.csv"),
            "timestamp,open,high,low,close\n2015-01-02,abc,1,1,1\n",
        )
        .unwrap();

        (dir, path)
    }

    fn request(
        interval: BarInterval,
        start: (i32, u32, u32),
        end: (i32, u32, u32),
    ) -> FetchRequest {
        FetchRequest {
            symbol: "EURUSD=X".into(),
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            interval,
            timezone: London,
        }
    }

    #[test]
    fn fetch_converts_to_requested_timezone_and_sorts() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter
            .fetch_bars(&request(BarInterval::Minute, (2024, 6, 1), (2024, 6, 10)))
            .unwrap();

        assert_eq!(series.len(), 4);
        let first = &series.bars()[0];
        assert_eq!(first.clock_time(), NaiveTime::from_hms_opt(6, 59, 0).unwrap());
        assert_eq!(first.open, 1.0990);
        assert_eq!(
            series.bars()[1].clock_time(),
            NaiveTime::from_hms_opt(7, 0, 0).unwrap()
        );
        assert_eq!(series.bars()[2].volume, None);
        assert_eq!(series.bars()[3].volume, Some(5));
    }

    #[test]
    fn fetch_end_date_is_exclusive() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let mut req = request(BarInterval::Day, (2015, 1, 1), (2024, 1, 1));
        req.timezone = Tz::UTC;
        let series = adapter.fetch_bars(&req).unwrap();

        assert_eq!(series.len(), 2);
        let closes: Vec<f64> = series.bars().iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.21, 1.195]);
    }

    #[test]
    fn fetch_missing_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let mut req = request(BarInterval::Day, (2015, 1, 1), (2024, 1, 1));
        req.symbol = "GBPUSD=X".into();
        assert!(matches!(adapter.fetch_bars(&req), Err(FxError::NoData { .. })));
    }

    #[test]
    fn fetch_empty_range_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let req = request(BarInterval::Day, (2030, 1, 1), (2031, 1, 1));
        assert!(matches!(adapter.fetch_bars(&req), Err(FxError::NoData { .. })));
    }

    #[test]
    fn fetch_bad_price_is_data_format_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let mut req = request(BarInterval::Day, (2015, 1, 1), (2024, 1, 1));
        req.symbol = "BAD".into();
        assert!(matches!(adapter.fetch_bars(&req), Err(FxError::DataFormat { .. })));
    }

    #[test]
    fn parse_timestamp_formats() {
        assert!(parse_timestamp("2024-06-03T07:00:00+01:00").is_some());
        assert!(parse_timestamp("2024-06-03 07:00:00").is_some());
        assert!(parse_timestamp("2024-06-03").is_some());
        assert!(parse_timestamp("03/06/2024").is_none());
    }
}
