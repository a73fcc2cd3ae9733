//! Configuration access port trait.

use crate::domain::error::FxError;
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Missing keys yield `default`; present but malformed keys are errors.
    fn get_uint(&self, section: &str, key: &str, default: u64) -> Result<u64, FxError> {
        match self.get_string(section, key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| {
                FxError::config_invalid(
                    section,
                    key,
                    format!("expected a non-negative integer, got '{raw}'"),
                )
            }),
        }
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, FxError> {
        match self.get_string(section, key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| {
                FxError::config_invalid(section, key, format!("expected a number, got '{raw}'"))
            }),
        }
    }

    fn get_date(&self, section: &str, key: &str) -> Result<Option<NaiveDate>, FxError> {
        self.get_string(section, key)
            .map(|raw| {
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                    FxError::config_invalid(
                        section,
                        key,
                        "invalid date format (expected YYYY-MM-DD)",
                    )
                })
            })
            .transpose()
    }

    fn get_time(&self, section: &str, key: &str, default: NaiveTime) -> Result<NaiveTime, FxError> {
        match self.get_string(section, key) {
            None => Ok(default),
            Some(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| {
                FxError::config_invalid(section, key, "invalid time format (expected HH:MM)")
            }),
        }
    }

    fn get_timezone(&self, section: &str, key: &str, default: Tz) -> Result<Tz, FxError> {
        match self.get_string(section, key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<Tz>().map_err(|_| {
                FxError::config_invalid(section, key, format!("unknown timezone '{raw}'"))
            }),
        }
    }
}
