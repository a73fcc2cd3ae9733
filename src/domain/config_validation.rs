//! Run configuration validation.
//!
//! Checks a fully built config before any data is fetched.

use crate::domain::crossover::CrossoverConfig;
use crate::domain::error::FxError;
use crate::domain::momentum::MomentumConfig;
use chrono::NaiveDate;

/// A fallback window longer than a day can never change a lookup.
pub const MAX_TOLERANCE_MINUTES: u32 = 24 * 60 - 1;

pub fn validate_momentum_config(config: &MomentumConfig) -> Result<(), FxError> {
    validate_symbol("momentum", &config.symbol)?;
    validate_dates("momentum", config.start_date, config.end_date)?;
    if config.session.start > config.session.end {
        return Err(FxError::config_invalid(
            "momentum",
            "session_start",
            "session_start must not be after session_end",
        ));
    }
    for (key, time) in [
        ("signal_time", config.signal_time),
        ("entry_time", config.entry_time),
        ("exit_time", config.exit_time),
    ] {
        if !config.session.contains(time) {
            return Err(FxError::config_invalid(
                "momentum",
                key,
                format!(
                    "{key} {} is outside the session {}-{}",
                    time.format("%H:%M"),
                    config.session.start.format("%H:%M"),
                    config.session.end.format("%H:%M")
                ),
            ));
        }
    }
    if config.entry_time >= config.exit_time {
        return Err(FxError::config_invalid(
            "momentum",
            "exit_time",
            "exit_time must be after entry_time",
        ));
    }
    if config.tolerance_minutes > MAX_TOLERANCE_MINUTES {
        return Err(FxError::config_invalid(
            "momentum",
            "tolerance_minutes",
            format!("tolerance_minutes must be at most {MAX_TOLERANCE_MINUTES}"),
        ));
    }
    Ok(())
}

pub fn validate_crossover_config(config: &CrossoverConfig) -> Result<(), FxError> {
    validate_symbol("crossover", &config.symbol)?;
    validate_dates("crossover", config.start_date, config.end_date)?;
    if config.fast_window == 0 {
        return Err(FxError::config_invalid(
            "crossover",
            "fast_window",
            "fast_window must be positive",
        ));
    }
    if config.slow_window == 0 {
        return Err(FxError::config_invalid(
            "crossover",
            "slow_window",
            "slow_window must be positive",
        ));
    }
    if !(config.periods_per_year.is_finite() && config.periods_per_year > 0.0) {
        return Err(FxError::config_invalid(
            "crossover",
            "periods_per_year",
            "periods_per_year must be positive",
        ));
    }
    Ok(())
}

fn validate_symbol(section: &str, symbol: &str) -> Result<(), FxError> {
    if symbol.trim().is_empty() {
        return Err(FxError::ConfigMissing {
            section: section.to_string(),
            key: "symbol".to_string(),
        });
    }
    Ok(())
}

fn validate_dates(section: &str, start: NaiveDate, end: NaiveDate) -> Result<(), FxError> {
    if start >= end {
        return Err(FxError::config_invalid(
            section,
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn momentum() -> MomentumConfig {
        MomentumConfig::with_defaults(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn invalid_key(err: FxError) -> String {
        match err {
            FxError::ConfigInvalid { key, .. } => key,
            FxError::ConfigMissing { key, .. } => key,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn default_configs_are_valid() {
        assert!(validate_momentum_config(&momentum()).is_ok());
        assert!(validate_crossover_config(&CrossoverConfig::default()).is_ok());
    }

    #[test]
    fn momentum_tolerance_is_bounded_by_one_day() {
        let config = MomentumConfig {
            tolerance_minutes: MAX_TOLERANCE_MINUTES,
            ..momentum()
        };
        assert!(validate_momentum_config(&config).is_ok());

        let config = MomentumConfig {
            tolerance_minutes: MAX_TOLERANCE_MINUTES + 1,
            ..momentum()
        };
        assert_eq!(
            invalid_key(validate_momentum_config(&config).unwrap_err()),
            "tolerance_minutes"
        );
    }

    #[test]
    fn momentum_rejects_empty_symbol() {
        let config = MomentumConfig {
            symbol: "  ".into(),
            ..momentum()
        };
        assert_eq!(invalid_key(validate_momentum_config(&config).unwrap_err()), "symbol");
    }

    #[test]
    fn momentum_rejects_reversed_dates() {
        let mut config = momentum();
        std::mem::swap(&mut config.start_date, &mut config.end_date);
        assert_eq!(
            invalid_key(validate_momentum_config(&config).unwrap_err()),
            "start_date"
        );
    }

    #[test]
    fn momentum_rejects_reversed_session() {
        let mut config = momentum();
        config.session.start = t(11, 0);
        assert_eq!(
            invalid_key(validate_momentum_config(&config).unwrap_err()),
            "session_start"
        );
    }

    #[test]
    fn momentum_rejects_reference_time_outside_session() {
        let mut config = momentum();
        config.exit_time = t(11, 0);
        let err = validate_momentum_config(&config).unwrap_err();
        assert!(err.to_string().contains("11:00 is outside the session 07:00-10:00"));
    }

    #[test]
    fn momentum_rejects_exit_before_entry() {
        let mut config = momentum();
        config.entry_time = t(9, 0);
        config.exit_time = t(8, 30);
        assert_eq!(
            invalid_key(validate_momentum_config(&config).unwrap_err()),
            "exit_time"
        );
    }

    #[test]
    fn crossover_rejects_zero_windows() {
        let config = CrossoverConfig {
            fast_window: 0,
            ..CrossoverConfig::default()
        };
        assert_eq!(
            invalid_key(validate_crossover_config(&config).unwrap_err()),
            "fast_window"
        );

        let config = CrossoverConfig {
            slow_window: 0,
            ..CrossoverConfig::default()
        };
        assert_eq!(
            invalid_key(validate_crossover_config(&config).unwrap_err()),
            "slow_window"
        );
    }

    #[test]
    fn crossover_accepts_fast_slower_than_slow() {
        let config = CrossoverConfig {
            fast_window: 60,
            ..CrossoverConfig::default()
        };
        assert!(validate_crossover_config(&config).is_ok());
    }

    #[test]
    fn crossover_rejects_non_positive_periods() {
        let config = CrossoverConfig {
            periods_per_year: 0.0,
            ..CrossoverConfig::default()
        };
        assert_eq!(
            invalid_key(validate_crossover_config(&config).unwrap_err()),
            "periods_per_year"
        );
    }
}
