//! Domain error types.

/// Failure of a single reference-price lookup within one trading day.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("No price for {hour:02}:{minute:02} ±{window}m")]
    NoPriceAvailable { hour: u32, minute: u32, window: u32 },

    #[error("invalid target time {hour:02}:{minute:02}")]
    InvalidTarget { hour: u32, minute: u32 },
}

/// Top-level error type for fxbacktest.
#[derive(Debug, thiserror::Error)]
pub enum FxError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("network error fetching {symbol}: {reason}")]
    Network { symbol: String, reason: String },

    #[error("no data for {symbol}: {reason}")]
    NoData { symbol: String, reason: String },

    #[error("malformed data for {symbol}: {reason}")]
    DataFormat { symbol: String, reason: String },

    #[error("invalid price series for {symbol}: {reason}")]
    InvalidSeries { symbol: String, reason: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FxError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        FxError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&FxError> for std::process::ExitCode {
    fn from(err: &FxError) -> Self {
        let code: u8 = match err {
            FxError::Io(_) | FxError::Report { .. } => 1,
            FxError::ConfigParse { .. }
            | FxError::ConfigMissing { .. }
            | FxError::ConfigInvalid { .. } => 2,
            FxError::Network { .. } => 3,
            FxError::NoData { .. }
            | FxError::DataFormat { .. }
            | FxError::InvalidSeries { .. }
            | FxError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
