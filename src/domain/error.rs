//! Domain error types.

/// Top-level error type for smacross.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("invalid split: {reason}")]
    InvalidSplitFraction { reason: String },

    #[error("invalid window: {reason}")]
    InvalidWindow { reason: String },

    #[error("no data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

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

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BacktestError {
    pub(crate) fn invalid_series(reason: impl Into<String>) -> Self {
        BacktestError::InvalidSeries {
            reason: reason.into(),
        }
    }
}

impl From<&BacktestError> for std::process::ExitCode {
    fn from(err: &BacktestError) -> Self {
        let code: u8 = match err {
            BacktestError::Io(_) | BacktestError::Report { .. } => 1,
            BacktestError::ConfigParse { .. }
            | BacktestError::ConfigMissing { .. }
            | BacktestError::ConfigInvalid { .. } => 2,
            BacktestError::DataUnavailable { .. } => 3,
            BacktestError::InvalidSeries { .. }
            | BacktestError::InvalidSplitFraction { .. }
            | BacktestError::InvalidWindow { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
