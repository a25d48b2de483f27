//! Domain error types.

/// Top-level error type for candlewatch.
///
/// Indicator computation and signal evaluation never fail; these errors come
/// from loading configuration and candle data.
#[derive(Debug, thiserror::Error)]
pub enum CandlewatchError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid rule: {reason}")]
    RuleInvalid { reason: String },

    #[error("data error in {source_name}: {reason}")]
    Data { source_name: String, reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {candles} candles, need {minimum}")]
    InsufficientData {
        symbol: String,
        candles: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CandlewatchError> for std::process::ExitCode {
    fn from(err: &CandlewatchError) -> Self {
        let code: u8 = match err {
            CandlewatchError::Io(_) => 1,
            CandlewatchError::ConfigParse { .. } | CandlewatchError::ConfigInvalid { .. } => 2,
            CandlewatchError::Data { .. } => 3,
            CandlewatchError::RuleInvalid { .. } => 4,
            CandlewatchError::NoData { .. } | CandlewatchError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
