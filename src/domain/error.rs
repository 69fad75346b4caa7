//! Domain error types.

/// Top-level error type for marketcharts.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("malformed response from {provider}: {reason}")]
    MalformedResponse { provider: String, reason: String },

    #[error("invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("chart rendering failed: {reason}")]
    Render { reason: String },

    #[error("failed to open {path}: {reason}")]
    Viewer { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MarketError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        MarketError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&MarketError> for std::process::ExitCode {
    fn from(err: &MarketError) -> Self {
        let code: u8 = match err {
            MarketError::Io(_) => 1,
            MarketError::ConfigParse { .. } | MarketError::ConfigInvalid { .. } => 2,
            MarketError::Transport { .. } | MarketError::HttpStatus { .. } => 3,
            MarketError::MalformedResponse { .. } | MarketError::InvalidDate { .. } => 4,
            MarketError::NoData { .. } | MarketError::InsufficientData { .. } => 5,
            MarketError::Render { .. } | MarketError::Viewer { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_message() {
        let err = MarketError::HttpStatus {
            url: "http://example.test/k".into(),
            status: 503,
        };
        assert_eq!(err.to_string(), "http://example.test/k returned HTTP 503");
    }

    #[test]
    fn insufficient_data_message() {
        let err = MarketError::InsufficientData {
            symbol: "TSLA".into(),
            bars: 5,
            minimum: 14,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for TSLA: have 5 bars, need 14"
        );
    }

    #[test]
    fn config_invalid_helper() {
        let err = MarketError::config_invalid("index_plot", "datalen", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid config value [index_plot] datalen: must be positive"
        );
    }

    #[test]
    fn io_error_converts() {
        let err: MarketError = std::io::Error::other("disk full").into();
        assert!(matches!(err, MarketError::Io(_)));
    }
}
