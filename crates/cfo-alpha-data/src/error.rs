//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance API error: {0}")]
    YahooApi(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage API error: {0}")]
    AlphaVantageApi(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Missing data
    #[error("Missing data for {symbol}: {reason}")]
    MissingData {
        /// Symbol that was queried
        symbol: String,
        /// Reason for missing data
        reason: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Provider rate limit notice
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Rejected or missing credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),
}

impl DataError {
    /// Whether this error invalidates the whole provider connection.
    ///
    /// Fatal errors stop a fetch run; everything else only affects the
    /// ticker being fetched.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        Self::YahooApi(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_authentication_is_fatal() {
        assert!(DataError::Authentication("bad key".to_string()).is_fatal());
        assert!(!DataError::RateLimit("slow down".to_string()).is_fatal());
        assert!(!DataError::InvalidSymbol(String::new()).is_fatal());
        assert!(
            !DataError::MissingData {
                symbol: "AAPL".to_string(),
                reason: "empty".to_string(),
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_display_includes_symbol() {
        let err = DataError::MissingData {
            symbol: "XOM".to_string(),
            reason: "no annual reports".to_string(),
        };
        assert_eq!(err.to_string(), "Missing data for XOM: no annual reports");
    }
}
