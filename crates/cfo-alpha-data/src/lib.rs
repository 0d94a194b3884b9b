#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cfo-alpha/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod alphavantage;
pub mod dataset;
pub mod error;
pub mod fetcher;
pub mod provider;
pub mod rate_limit;
pub mod yahoo;

pub use alphavantage::AlphaVantageProvider;
pub use dataset::{Dataset, TickerRecord, UNKNOWN_INDUSTRY, normalize_ticker};
pub use error::{DataError, Result};
pub use fetcher::{FetchFailure, FetchOutcome, FundamentalsFetcher};
pub use provider::{Fundamentals, FundamentalsProvider};
pub use rate_limit::RateLimiter;
pub use yahoo::YahooFundamentalsProvider;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
