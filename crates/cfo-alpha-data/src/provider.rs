//! Provider boundary for fundamental data.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fundamental fields returned by a provider for one ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Ticker symbol as requested
    pub ticker: String,
    /// Operating cash flow
    pub cfo: Option<f64>,
    /// Market capitalization
    pub market_cap: Option<f64>,
    /// Industry classification
    pub industry: Option<String>,
}

impl Fundamentals {
    /// Create an empty response for `ticker`.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }
}

/// A source of operating cash flow, market cap and industry per ticker.
///
/// Implementations issue whatever requests they need for a single ticker and
/// leave pacing to the caller.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync + fmt::Debug {
    /// Short provider name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Fetch fundamentals for one ticker.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DataError::Authentication`] when the provider rejects
    /// the credentials; any other error concerns only this ticker.
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals>;
}
