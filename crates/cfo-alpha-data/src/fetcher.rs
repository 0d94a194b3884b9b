//! Sequential fundamentals fetching over a ticker universe.
//!
//! Every ticker is fetched in list order, one request at a time, behind a
//! shared [`RateLimiter`]. A ticker whose fetch fails stays in the dataset
//! with all provider fields missing and is listed in
//! [`FetchOutcome::failures`]; only fatal provider errors abort the run.

use crate::dataset::{Dataset, TickerRecord, normalize_ticker};
use crate::error::Result;
use crate::provider::FundamentalsProvider;
use crate::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

/// A ticker whose fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    /// Ticker symbol
    pub ticker: String,
    /// Error message reported by the provider
    pub message: String,
}

impl FetchFailure {
    /// Create a new failure entry.
    pub fn new(ticker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            message: message.into(),
        }
    }
}

/// Result of fetching a ticker universe.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// One record per requested ticker, in request order
    pub dataset: Dataset,
    /// Tickers that could not be fetched
    pub failures: Vec<FetchFailure>,
}

/// Fetches fundamentals for many tickers through one provider.
#[derive(Debug, Clone)]
pub struct FundamentalsFetcher {
    provider: Arc<dyn FundamentalsProvider>,
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl FundamentalsFetcher {
    /// Create a fetcher with its own rate limiter.
    pub fn new(provider: Arc<dyn FundamentalsProvider>, min_interval: Duration) -> Self {
        Self::with_rate_limiter(provider, Arc::new(Mutex::new(RateLimiter::new(min_interval))))
    }

    /// Create a fetcher sharing an existing rate limiter.
    pub const fn with_rate_limiter(
        provider: Arc<dyn FundamentalsProvider>,
        rate_limiter: Arc<Mutex<RateLimiter>>,
    ) -> Self {
        Self {
            provider,
            rate_limiter,
        }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Fetch all tickers.
    ///
    /// # Errors
    ///
    /// Returns the provider error if it is fatal (see
    /// [`crate::DataError::is_fatal`]). Other errors are recorded as failures.
    pub async fn fetch(&self, tickers: &[String]) -> Result<FetchOutcome> {
        self.fetch_with_progress(tickers, |_, _, _| {}).await
    }

    /// Fetch all tickers, calling `on_progress(done, total, ticker)` after
    /// each one.
    ///
    /// Tickers are normalized first; blanks and repeats are dropped.
    ///
    /// # Errors
    ///
    /// Returns the provider error if it is fatal.
    pub async fn fetch_with_progress<F>(
        &self,
        tickers: &[String],
        mut on_progress: F,
    ) -> Result<FetchOutcome>
    where
        F: FnMut(usize, usize, &str) + Send,
    {
        let tickers = unique_tickers(tickers);
        let total = tickers.len();
        let mut outcome = FetchOutcome {
            dataset: Dataset::with_capacity(total),
            failures: Vec::new(),
        };

        for (index, ticker) in tickers.iter().enumerate() {
            self.rate_limiter.lock().await.wait().await;

            let record = match self.provider.fetch_fundamentals(ticker).await {
                Ok(fundamentals) => {
                    debug!(
                        ticker = %ticker,
                        provider = self.provider.name(),
                        cfo = ?fundamentals.cfo,
                        market_cap = ?fundamentals.market_cap,
                        industry = ?fundamentals.industry,
                        "fetched fundamentals"
                    );
                    TickerRecord {
                        ticker: ticker.clone(),
                        ..TickerRecord::from_fundamentals(fundamentals)
                    }
                }
                Err(e) if e.is_fatal() => {
                    error!(ticker = %ticker, error = %e, "provider rejected the connection");
                    return Err(e);
                }
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "failed to fetch fundamentals");
                    outcome
                        .failures
                        .push(FetchFailure::new(ticker.clone(), e.to_string()));
                    TickerRecord::new(ticker.clone())
                }
            };

            outcome.dataset.push(record)?;
            on_progress(index + 1, total, ticker);
        }

        Ok(outcome)
    }
}

fn unique_tickers(tickers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tickers
        .iter()
        .filter_map(|t| normalize_ticker(t))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_tickers() {
        let raw = vec![
            "aapl".to_string(),
            " MSFT ".to_string(),
            String::new(),
            "AAPL".to_string(),
            "xom".to_string(),
        ];
        assert_eq!(unique_tickers(&raw), vec!["AAPL", "MSFT", "XOM"]);
    }

    #[test]
    fn test_fetch_failure_new() {
        let failure = FetchFailure::new("AAPL", "timeout");
        assert_eq!(failure.ticker, "AAPL");
        assert_eq!(failure.message, "timeout");
    }
}
