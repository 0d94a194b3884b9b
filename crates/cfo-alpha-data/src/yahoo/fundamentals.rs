//! Fundamental data fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::provider::{Fundamentals, FundamentalsProvider};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Yahoo Finance fundamentals provider.
///
/// Reads the quote summary for a ticker: operating cash flow from
/// `financialData`, market cap from `summaryDetail` and industry from
/// `assetProfile`. The connector handles the crumb handshake itself.
pub struct YahooFundamentalsProvider {
    connector: Mutex<yahoo::YahooConnector>,
}

impl std::fmt::Debug for YahooFundamentalsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooFundamentalsProvider")
            .finish_non_exhaustive()
    }
}

impl YahooFundamentalsProvider {
    /// Create a new Yahoo Finance fundamentals provider.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::YahooApi`] if the connector cannot be built.
    pub fn new() -> Result<Self> {
        Ok(Self {
            connector: Mutex::new(yahoo::YahooConnector::new()?),
        })
    }
}

#[async_trait]
impl FundamentalsProvider for YahooFundamentalsProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        if symbol.trim().is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        debug!(symbol, "requesting Yahoo quote summary");
        let summary = {
            let mut connector = self.connector.lock().await;
            connector.get_ticker_info(symbol).await?
        };

        let data = summary
            .quote_summary
            .and_then(|qs| qs.result)
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| DataError::MissingData {
                symbol: symbol.to_string(),
                reason: "No quote summary returned from Yahoo Finance".to_string(),
            })?;

        let cfo = data
            .financial_data
            .as_ref()
            .and_then(|fd| fd.operating_cashflow)
            .map(|v| v as f64);
        let market_cap = data
            .summary_detail
            .as_ref()
            .and_then(|sd| sd.market_cap)
            .map(|v| v as f64);
        let industry = data
            .asset_profile
            .as_ref()
            .and_then(|ap| ap.industry.clone())
            .filter(|s| !s.trim().is_empty());

        Ok(Fundamentals {
            ticker: symbol.to_string(),
            cfo,
            market_cap,
            industry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_symbol() {
        let provider = YahooFundamentalsProvider::new().unwrap();
        let result = provider.fetch_fundamentals("  ").await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }

    #[test]
    fn test_provider_name() {
        let provider = YahooFundamentalsProvider::new().unwrap();
        assert_eq!(provider.name(), "yahoo");
    }

    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_fetch_fundamentals() {
        let provider = YahooFundamentalsProvider::new().unwrap();
        let data = provider.fetch_fundamentals("AAPL").await.unwrap();

        assert_eq!(data.ticker, "AAPL");
        assert!(data.market_cap.is_some());
        assert!(data.industry.is_some());
    }
}
