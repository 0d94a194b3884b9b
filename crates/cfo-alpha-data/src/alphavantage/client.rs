//! Alpha Vantage HTTP client.

use super::models::{CashFlowStatement, CompanyOverview};
use crate::error::{DataError, Result};
use crate::provider::{Fundamentals, FundamentalsProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Alpha Vantage API base URL
const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";

/// User agent sent with every request
const USER_AGENT: &str = "cfo-alpha/0.1";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

/// Alpha Vantage fundamentals provider.
pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for AlphaVantageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlphaVantageProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AlphaVantageProvider {
    /// Create a provider with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Authentication`] for a blank key and
    /// [`DataError::Network`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(DataError::Authentication(format!("{API_KEY_ENV} is not set")));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            api_key,
            base_url: ALPHA_VANTAGE_BASE_URL.to_string(),
        })
    }

    /// Create a provider with the key from `ALPHAVANTAGE_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Authentication`] if the variable is unset or blank.
    pub fn from_env() -> Result<Self> {
        Self::new(std::env::var(API_KEY_ENV).unwrap_or_default())
    }

    /// Point the provider at a different host (mock servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call one `function` endpoint for `symbol` and return the JSON body.
    ///
    /// Notices embedded in a 200 response are turned into errors.
    async fn query(&self, function: &str, symbol: &str) -> Result<Value> {
        let url = format!("{}/query", self.base_url);
        debug!(function, symbol, "requesting Alpha Vantage");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", function),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "{function} request for {symbol} failed: HTTP {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        check_notices(&body)?;
        Ok(body)
    }
}

#[async_trait]
impl FundamentalsProvider for AlphaVantageProvider {
    fn name(&self) -> &'static str {
        "alphavantage"
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        if symbol.trim().is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let cash_flow = self.query("CASH_FLOW", symbol).await?;
        let overview = self.query("OVERVIEW", symbol).await?;
        fundamentals_from_responses(symbol, &cash_flow, &overview)
    }
}

/// Build [`Fundamentals`] from raw `CASH_FLOW` and `OVERVIEW` bodies.
///
/// # Errors
///
/// Returns the error a notice in either body maps to,
/// [`DataError::MissingData`] for an empty overview, and
/// [`DataError::Serialization`] for bodies of the wrong shape.
pub fn fundamentals_from_responses(
    symbol: &str,
    cash_flow: &Value,
    overview: &Value,
) -> Result<Fundamentals> {
    check_notices(cash_flow)?;
    check_notices(overview)?;

    if overview.as_object().is_none_or(|o| o.is_empty()) {
        return Err(DataError::MissingData {
            symbol: symbol.to_string(),
            reason: "empty company overview".to_string(),
        });
    }

    let overview: CompanyOverview = serde_json::from_value(overview.clone())?;
    let cash_flow: CashFlowStatement = serde_json::from_value(cash_flow.clone())?;

    Ok(Fundamentals {
        ticker: symbol.to_string(),
        cfo: cash_flow.latest_operating_cashflow(),
        market_cap: overview.market_cap(),
        industry: overview.industry(),
    })
}

/// Map the notices Alpha Vantage returns with HTTP 200 onto errors.
fn check_notices(body: &Value) -> Result<()> {
    let notice = |key: &str| body.get(key).map(notice_text);

    if let Some(message) = notice("Error Message") {
        let lower = message.to_lowercase();
        if lower.contains("apikey") || lower.contains("api key") {
            return Err(DataError::Authentication(message));
        }
        return Err(DataError::AlphaVantageApi(message));
    }
    if let Some(message) = notice("Note").or_else(|| notice("Information")) {
        return Err(DataError::RateLimit(message));
    }
    Ok(())
}

fn notice_text(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToString::to_string)
}
