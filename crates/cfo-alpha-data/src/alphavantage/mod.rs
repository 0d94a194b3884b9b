//! Alpha Vantage fundamentals provider.
//!
//! Two endpoints are used per ticker: `CASH_FLOW` for the latest annual
//! operating cash flow and `OVERVIEW` for market capitalization and industry.
//! The free tier allows five requests per minute, so callers should keep the
//! fetcher's request interval at its 12 second default.
//!
//! # Example
//!
//! ```no_run
//! use cfo_alpha_data::{AlphaVantageProvider, FundamentalsProvider};
//!
//! # async fn example() -> cfo_alpha_data::Result<()> {
//! let provider = AlphaVantageProvider::from_env()?;
//! let data = provider.fetch_fundamentals("IBM").await?;
//! println!("{} cfo={:?} market_cap={:?}", data.ticker, data.cfo, data.market_cap);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod models;

pub use client::{API_KEY_ENV, AlphaVantageProvider, fundamentals_from_responses};
pub use models::{CashFlowReport, CashFlowStatement, CompanyOverview, parse_amount, parse_text};
