//! Provider selection and request pacing shared by every subcommand.

use cfo_alpha_data::{
    AlphaVantageProvider, DataError, FundamentalsProvider, YahooFundamentalsProvider,
};
use clap::{Args, ValueEnum};
use std::sync::Arc;
use std::time::Duration;

/// Seconds between provider requests unless overridden.
pub(crate) const DEFAULT_DELAY_SECS: f64 = 12.0;

/// Fundamentals source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ProviderKind {
    /// Yahoo Finance quote summary
    #[default]
    Yahoo,
    /// Alpha Vantage (needs ALPHAVANTAGE_API_KEY)
    #[value(name = "alphavantage", alias = "alpha-vantage")]
    AlphaVantage,
}

impl ProviderKind {
    /// Connect to the selected provider.
    ///
    /// Fails when the connector cannot be built or credentials are missing.
    pub(crate) fn connect(self) -> Result<Arc<dyn FundamentalsProvider>, DataError> {
        Ok(match self {
            Self::Yahoo => Arc::new(YahooFundamentalsProvider::new()?),
            Self::AlphaVantage => Arc::new(AlphaVantageProvider::from_env()?),
        })
    }
}

/// Provider options.
#[derive(Debug, Clone, Args)]
pub(crate) struct ProviderArgs {
    /// Fundamentals provider
    #[arg(long, value_enum, env = "CFO_ALPHA_PROVIDER", default_value_t = ProviderKind::Yahoo)]
    pub(crate) provider: ProviderKind,

    /// Minimum seconds between provider requests
    #[arg(long, env = "CFO_ALPHA_REQUEST_DELAY_SECS", default_value_t = DEFAULT_DELAY_SECS)]
    pub(crate) delay_secs: f64,
}

impl Default for ProviderArgs {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            delay_secs: DEFAULT_DELAY_SECS,
        }
    }
}

impl ProviderArgs {
    /// Request interval as a `Duration`.
    ///
    /// Negative, NaN or overflowing values are rejected.
    pub(crate) fn min_interval(&self) -> Result<Duration, String> {
        Duration::try_from_secs_f64(self.delay_secs)
            .map_err(|e| format!("invalid --delay-secs {}: {e}", self.delay_secs))
    }
}
