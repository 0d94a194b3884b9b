//! Response models for the Alpha Vantage fundamentals endpoints.
//!
//! Alpha Vantage reports every number as a JSON string and uses `"None"` or
//! `"-"` for values it does not have, so fields are kept as strings here and
//! converted with [`parse_amount`] / [`parse_text`].

use serde::{Deserialize, Serialize};

/// `OVERVIEW` response, reduced to the fields this crate reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyOverview {
    /// Industry
    #[serde(rename = "Industry", default)]
    pub industry: Option<String>,

    /// Market capitalization
    #[serde(rename = "MarketCapitalization", default)]
    pub market_capitalization: Option<String>,
}

impl CompanyOverview {
    /// Market capitalization as a number.
    pub fn market_cap(&self) -> Option<f64> {
        self.market_capitalization.as_deref().and_then(parse_amount)
    }

    /// Industry label, if the overview carries one.
    pub fn industry(&self) -> Option<String> {
        self.industry.as_deref().and_then(parse_text)
    }
}

/// One annual cash flow report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowReport {
    /// Cash flow from operating activities
    #[serde(default)]
    pub operating_cashflow: Option<String>,
}

/// `CASH_FLOW` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    /// Annual reports, most recent first
    #[serde(default)]
    pub annual_reports: Vec<CashFlowReport>,
}

impl CashFlowStatement {
    /// Operating cash flow of the most recent fiscal year.
    pub fn latest_operating_cashflow(&self) -> Option<f64> {
        self.annual_reports
            .first()
            .and_then(|report| report.operating_cashflow.as_deref())
            .and_then(parse_amount)
    }
}

/// Parse a numeric field. Placeholders and garbage become `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    parse_text(raw)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a text field, treating `"None"`, `"-"` and blanks as missing.
pub fn parse_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    match trimmed {
        "" | "-" | "None" => None,
        _ => Some(trimmed.to_string()),
    }
}
