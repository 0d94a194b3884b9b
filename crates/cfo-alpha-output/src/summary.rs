//! Console tables for ranked datasets.

use cfo_alpha_data::{Dataset, TickerRecord};
use serde::Serialize;
use std::fmt;

/// One row of a ranking table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    /// Ticker symbol.
    pub ticker: String,

    /// Industry label (`Unknown` when missing).
    pub industry: String,

    /// Operating cash flow.
    pub cfo: Option<f64>,

    /// Market capitalization.
    pub market_cap: Option<f64>,

    /// Cash flow to market cap ratio, `None` when undefined.
    pub cfo_ratio: Option<f64>,

    /// Percentile rank within the industry.
    pub industry_rank: Option<f64>,
}

impl RankingRow {
    /// Build a row from a record.
    pub fn from_record(record: &TickerRecord) -> Self {
        Self {
            ticker: record.ticker.clone(),
            industry: record.industry_label().to_string(),
            cfo: record.cfo,
            market_cap: record.market_cap,
            cfo_ratio: record.has_ratio().then_some(record.cfo_ratio),
            industry_rank: record.industry_rank,
        }
    }
}

/// A titled table of records ordered by industry rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingTable {
    /// Table title.
    pub title: String,

    /// Rows, highest rank first, unranked last.
    pub rows: Vec<RankingRow>,
}

impl RankingTable {
    /// Every record of `dataset`, sorted by rank descending.
    pub fn ranked(dataset: &Dataset) -> Self {
        Self {
            title: "Ranked Universe".to_string(),
            rows: dataset
                .sorted_by_rank()
                .into_iter()
                .map(RankingRow::from_record)
                .collect(),
        }
    }

    /// Signal records (already filtered), sorted by rank descending.
    pub fn signals(signals: &Dataset, threshold: f64) -> Self {
        Self {
            title: format!("Signals (industry rank > {threshold})"),
            ..Self::ranked(signals)
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&"=".repeat(96));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:<32} {:>12} {:>12} {:>12} {:>12}\n",
            "Ticker", "Industry", "CFO", "Market Cap", "CFO/MC", "Ind. Rank"
        ));
        output.push_str(&"-".repeat(96));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("  (no records)\n");
        }
        for row in &self.rows {
            output.push_str(&format!(
                "{:<8} {:<32} {:>12} {:>12} {:>12} {:>12}\n",
                row.ticker,
                truncate(&row.industry, 32),
                format_amount(row.cfo),
                format_amount(row.market_cap),
                row.cfo_ratio
                    .map_or_else(|| "-".to_string(), |v| format!("{v:.4}")),
                row.industry_rank
                    .map_or_else(|| "-".to_string(), |v| format!("{v:.3}")),
            ));
        }

        output.push_str(&"=".repeat(96));
        output.push('\n');
        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = format!("## {}\n\n", self.title);
        output.push_str("| Ticker | Industry | CFO | Market Cap | CFO/MC | Industry Rank |\n");
        output.push_str("|--------|----------|-----|------------|--------|---------------|\n");
        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                row.ticker,
                row.industry,
                format_amount(row.cfo),
                format_amount(row.market_cap),
                row.cfo_ratio.map_or_else(|| "-".to_string(), |v| format!("{v:.4}")),
                row.industry_rank.map_or_else(|| "-".to_string(), |v| format!("{v:.3}")),
            ));
        }
        output
    }
}

impl fmt::Display for RankingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

/// Format a currency amount with a magnitude suffix (`1.23B`), `-` if missing.
pub fn format_amount(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return "-".to_string();
    };
    let abs = v.abs();
    if abs >= 1e12 {
        format!("{:.2}T", v / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else {
        format!("{v:.0}")
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width - 1).collect();
        short.push('~');
        short
    }
}
