//! Ticker records and the in-memory dataset they form.

use crate::error::{DataError, Result};
use crate::provider::Fundamentals;
use serde::Serialize;
use std::cmp::Ordering;

/// Label used wherever a missing industry has to be displayed.
pub const UNKNOWN_INDUSTRY: &str = "Unknown";

/// Normalize a ticker symbol: trim whitespace and upper-case it.
///
/// Returns `None` for blank input.
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// One row of the dataset.
///
/// `cfo_ratio` is NaN until a signal calculator fills it in, and stays NaN
/// whenever the ratio is undefined.
#[derive(Debug, Clone, Serialize)]
pub struct TickerRecord {
    /// Ticker symbol, unique within a dataset
    pub ticker: String,
    /// Operating cash flow
    pub cfo: Option<f64>,
    /// Market capitalization
    pub market_cap: Option<f64>,
    /// Industry classification
    pub industry: Option<String>,
    /// Operating cash flow divided by market capitalization
    pub cfo_ratio: f64,
    /// Percentile rank of `cfo_ratio` within the industry, in (0, 1]
    pub industry_rank: Option<f64>,
}

impl TickerRecord {
    /// Create a record with every data field missing.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            cfo: None,
            market_cap: None,
            industry: None,
            cfo_ratio: f64::NAN,
            industry_rank: None,
        }
    }

    /// Create a record from raw provider fields.
    pub fn with_fields(
        ticker: impl Into<String>,
        cfo: Option<f64>,
        market_cap: Option<f64>,
        industry: Option<String>,
    ) -> Self {
        Self {
            cfo,
            market_cap,
            industry,
            ..Self::new(ticker)
        }
    }

    /// Build a record from a provider response.
    pub fn from_fundamentals(fundamentals: Fundamentals) -> Self {
        Self::with_fields(
            fundamentals.ticker,
            fundamentals.cfo,
            fundamentals.market_cap,
            fundamentals.industry,
        )
    }

    /// Whether the derived ratio is a usable number.
    pub const fn has_ratio(&self) -> bool {
        !self.cfo_ratio.is_nan()
    }

    /// Whether any provider field is present.
    pub const fn has_data(&self) -> bool {
        self.cfo.is_some() || self.market_cap.is_some() || self.industry.is_some()
    }

    /// Industry name for display, `"Unknown"` when missing.
    pub fn industry_label(&self) -> &str {
        self.industry.as_deref().unwrap_or(UNKNOWN_INDUSTRY)
    }
}

/// Ordered collection of ticker records keyed by ticker.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<TickerRecord>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dataset with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Build a dataset from records, in order.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidSymbol`] if any record has a blank ticker.
    pub fn from_records(records: impl IntoIterator<Item = TickerRecord>) -> Result<Self> {
        let mut dataset = Self::new();
        for record in records {
            dataset.push(record)?;
        }
        Ok(dataset)
    }

    /// Append a record, normalizing its ticker.
    ///
    /// A record whose ticker is already present replaces the existing row in
    /// place, so fetch order is kept and tickers stay unique.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidSymbol`] if the ticker is blank.
    pub fn push(&mut self, mut record: TickerRecord) -> Result<()> {
        record.ticker = normalize_ticker(&record.ticker)
            .ok_or_else(|| DataError::InvalidSymbol("Empty ticker".to_string()))?;

        match self.records.iter_mut().find(|r| r.ticker == record.ticker) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        Ok(())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in dataset order.
    pub fn records(&self) -> &[TickerRecord] {
        &self.records
    }

    /// Mutable access to the records for in-crate transforms.
    ///
    /// Tickers must not be changed through this slice.
    pub fn records_mut(&mut self) -> &mut [TickerRecord] {
        &mut self.records
    }

    /// Iterate over records in dataset order.
    pub fn iter(&self) -> std::slice::Iter<'_, TickerRecord> {
        self.records.iter()
    }

    /// Look up a record by ticker (case-insensitive).
    pub fn get(&self, ticker: &str) -> Option<&TickerRecord> {
        let ticker = normalize_ticker(ticker)?;
        self.records.iter().find(|r| r.ticker == ticker)
    }

    /// Tickers in dataset order.
    pub fn tickers(&self) -> Vec<String> {
        self.records.iter().map(|r| r.ticker.clone()).collect()
    }

    /// Keep the records matching `predicate`, preserving order.
    pub fn filter(&self, predicate: impl Fn(&TickerRecord) -> bool) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// Group record positions by industry, in order of first appearance.
    ///
    /// Positions index into [`Dataset::records`]. Records without an
    /// industry share one `None` group.
    pub fn industry_groups(&self) -> Vec<(Option<&str>, Vec<usize>)> {
        let mut groups: Vec<(Option<&str>, Vec<usize>)> = Vec::new();
        for (index, record) in self.records.iter().enumerate() {
            let key = record.industry.as_deref();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(index),
                None => groups.push((key, vec![index])),
            }
        }
        groups
    }

    /// Records ordered by `industry_rank`, highest first.
    ///
    /// Unranked records come last; ties keep dataset order.
    pub fn sorted_by_rank(&self) -> Vec<&TickerRecord> {
        let mut sorted: Vec<&TickerRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| match (a.industry_rank, b.industry_rank) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        sorted
    }

    /// The `n` records with the largest `cfo_ratio`.
    ///
    /// Records with a NaN ratio are skipped; ties keep dataset order.
    pub fn top_by_ratio(&self, n: usize) -> Vec<&TickerRecord> {
        let mut ranked: Vec<&TickerRecord> =
            self.records.iter().filter(|r| r.has_ratio()).collect();
        ranked.sort_by(|a, b| {
            b.cfo_ratio
                .partial_cmp(&a.cfo_ratio)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a TickerRecord;
    type IntoIter = std::slice::Iter<'a, TickerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for Dataset {
    type Item = TickerRecord;
    type IntoIter = std::vec::IntoIter<TickerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(ticker: &str, ratio: f64, rank: Option<f64>) -> TickerRecord {
        TickerRecord {
            cfo_ratio: ratio,
            industry_rank: rank,
            ..TickerRecord::new(ticker)
        }
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker("  aapl "), Some("AAPL".to_string()));
        assert_eq!(normalize_ticker("brk.b"), Some("BRK.B".to_string()));
        assert_eq!(normalize_ticker("   "), None);
    }

    #[test]
    fn test_new_record_is_empty() {
        let record = TickerRecord::new("AAPL");
        assert!(!record.has_data());
        assert!(!record.has_ratio());
        assert_eq!(record.industry_rank, None);
        assert_eq!(record.industry_label(), UNKNOWN_INDUSTRY);
    }

    #[test]
    fn test_push_rejects_blank_ticker() {
        let mut dataset = Dataset::new();
        let result = dataset.push(TickerRecord::new(" "));
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_push_replaces_duplicate_in_place() {
        let mut dataset = Dataset::new();
        dataset.push(TickerRecord::new("AAPL")).unwrap();
        dataset.push(TickerRecord::new("MSFT")).unwrap();
        dataset
            .push(TickerRecord::with_fields("aapl", Some(1.0), Some(2.0), None))
            .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.tickers(), vec!["AAPL", "MSFT"]);
        assert_eq!(dataset.get("AAPL").unwrap().cfo, Some(1.0));
    }

    #[test]
    fn test_industry_groups_first_seen_order() {
        let dataset = Dataset::from_records([
            TickerRecord::with_fields("XOM", None, None, Some("Oil".to_string())),
            TickerRecord::with_fields("AAPL", None, None, Some("Tech".to_string())),
            TickerRecord::with_fields("ZZZ", None, None, None),
            TickerRecord::with_fields("CVX", None, None, Some("Oil".to_string())),
        ])
        .unwrap();

        let groups = dataset.industry_groups();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], (Some("Oil"), vec![0, 3]));
        assert_eq!(groups[1], (Some("Tech"), vec![1]));
        assert_eq!(groups[2], (None, vec![2]));
    }

    #[test]
    fn test_sorted_by_rank_puts_unranked_last() {
        let dataset = Dataset::from_records([
            ranked("A", 0.1, Some(0.5)),
            ranked("B", f64::NAN, None),
            ranked("C", 0.3, Some(1.0)),
            ranked("D", 0.2, Some(0.5)),
        ])
        .unwrap();

        let order: Vec<&str> = dataset
            .sorted_by_rank()
            .iter()
            .map(|r| r.ticker.as_str())
            .collect();
        assert_eq!(order, vec!["C", "A", "D", "B"]);
    }

    #[test]
    fn test_top_by_ratio_skips_nan_and_keeps_order_on_ties() {
        let dataset = Dataset::from_records([
            ranked("A", 0.2, None),
            ranked("B", f64::NAN, None),
            ranked("C", 0.5, None),
            ranked("D", 0.2, None),
        ])
        .unwrap();

        let top: Vec<&str> = dataset
            .top_by_ratio(10)
            .iter()
            .map(|r| r.ticker.as_str())
            .collect();
        assert_eq!(top, vec!["C", "A", "D"]);

        assert_eq!(dataset.top_by_ratio(1).len(), 1);
        assert!(dataset.top_by_ratio(0).is_empty());
    }

    #[test]
    fn test_filter_preserves_order() {
        let dataset = Dataset::from_records([
            ranked("A", 0.1, Some(0.9)),
            ranked("B", 0.2, Some(0.1)),
            ranked("C", 0.3, Some(0.95)),
        ])
        .unwrap();

        let filtered = dataset.filter(|r| r.industry_rank.is_some_and(|x| x > 0.8));
        assert_eq!(filtered.tickers(), vec!["A", "C"]);
        assert_eq!(dataset.len(), 3);
    }
}
