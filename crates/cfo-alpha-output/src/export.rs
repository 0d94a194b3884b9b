//! Dataset export and import.
//!
//! The CSV layout is fixed: `ticker,cfo,market_cap,industry,cfo_ratio,industry_rank`,
//! one row per record in dataset order. Numbers use plain decimal notation and
//! missing or NaN values are written as empty fields, so a snapshot can be
//! read back with [`read_csv`].

use cfo_alpha_data::{Dataset, TickerRecord};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

/// CSV header, in column order.
pub const CSV_HEADER: [&str; 6] = [
    "ticker",
    "cfo",
    "market_cap",
    "industry",
    "cfo_ratio",
    "industry_rank",
];

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for Dataset {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv_string(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Render the dataset as CSV text.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn to_csv_string(dataset: &Dataset) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    for record in dataset {
        wtr.write_record([
            record.ticker.clone(),
            format_number(record.cfo),
            format_number(record.market_cap),
            record.industry.clone().unwrap_or_default(),
            format_number(Some(record.cfo_ratio)),
            format_number(record.industry_rank),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// Write the dataset as CSV to `path`.
///
/// # Errors
///
/// Returns an error if serialization or file writing fails.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<(), ExportError> {
    dataset.export_to_file(path, ExportFormat::Csv)
}

/// Read a dataset from a CSV file written by [`write_csv`].
///
/// # Errors
///
/// Returns an error if the file cannot be read, a required column is
/// missing, or a row has a blank ticker.
pub fn read_csv(path: &Path) -> Result<Dataset, ExportError> {
    read_csv_from_reader(File::open(path)?)
}

/// Read a dataset from CSV text.
///
/// Empty or non-numeric numeric fields become missing values (NaN for
/// `cfo_ratio`). Extra columns are ignored.
///
/// # Errors
///
/// Returns an error if a required column is missing or a row has a blank
/// ticker.
pub fn read_csv_from_reader<R: Read>(reader: R) -> Result<Dataset, ExportError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| ExportError::InvalidFormat(format!("missing column '{name}'")))
    };
    let ticker_col = column("ticker")?;
    let optional = |name: &str| headers.iter().position(|h| h.trim() == name);
    let cfo_col = optional("cfo");
    let market_cap_col = optional("market_cap");
    let industry_col = optional("industry");
    let ratio_col = optional("cfo_ratio");
    let rank_col = optional("industry_rank");

    let mut dataset = Dataset::new();
    for (line, row) in rdr.records().enumerate() {
        let row = row?;
        let field = |col: Option<usize>| col.and_then(|c| row.get(c)).map(str::trim);

        let ticker = row.get(ticker_col).unwrap_or_default();
        let mut record = TickerRecord::with_fields(
            ticker,
            field(cfo_col).and_then(parse_number),
            field(market_cap_col).and_then(parse_number),
            field(industry_col)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
        );
        record.cfo_ratio = field(ratio_col).and_then(parse_number).unwrap_or(f64::NAN);
        record.industry_rank = field(rank_col).and_then(parse_number);

        dataset.push(record).map_err(|e| {
            ExportError::InvalidFormat(format!("row {}: {e}", line + 1))
        })?;
    }
    Ok(dataset)
}

fn format_number(value: Option<f64>) -> String {
    value
        .filter(|v| !v.is_nan())
        .map(|v| v.to_string())
        .unwrap_or_default()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Dataset {
        let mut computed = TickerRecord::with_fields(
            "AAPL",
            Some(110_543_000_000.0),
            Some(3_400_000_000_000.0),
            Some("Consumer Electronics".to_string()),
        );
        computed.cfo_ratio = 0.0325;
        computed.industry_rank = Some(1.0);

        Dataset::from_records([
            computed,
            TickerRecord::with_fields("ZERO", Some(100.0), Some(0.0), Some("Energy".to_string())),
            TickerRecord::new("FAIL"),
        ])
        .unwrap()
    }

    #[test]
    fn test_csv_header_and_rows() {
        let csv = sample().export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "ticker,cfo,market_cap,industry,cfo_ratio,industry_rank");
        assert_eq!(
            lines[1],
            "AAPL,110543000000,3400000000000,Consumer Electronics,0.0325,1"
        );
        assert_eq!(lines[2], "ZERO,100,0,Energy,,");
        assert_eq!(lines[3], "FAIL,,,,,");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_csv_never_uses_exponent_form() {
        let mut record = TickerRecord::with_fields("TINY", Some(1.0), Some(1e15), None);
        record.cfo_ratio = 1e-15;
        let dataset = Dataset::from_records([record]).unwrap();

        let csv = to_csv_string(&dataset).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "TINY,1,1000000000000000,,0.000000000000001,");
    }

    #[test]
    fn test_empty_dataset_writes_header_only() {
        let csv = to_csv_string(&Dataset::new()).unwrap();
        assert_eq!(csv.trim_end(), CSV_HEADER.join(","));
    }

    #[test]
    fn test_read_csv_parses_missing_and_garbage() {
        let text = "ticker,cfo,market_cap,industry,cfo_ratio,industry_rank\n\
                    AAPL,100,1000,Tech,0.1,1\n\
                    BAD,n/a,,,,\n";
        let dataset = read_csv_from_reader(text.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        let aapl = dataset.get("AAPL").unwrap();
        assert_eq!(aapl.cfo, Some(100.0));
        assert_relative_eq!(aapl.cfo_ratio, 0.1);
        assert_eq!(aapl.industry_rank, Some(1.0));

        let bad = dataset.get("BAD").unwrap();
        assert_eq!(bad.cfo, None);
        assert_eq!(bad.market_cap, None);
        assert_eq!(bad.industry, None);
        assert!(bad.cfo_ratio.is_nan());
        assert_eq!(bad.industry_rank, None);
    }

    #[test]
    fn test_read_csv_requires_ticker_column() {
        let err = read_csv_from_reader("cfo,market_cap\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ExportError::InvalidFormat(_)));
    }

    #[test]
    fn test_read_csv_rejects_blank_ticker() {
        let err = read_csv_from_reader("ticker,cfo\n ,1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_dataset_json_uses_null_for_missing() {
        let json = sample().export_to_string(ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["ticker"], "AAPL");
        assert!(rows[2]["cfo"].is_null());
        assert!(rows[1]["cfo_ratio"].is_null());
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join("cfo_alpha_export_test.csv");
        write_csv(&sample(), &path).unwrap();

        let back = read_csv(&path).unwrap();
        assert_eq!(back.tickers(), vec!["AAPL", "ZERO", "FAIL"]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
