#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cfo-alpha/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod charts;
pub mod export;
pub mod report;
pub mod summary;

pub use charts::{ChartConfig, ChartError, ChartKind, ChartRenderer, RenderedCharts};
pub use export::{
    CSV_HEADER, ExportError, ExportFormat, Exporter, read_csv, read_csv_from_reader,
    to_csv_string, write_csv,
};
pub use report::{REPORT_FILE_NAME, ReportBuilder, ReportError, RunCounts, RunReport};
pub use summary::{RankingRow, RankingTable, format_amount};

/// File name of the CSV snapshot.
pub const CSV_FILE_NAME: &str = "signals.csv";

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
