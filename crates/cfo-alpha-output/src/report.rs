//! Run report generation.

use cfo_alpha_data::{Dataset, FetchFailure};
use cfo_alpha_signals::{DEFAULT_THRESHOLD, TieMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// File name the batch driver writes the report to.
pub const REPORT_FILE_NAME: &str = "run_report.json";

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field was not set on the builder.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// Record counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    /// Tickers requested after normalization.
    pub requested: usize,

    /// Records with at least one provider field.
    pub fetched: usize,

    /// Tickers whose fetch failed.
    pub failed: usize,

    /// Records with a defined ratio.
    pub with_ratio: usize,

    /// Records ranked above the threshold.
    pub signals: usize,
}

/// Summary of one batch or dashboard run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Provider name.
    pub provider: String,

    /// Signal threshold.
    pub threshold: f64,

    /// Tie convention used for ranking.
    pub ties: TieMethod,

    /// Record counts.
    pub counts: RunCounts,

    /// Tickers that could not be fetched.
    pub failures: Vec<FetchFailure>,

    /// Files written alongside the report.
    pub outputs: Vec<String>,
}

impl RunReport {
    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating run reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    provider: Option<String>,
    threshold: Option<f64>,
    ties: Option<TieMethod>,
    counts: RunCounts,
    failures: Vec<FetchFailure>,
    outputs: Vec<String>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider name.
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Set the signal threshold.
    pub const fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the tie convention.
    pub const fn ties(mut self, ties: TieMethod) -> Self {
        self.ties = Some(ties);
        self
    }

    /// Count the computed dataset: requested, fetched and ratio counts.
    pub fn dataset(mut self, dataset: &Dataset) -> Self {
        self.counts.requested = dataset.len();
        self.counts.fetched = dataset.iter().filter(|r| r.has_data()).count();
        self.counts.with_ratio = dataset.iter().filter(|r| r.has_ratio()).count();
        self
    }

    /// Count the signal subset.
    pub fn signals(mut self, signals: &Dataset) -> Self {
        self.counts.signals = signals.len();
        self
    }

    /// Set the fetch failures.
    pub fn failures(mut self, failures: Vec<FetchFailure>) -> Self {
        self.counts.failed = failures.len();
        self.failures = failures;
        self
    }

    /// Record a written output file.
    pub fn output(mut self, path: &Path) -> Self {
        self.outputs.push(path.display().to_string());
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<RunReport, ReportError> {
        Ok(RunReport {
            generated_at: Utc::now(),
            provider: self.provider.ok_or(ReportError::MissingField("provider"))?,
            threshold: self.threshold.unwrap_or(DEFAULT_THRESHOLD),
            ties: self.ties.unwrap_or_default(),
            counts: self.counts,
            failures: self.failures,
            outputs: self.outputs,
        })
    }
}
