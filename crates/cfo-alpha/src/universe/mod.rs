//! Ticker universes.
//!
//! Two universes are built in: the 15 large caps the batch run screens by
//! default and the five names the dashboard starts with. Ticker lists can also
//! come from free text or a file, one or more symbols per line.

pub mod builtin;

pub use builtin::{StaticUniverse, builtin_universes, dashboard_universe, default_universe, find_universe};

use cfo_alpha_data::normalize_ticker;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a ticker list.
#[derive(Debug, Error)]
pub enum UniverseError {
    /// IO error.
    #[error("Failed to read ticker file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file held no tickers.
    #[error("No tickers found in {0}")]
    Empty(PathBuf),
}

/// Trait for stock universes.
pub trait Universe {
    /// Get all symbols in the universe.
    fn symbols(&self) -> Vec<String>;

    /// Check if a symbol is in the universe.
    fn contains(&self, symbol: &str) -> bool {
        normalize_ticker(symbol).is_some_and(|s| self.symbols().contains(&s))
    }

    /// Get the number of constituents.
    fn size(&self) -> usize {
        self.symbols().len()
    }
}

/// Parse tickers from free text.
///
/// Symbols may be separated by newlines, spaces or commas. They are
/// upper-cased; blanks and repeats are dropped, first occurrence wins.
pub fn parse_ticker_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter_map(normalize_ticker)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Read tickers from a file. Text after `#` on a line is ignored.
///
/// # Errors
///
/// Returns [`UniverseError::Io`] if the file cannot be read and
/// [`UniverseError::Empty`] if it holds no tickers.
pub fn read_ticker_file(path: &Path) -> Result<Vec<String>, UniverseError> {
    let text = std::fs::read_to_string(path).map_err(|source| UniverseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let body: String = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n");

    let tickers = parse_ticker_list(&body);
    if tickers.is_empty() {
        return Err(UniverseError::Empty(path.to_path_buf()));
    }
    Ok(tickers)
}
