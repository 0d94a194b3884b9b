//! Built-in ticker universes.

use crate::universe::Universe;

const LARGE_CAP_15: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "JPM", "V", "WMT", "JNJ", "PG", "XOM", "BAC",
    "HD", "CVX",
];

const MEGA_CAP_TECH: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "META"];

/// A fixed, named list of tickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticUniverse {
    name: &'static str,
    description: &'static str,
    symbols: &'static [&'static str],
}

impl StaticUniverse {
    /// Create a universe over a static symbol list.
    pub const fn new(
        name: &'static str,
        description: &'static str,
        symbols: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            description,
            symbols,
        }
    }

    /// Universe name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// One-line description.
    pub const fn description(&self) -> &'static str {
        self.description
    }
}

impl Universe for StaticUniverse {
    fn symbols(&self) -> Vec<String> {
        self.symbols.iter().map(|s| (*s).to_string()).collect()
    }
}

/// The universe a batch run screens when no tickers are given.
pub const fn default_universe() -> StaticUniverse {
    StaticUniverse::new(
        "large-cap-15",
        "Fifteen US large caps across tech, financials, staples, health care and energy",
        LARGE_CAP_15,
    )
}

/// The tickers the dashboard form starts with.
pub const fn dashboard_universe() -> StaticUniverse {
    StaticUniverse::new(
        "mega-cap-tech",
        "Five mega-cap technology names",
        MEGA_CAP_TECH,
    )
}

/// Every built-in universe.
pub fn builtin_universes() -> Vec<StaticUniverse> {
    vec![default_universe(), dashboard_universe()]
}

/// Look up a built-in universe by name (case-insensitive).
pub fn find_universe(name: &str) -> Option<StaticUniverse> {
    builtin_universes()
        .into_iter()
        .find(|u| u.name().eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_universe_order() {
        let symbols = default_universe().symbols();
        assert_eq!(symbols.len(), 15);
        assert_eq!(symbols.first().map(String::as_str), Some("AAPL"));
        assert_eq!(symbols.last().map(String::as_str), Some("CVX"));
    }

    #[test]
    fn test_dashboard_universe() {
        assert_eq!(
            dashboard_universe().symbols(),
            vec!["AAPL", "MSFT", "GOOGL", "AMZN", "META"]
        );
    }

    #[test]
    fn test_find_universe() {
        assert_eq!(find_universe("LARGE-CAP-15"), Some(default_universe()));
        assert_eq!(find_universe(" mega-cap-tech "), Some(dashboard_universe()));
        assert_eq!(find_universe("sp500"), None);
        assert_eq!(builtin_universes().len(), 2);
    }

    #[test]
    fn test_symbols_are_unique() {
        for universe in builtin_universes() {
            let mut symbols = universe.symbols();
            symbols.sort();
            symbols.dedup();
            assert_eq!(symbols.len(), universe.size(), "{}", universe.name());
        }
    }
}
