#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cfo-alpha/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod universe;

// Re-export main types from sub-crates
pub use cfo_alpha_data as data;
pub use cfo_alpha_output as output;
pub use cfo_alpha_signals as signals;

// Re-export common universe types
pub use universe::{
    StaticUniverse, Universe, UniverseError, builtin_universes, dashboard_universe,
    default_universe, find_universe, parse_ticker_list, read_ticker_file,
};

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
