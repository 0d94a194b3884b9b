#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cfo-alpha/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod rank;
pub mod ratio;
pub mod signal;

pub use engine::{DEFAULT_THRESHOLD, SignalConfig, SignalEngine, generate_signals};
pub use rank::{
    IndustryRankConfig, IndustryRankSignal, ParseTieMethodError, TieMethod, percentile_ranks,
};
pub use ratio::{CfoRatioSignal, cfo_ratio};
pub use signal::{ConfigurableSignal, Signal};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
