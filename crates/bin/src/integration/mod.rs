//! Integration layer tying the data, signal and output crates together.
//!
//! The batch pipeline and the dashboard server share provider configuration
//! and the compute stage; they differ only in how outputs are delivered.

pub(crate) mod config;
pub(crate) mod dashboard;
pub(crate) mod pipeline;
