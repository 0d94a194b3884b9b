//! Yahoo Finance fundamentals provider.

pub mod fundamentals;

pub use fundamentals::YahooFundamentalsProvider;
