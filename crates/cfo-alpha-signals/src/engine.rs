//! Signal engine: ratio, industry rank, threshold filter.

use crate::rank::{IndustryRankConfig, IndustryRankSignal, TieMethod};
use crate::ratio::CfoRatioSignal;
use crate::signal::{ConfigurableSignal, Signal};
use cfo_alpha_data::Dataset;
use serde::{Deserialize, Serialize};

/// Default rank threshold for signal generation.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Signal engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Records must rank strictly above this to become signals (default: 0.8)
    pub threshold: f64,
    /// Tie convention for the industry rank (default: min)
    pub ties: TieMethod,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            ties: TieMethod::default(),
        }
    }
}

/// Runs the ratio and rank steps over a dataset.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: SignalConfig,
    ratio: CfoRatioSignal,
    rank: IndustryRankSignal,
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(SignalConfig::default())
    }
}

impl SignalEngine {
    /// Create an engine from a configuration.
    pub fn new(config: SignalConfig) -> Self {
        Self {
            config,
            ratio: CfoRatioSignal,
            rank: IndustryRankSignal::with_config(IndustryRankConfig { ties: config.ties }),
        }
    }

    /// Current configuration.
    pub const fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Fill `cfo_ratio` and `industry_rank` for every record.
    ///
    /// Derived columns are recomputed from scratch, so calling this on an
    /// already computed dataset gives the same result.
    pub fn compute(&self, data: &Dataset) -> Dataset {
        self.rank.compute(&self.ratio.compute(data))
    }

    /// Records ranked strictly above the configured threshold.
    pub fn generate_signals(&self, data: &Dataset) -> Dataset {
        generate_signals(data, self.config.threshold)
    }
}

/// Records whose `industry_rank` is strictly greater than `threshold`, in
/// dataset order. Unranked records never pass.
pub fn generate_signals(data: &Dataset, threshold: f64) -> Dataset {
    data.filter(|record| record.industry_rank.is_some_and(|rank| rank > threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cfo_alpha_data::TickerRecord;
    use rstest::{fixture, rstest};

    fn record(ticker: &str, cfo: f64, market_cap: f64, industry: &str) -> TickerRecord {
        TickerRecord::with_fields(ticker, Some(cfo), Some(market_cap), Some(industry.to_string()))
    }

    #[fixture]
    fn mixed() -> Dataset {
        Dataset::from_records([
            record("AAPL", 10.0, 100.0, "Tech"),
            record("MSFT", 20.0, 100.0, "Tech"),
            record("XOM", 5.0, 100.0, "Energy"),
            record("CVX", 5.0, 100.0, "Energy"),
            record("ZERO", 100.0, 0.0, "Energy"),
            TickerRecord::new("FAIL"),
        ])
        .unwrap()
    }

    #[rstest]
    fn test_compute_worked_example(mixed: Dataset) {
        let result = SignalEngine::default().compute(&mixed);

        assert_relative_eq!(result.get("AAPL").unwrap().cfo_ratio, 0.1);
        assert_relative_eq!(result.get("MSFT").unwrap().cfo_ratio, 0.2);
        assert_eq!(result.get("AAPL").unwrap().industry_rank, Some(0.5));
        assert_eq!(result.get("MSFT").unwrap().industry_rank, Some(1.0));
        assert_eq!(result.get("XOM").unwrap().industry_rank, Some(0.5));
        assert_eq!(result.get("CVX").unwrap().industry_rank, Some(0.5));

        let zero = result.get("ZERO").unwrap();
        assert!(zero.cfo_ratio.is_nan());
        assert_eq!(zero.industry_rank, None);

        let failed = result.get("FAIL").unwrap();
        assert!(failed.cfo_ratio.is_nan());
        assert_eq!(failed.industry_rank, None);
    }

    #[rstest]
    fn test_compute_leaves_input_untouched(mixed: Dataset) {
        let _ = SignalEngine::default().compute(&mixed);
        assert!(mixed.iter().all(|r| r.cfo_ratio.is_nan() && r.industry_rank.is_none()));
    }

    #[rstest]
    fn test_compute_is_idempotent(mixed: Dataset) {
        let engine = SignalEngine::default();
        let once = engine.compute(&mixed);
        let twice = engine.compute(&once);

        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.ticker, b.ticker);
            assert_eq!(a.industry_rank, b.industry_rank);
            assert!(a.cfo_ratio == b.cfo_ratio || (a.cfo_ratio.is_nan() && b.cfo_ratio.is_nan()));
        }
    }

    #[test]
    fn test_four_distinct_ratios_single_industry() {
        let data = Dataset::from_records([
            record("A", 1.0, 10.0, "X"),
            record("B", 2.0, 10.0, "X"),
            record("C", 3.0, 10.0, "X"),
            record("D", 4.0, 10.0, "X"),
        ])
        .unwrap();

        let ranks: Vec<Option<f64>> = SignalEngine::default()
            .compute(&data)
            .iter()
            .map(|r| r.industry_rank)
            .collect();
        assert_eq!(ranks, vec![Some(0.25), Some(0.5), Some(0.75), Some(1.0)]);
    }

    #[rstest]
    fn test_average_ties(mixed: Dataset) {
        let engine = SignalEngine::new(SignalConfig {
            ties: TieMethod::Average,
            ..SignalConfig::default()
        });
        let result = engine.compute(&mixed);
        assert_eq!(result.get("XOM").unwrap().industry_rank, Some(0.75));
        assert_eq!(result.get("CVX").unwrap().industry_rank, Some(0.75));
        assert_eq!(result.get("MSFT").unwrap().industry_rank, Some(1.0));
    }

    #[rstest]
    fn test_generate_signals_threshold_bounds(mixed: Dataset) {
        let computed = SignalEngine::default().compute(&mixed);

        assert!(generate_signals(&computed, 1.0).is_empty());

        let all = generate_signals(&computed, 0.0);
        assert_eq!(all.tickers(), vec!["AAPL", "MSFT", "XOM", "CVX"]);
    }

    #[rstest]
    fn test_generate_signals_is_strict(mixed: Dataset) {
        let computed = SignalEngine::default().compute(&mixed);

        let signals = generate_signals(&computed, 0.5);
        assert_eq!(signals.tickers(), vec!["MSFT"]);

        let default = SignalEngine::default().generate_signals(&computed);
        assert_eq!(default.tickers(), vec!["MSFT"]);
        assert_eq!(computed.len(), 6);
    }

    #[test]
    fn test_default_config() {
        let config = SignalConfig::default();
        assert_relative_eq!(config.threshold, 0.8);
        assert_eq!(config.ties, TieMethod::Min);
        assert_eq!(SignalEngine::default().config(), &config);
    }

    #[test]
    fn test_empty_dataset() {
        let engine = SignalEngine::default();
        let computed = engine.compute(&Dataset::new());
        assert!(computed.is_empty());
        assert!(engine.generate_signals(&computed).is_empty());
    }
}
