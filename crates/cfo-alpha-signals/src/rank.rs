//! Industry Percentile Rank
//!
//! Ranks each record's `cfo_ratio` against the other records of the same
//! industry. Records without an industry are ranked together as one group.
//! Ranks are percentiles in (0, 1]: the best ratio of each group ranks 1.0.

use crate::signal::{ConfigurableSignal, Signal};
use cfo_alpha_data::Dataset;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// How records with equal ratios are ranked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieMethod {
    /// Ties share the lowest position of their block
    #[default]
    Min,
    /// Ties share the mean position of their block
    Average,
}

impl TieMethod {
    /// Every tie method, in display order.
    pub const ALL: [Self; 2] = [Self::Min, Self::Average];

    /// Lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Average => "average",
        }
    }
}

impl fmt::Display for TieMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown tie method name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tie method '{0}', expected 'min' or 'average'")]
pub struct ParseTieMethodError(String);

impl FromStr for TieMethod {
    type Err = ParseTieMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Self::Min),
            "average" | "avg" | "mean" => Ok(Self::Average),
            other => Err(ParseTieMethodError(other.to_string())),
        }
    }
}

/// Percentile ranks of `values`, in input order.
///
/// NaN values are left out of the pool and get `None`. Every other value
/// gets a rank in (0, 1], with ties resolved by `ties`. Equality is exact.
pub fn percentile_ranks(values: &[f64], ties: TieMethod) -> Vec<Option<f64>> {
    let mut ranks = vec![None; values.len()];
    let mut pool: Vec<(usize, f64)> = values
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .collect();
    if pool.is_empty() {
        return ranks;
    }

    pool.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    let n = pool.len() as f64;

    let mut start = 0;
    while start < pool.len() {
        let value = pool[start].1;
        let end = pool[start..]
            .iter()
            .position(|(_, v)| *v != value)
            .map_or(pool.len(), |offset| start + offset);

        // `start` values are strictly lower; the block holds `end - start` ties
        let position = match ties {
            TieMethod::Min => start as f64 + 1.0,
            TieMethod::Average => start as f64 + (end - start + 1) as f64 / 2.0,
        };
        for &(index, _) in &pool[start..end] {
            ranks[index] = Some(position / n);
        }
        start = end;
    }

    ranks
}

/// Configuration for the industry rank signal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryRankConfig {
    /// Tie convention (default: min)
    pub ties: TieMethod,
}

/// Fills `industry_rank` from `cfo_ratio` and `industry`.
#[derive(Debug, Clone, Default)]
pub struct IndustryRankSignal {
    config: IndustryRankConfig,
}

impl Signal for IndustryRankSignal {
    fn name(&self) -> &str {
        "industry_rank"
    }

    fn required_fields(&self) -> &[&str] {
        &["industry", "cfo_ratio"]
    }

    fn compute(&self, data: &Dataset) -> Dataset {
        let groups = data.industry_groups();

        let mut ranks = vec![None; data.len()];
        for (_, members) in &groups {
            let ratios: Vec<f64> = members
                .iter()
                .map(|&i| data.records()[i].cfo_ratio)
                .collect();
            for (&index, rank) in members
                .iter()
                .zip(percentile_ranks(&ratios, self.config.ties))
            {
                ranks[index] = rank;
            }
        }

        debug!(
            industries = groups.len(),
            ranked = ranks.iter().filter(|r| r.is_some()).count(),
            ties = %self.config.ties,
            "computed industry ranks"
        );

        let mut result = data.clone();
        for (record, rank) in result.records_mut().iter_mut().zip(ranks) {
            record.industry_rank = rank;
        }
        result
    }
}

impl ConfigurableSignal for IndustryRankSignal {
    type Config = IndustryRankConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
