//! Cash Flow to Market Cap Ratio
//!
//! Operating cash flow divided by market capitalization. A cash-flow yield:
//! higher values mean more operating cash per unit of market value.

use crate::signal::Signal;
use cfo_alpha_data::Dataset;

/// Compute `cfo / market_cap`.
///
/// Returns NaN when either operand is missing or non-finite, when the market
/// cap is zero, or when the quotient itself is not finite.
pub fn cfo_ratio(cfo: Option<f64>, market_cap: Option<f64>) -> f64 {
    match (cfo, market_cap) {
        (Some(cfo), Some(cap)) if cfo.is_finite() && cap.is_finite() && cap != 0.0 => {
            let ratio = cfo / cap;
            if ratio.is_finite() { ratio } else { f64::NAN }
        }
        _ => f64::NAN,
    }
}

/// Fills `cfo_ratio` for every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct CfoRatioSignal;

impl Signal for CfoRatioSignal {
    fn name(&self) -> &str {
        "cfo_ratio"
    }

    fn required_fields(&self) -> &[&str] {
        &["cfo", "market_cap"]
    }

    fn compute(&self, data: &Dataset) -> Dataset {
        let mut result = data.clone();
        for record in result.records_mut() {
            record.cfo_ratio = cfo_ratio(record.cfo, record.market_cap);
        }
        result
    }
}
