//! Signal engine walkthrough on a small hand-made dataset.
//!
//! Run with: cargo run --example signal_demo -p cfo-alpha-signals

use cfo_alpha_data::{Dataset, TickerRecord};
use cfo_alpha_signals::{SignalConfig, SignalEngine, TieMethod};

fn record(ticker: &str, cfo: f64, market_cap: f64, industry: &str) -> TickerRecord {
    TickerRecord::with_fields(ticker, Some(cfo), Some(market_cap), Some(industry.to_string()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("CFO Alpha Signal Demo");
    println!("=====================\n");

    let dataset = Dataset::from_records([
        record("AAPL", 110.5e9, 3.4e12, "Consumer Electronics"),
        record("MSFT", 118.5e9, 3.1e12, "Software"),
        record("ORCL", 18.7e9, 4.7e11, "Software"),
        record("XOM", 55.0e9, 4.6e11, "Oil & Gas"),
        record("CVX", 35.6e9, 2.8e11, "Oil & Gas"),
        TickerRecord::new("DELISTED"),
    ])?;

    for ties in TieMethod::ALL {
        let engine = SignalEngine::new(SignalConfig {
            ties,
            ..SignalConfig::default()
        });
        let computed = engine.compute(&dataset);

        println!("Ties: {}", ties);
        println!("{:<10} {:<22} {:>10} {:>8}", "Ticker", "Industry", "CFO/MC", "Rank");
        for r in computed.sorted_by_rank() {
            let rank = r.industry_rank.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v));
            println!(
                "{:<10} {:<22} {:>10.4} {:>8}",
                r.ticker,
                r.industry_label(),
                r.cfo_ratio,
                rank
            );
        }

        let signals = engine.generate_signals(&computed);
        println!(
            "Signals above {}: {:?}\n",
            engine.config().threshold,
            signals.tickers()
        );
    }

    Ok(())
}
