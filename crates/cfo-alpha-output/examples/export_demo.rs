//! Demonstration of CSV export, charts and console tables.
//!
//! Run with: cargo run --example export_demo -p cfo-alpha-output

use cfo_alpha_data::{Dataset, TickerRecord};
use cfo_alpha_output::{
    ChartRenderer, ExportFormat, Exporter, RankingTable, ReportBuilder, read_csv, write_csv,
};
use cfo_alpha_signals::SignalEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== CFO Alpha Export Demo ===\n");

    let record = |ticker: &str, cfo: f64, cap: f64, industry: &str| {
        TickerRecord::with_fields(ticker, Some(cfo), Some(cap), Some(industry.to_string()))
    };
    let dataset = Dataset::from_records([
        record("AAPL", 110.5e9, 3.4e12, "Consumer Electronics"),
        record("MSFT", 118.5e9, 3.1e12, "Software"),
        record("ORCL", 18.7e9, 4.7e11, "Software"),
        record("XOM", 55.0e9, 4.6e11, "Oil & Gas"),
        record("CVX", 35.6e9, 2.8e11, "Oil & Gas"),
        TickerRecord::new("DELISTED"),
    ])?;

    let engine = SignalEngine::default();
    let computed = engine.compute(&dataset);
    let signals = engine.generate_signals(&computed);

    let out_dir = std::env::temp_dir().join("cfo_alpha_export_demo");
    std::fs::create_dir_all(&out_dir)?;

    // 1. CSV snapshot
    let csv_path = out_dir.join("signals.csv");
    write_csv(&computed, &csv_path)?;
    println!("1. CSV written to {}", csv_path.display());
    println!("{}", computed.export_to_string(ExportFormat::Csv)?);

    let back = read_csv(&csv_path)?;
    println!("   read back {} records\n", back.len());

    // 2. Charts
    let paths = ChartRenderer::default().render_to_dir(&computed, &out_dir)?;
    println!("2. Charts:");
    for path in &paths {
        println!("   {}", path.display());
    }

    // 3. Tables
    println!("{}", RankingTable::ranked(&computed));
    println!("{}", RankingTable::signals(&signals, engine.config().threshold));

    // 4. Report
    let report = ReportBuilder::new()
        .provider("demo")
        .threshold(engine.config().threshold)
        .dataset(&computed)
        .signals(&signals)
        .output(&csv_path)
        .build()?;
    println!("4. Run report:\n{}", report.to_json()?);

    Ok(())
}
