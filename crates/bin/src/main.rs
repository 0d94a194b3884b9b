//! CFO alpha CLI binary.
//!
//! Runs the batch screen (the default), serves the interactive dashboard, or
//! lists the built-in ticker universes.

mod integration;

use cfo_alpha::universe::{Universe, builtin_universes, find_universe};
use clap::{Parser, Subcommand};
use integration::dashboard::{self, DashboardArgs};
use integration::pipeline::{self, PipelineError, RunArgs};
use std::process;

#[derive(Parser)]
#[command(name = "cfo-alpha")]
#[command(about = "Operating cash flow to market cap screen, ranked within industry", long_about = None)]
#[command(version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, rank and write signals, charts and a run report (default)
    Run(RunArgs),

    /// Serve the interactive dashboard
    Dashboard(DashboardArgs),

    /// List the built-in ticker universes
    Universe {
        /// Print the tickers of one universe
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run() -> Result<(), PipelineError> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            pipeline::run_batch(cli.run).await?;
        }
        Some(Commands::Run(args)) => {
            pipeline::run_batch(args).await?;
        }
        Some(Commands::Dashboard(args)) => {
            dashboard::serve(args).await?;
        }
        Some(Commands::Universe { name }) => {
            list_universes(name.as_deref())?;
        }
    }

    Ok(())
}

fn list_universes(name: Option<&str>) -> Result<(), PipelineError> {
    if let Some(name) = name {
        let universe = find_universe(name).ok_or_else(|| {
            PipelineError::InvalidArgument(format!("unknown universe '{name}'"))
        })?;
        println!("{} ({} tickers)", universe.name(), universe.size());
        println!("{}\n", universe.description());
        for symbol in universe.symbols() {
            println!("  {}", symbol);
        }
        return Ok(());
    }

    println!("Built-in universes");
    println!("==================\n");
    for universe in builtin_universes() {
        println!(
            "  {:<16} {:>3} tickers  {}",
            universe.name(),
            universe.size(),
            universe.description()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfo_alpha_signals::TieMethod;
    use integration::config::ProviderKind;

    #[test]
    fn test_no_subcommand_runs_batch_with_defaults() {
        let cli = Cli::try_parse_from(["cfo-alpha"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.threshold, 0.8);
        assert_eq!(cli.run.top_n, 10);
        assert_eq!(cli.run.ties, TieMethod::Min);
        assert!(cli.run.tickers.is_none());
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "cfo-alpha",
            "run",
            "--tickers",
            "AAPL,MSFT",
            "--threshold",
            "0.5",
            "--ties",
            "average",
            "--provider",
            "alphavantage",
            "--delay-secs",
            "1",
            "--output-dir",
            "out",
        ])
        .unwrap();

        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.tickers.as_deref(), Some("AAPL,MSFT"));
        assert_eq!(args.threshold, 0.5);
        assert_eq!(args.ties, TieMethod::Average);
        assert_eq!(args.provider.provider, ProviderKind::AlphaVantage);
        assert_eq!(args.provider.delay_secs, 1.0);
        assert_eq!(args.output_dir.to_str(), Some("out"));
    }

    #[test]
    fn test_ticker_sources_conflict() {
        assert!(
            Cli::try_parse_from(["cfo-alpha", "--tickers", "AAPL", "--universe", "mega-cap-tech"])
                .is_err()
        );
    }

    #[test]
    fn test_dashboard_bind() {
        let cli = Cli::try_parse_from(["cfo-alpha", "dashboard", "--bind", "0.0.0.0:9000"]).unwrap();
        let Some(Commands::Dashboard(args)) = cli.command else {
            panic!("expected dashboard subcommand");
        };
        assert_eq!(args.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_list_unknown_universe() {
        assert!(list_universes(Some("nope")).is_err());
        assert!(list_universes(Some("large-cap-15")).is_ok());
        assert!(list_universes(None).is_ok());
    }
}
