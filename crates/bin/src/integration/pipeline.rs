//! Batch pipeline: fetch, compute, export, chart, report.

use super::config::ProviderArgs;
use cfo_alpha::universe::{Universe, UniverseError, default_universe, find_universe};
use cfo_alpha::{parse_ticker_list, read_ticker_file};
use cfo_alpha_data::{DataError, Dataset, FetchFailure, FundamentalsFetcher};
use cfo_alpha_output::{
    CSV_FILE_NAME, ChartConfig, ChartError, ChartRenderer, ExportError, REPORT_FILE_NAME,
    RankingTable, ReportBuilder, ReportError, RunReport, write_csv,
};
use cfo_alpha_signals::{DEFAULT_THRESHOLD, SignalConfig, SignalEngine, TieMethod};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors that abort a batch run.
#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Options for a batch run.
#[derive(Debug, Clone, Args)]
pub(crate) struct RunArgs {
    /// Tickers separated by commas or whitespace
    #[arg(long, conflicts_with_all = ["tickers_file", "universe"])]
    pub(crate) tickers: Option<String>,

    /// File with one or more tickers per line (`#` starts a comment)
    #[arg(long, conflicts_with = "universe")]
    pub(crate) tickers_file: Option<PathBuf>,

    /// Built-in universe name (default: large-cap-15)
    #[arg(long)]
    pub(crate) universe: Option<String>,

    /// Directory the CSV, charts and run report are written to
    #[arg(long, env = "CFO_ALPHA_OUTPUT_DIR", default_value = "data")]
    pub(crate) output_dir: PathBuf,

    /// Records must rank strictly above this within their industry
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub(crate) threshold: f64,

    /// Number of bars in the top stocks chart
    #[arg(long, default_value_t = 10)]
    pub(crate) top_n: usize,

    /// Tie convention for industry ranks (min or average)
    #[arg(long, default_value_t = TieMethod::Min)]
    pub(crate) ties: TieMethod,

    #[command(flatten)]
    pub(crate) provider: ProviderArgs,
}

impl RunArgs {
    /// Tickers to screen, in request order.
    pub(crate) fn resolve_tickers(&self) -> Result<Vec<String>, PipelineError> {
        let tickers = if let Some(text) = &self.tickers {
            parse_ticker_list(text)
        } else if let Some(path) = &self.tickers_file {
            read_ticker_file(path)?
        } else if let Some(name) = &self.universe {
            find_universe(name)
                .ok_or_else(|| {
                    PipelineError::InvalidArgument(format!("unknown universe '{name}'"))
                })?
                .symbols()
        } else {
            default_universe().symbols()
        };

        if tickers.is_empty() {
            return Err(PipelineError::InvalidArgument("no tickers given".to_string()));
        }
        Ok(tickers)
    }

    /// Signal engine settings.
    pub(crate) fn signal_config(&self) -> Result<SignalConfig, PipelineError> {
        if !self.threshold.is_finite() {
            return Err(PipelineError::InvalidArgument(format!(
                "threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        Ok(SignalConfig {
            threshold: self.threshold,
            ties: self.ties,
        })
    }

    fn chart_config(&self) -> ChartConfig {
        ChartConfig {
            top_n: self.top_n,
            ..ChartConfig::default()
        }
    }
}

/// Result of the compute stage.
#[derive(Debug, Clone)]
pub(crate) struct Screen {
    /// Every requested ticker with ratio and rank filled in
    pub(crate) computed: Dataset,
    /// Records above the threshold
    pub(crate) signals: Dataset,
}

/// Run the full batch pipeline with the provider chosen on the command line.
pub(crate) async fn run_batch(args: RunArgs) -> Result<RunReport, PipelineError> {
    let tickers = args.resolve_tickers()?;
    let config = args.signal_config()?;
    let interval = args
        .provider
        .min_interval()
        .map_err(PipelineError::InvalidArgument)?;
    let provider = args.provider.provider.connect()?;

    println!("\nCFO Alpha Screen");
    println!("================\n");
    println!("Provider:  {}", provider.name());
    println!("Tickers:   {}", tickers.len());
    println!("Threshold: {} (ties: {})", config.threshold, config.ties);
    println!("Output:    {}\n", args.output_dir.display());

    let fetcher = FundamentalsFetcher::new(provider, interval);
    let report = execute(&fetcher, &tickers, &args, true).await?;

    println!("\nWrote:");
    for output in &report.outputs {
        println!("  {output}");
    }
    Ok(report)
}

/// Fetch `tickers` through `fetcher`, then compute, write and print.
pub(crate) async fn execute(
    fetcher: &FundamentalsFetcher,
    tickers: &[String],
    args: &RunArgs,
    show_progress: bool,
) -> Result<RunReport, PipelineError> {
    let config = args.signal_config()?;

    let pb = if show_progress {
        progress_bar(tickers.len())
    } else {
        ProgressBar::hidden()
    };
    pb.set_message("Fetching fundamentals...");

    let outcome = match fetcher
        .fetch_with_progress(tickers, |done, _, ticker| {
            pb.set_position(done as u64);
            pb.set_message(ticker.to_string());
        })
        .await
    {
        Ok(outcome) => {
            pb.finish_with_message(format!(
                "Done: {} tickers, {} failed",
                outcome.dataset.len(),
                outcome.failures.len()
            ));
            outcome
        }
        Err(e) => {
            pb.abandon_with_message("Failed!");
            return Err(e.into());
        }
    };

    let screen = screen(&outcome.dataset, config);
    info!(
        records = screen.computed.len(),
        signals = screen.signals.len(),
        failed = outcome.failures.len(),
        "screen complete"
    );

    let report = write_outputs(
        &screen,
        fetcher.provider_name(),
        config,
        &args.chart_config(),
        outcome.failures,
        &args.output_dir,
    )?;

    if show_progress {
        print!("{}", RankingTable::ranked(&screen.computed));
        print!("{}", RankingTable::signals(&screen.signals, config.threshold));
        if !report.failures.is_empty() {
            println!("\nFailed tickers:");
            for failure in &report.failures {
                println!("  {:<8} {}", failure.ticker, failure.message);
            }
        }
    }

    Ok(report)
}

/// Compute ratios and ranks, then pick the signals.
pub(crate) fn screen(raw: &Dataset, config: SignalConfig) -> Screen {
    let engine = SignalEngine::new(config);
    let computed = engine.compute(raw);
    let signals = engine.generate_signals(&computed);
    Screen { computed, signals }
}

/// Write the CSV, the charts and the run report into `dir`.
pub(crate) fn write_outputs(
    screen: &Screen,
    provider: &str,
    config: SignalConfig,
    charts: &ChartConfig,
    failures: Vec<FetchFailure>,
    dir: &Path,
) -> Result<RunReport, PipelineError> {
    std::fs::create_dir_all(dir)?;

    let csv_path = dir.join(CSV_FILE_NAME);
    write_csv(&screen.computed, &csv_path)?;
    let chart_paths = ChartRenderer::new(*charts).render_to_dir(&screen.computed, dir)?;

    let report_path = dir.join(REPORT_FILE_NAME);
    let builder = ReportBuilder::new()
        .provider(provider)
        .threshold(config.threshold)
        .ties(config.ties)
        .dataset(&screen.computed)
        .signals(&screen.signals)
        .failures(failures)
        .output(&csv_path);
    let report = chart_paths
        .iter()
        .fold(builder, |builder, path| builder.output(path))
        .output(&report_path)
        .build()?;
    report.write_to(&report_path)?;

    Ok(report)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::test_support::{StaticProvider, energy_and_tech};
    use cfo_alpha_data::FundamentalsProvider;
    use std::sync::Arc;

    fn args(output_dir: PathBuf) -> RunArgs {
        RunArgs {
            tickers: None,
            tickers_file: None,
            universe: None,
            output_dir,
            threshold: DEFAULT_THRESHOLD,
            top_n: 10,
            ties: TieMethod::Min,
            provider: ProviderArgs {
                delay_secs: 0.0,
                ..ProviderArgs::default()
            },
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cfo_alpha_{name}_{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        dir
    }

    fn fetcher(provider: StaticProvider) -> FundamentalsFetcher {
        let provider: Arc<dyn FundamentalsProvider> = Arc::new(provider);
        FundamentalsFetcher::new(provider, Duration::ZERO)
    }

    #[test]
    fn test_resolve_default_universe() {
        let tickers = args(PathBuf::from("data")).resolve_tickers().unwrap();
        assert_eq!(tickers.len(), 15);
        assert_eq!(tickers[0], "AAPL");
    }

    #[test]
    fn test_resolve_explicit_list_and_universe() {
        let mut run = args(PathBuf::from("data"));
        run.tickers = Some("msft, aapl\nMSFT".to_string());
        assert_eq!(run.resolve_tickers().unwrap(), vec!["MSFT", "AAPL"]);

        let mut run = args(PathBuf::from("data"));
        run.universe = Some("Mega-Cap-Tech".to_string());
        assert_eq!(run.resolve_tickers().unwrap().len(), 5);

        run.universe = Some("nope".to_string());
        assert!(matches!(
            run.resolve_tickers(),
            Err(PipelineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_blank_list() {
        let mut run = args(PathBuf::from("data"));
        run.tickers = Some(" , \n".to_string());
        assert!(matches!(
            run.resolve_tickers(),
            Err(PipelineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_resolve_from_file() {
        let dir = scratch_dir("tickers_file");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tickers.txt");
        std::fs::write(&path, "# energy\nxom cvx\n").unwrap();

        let mut run = args(dir.clone());
        run.tickers_file = Some(path);
        assert_eq!(run.resolve_tickers().unwrap(), vec!["XOM", "CVX"]);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_signal_config_rejects_nan_threshold() {
        let mut run = args(PathBuf::from("data"));
        run.threshold = f64::NAN;
        assert!(run.signal_config().is_err());

        run.threshold = 0.5;
        run.ties = TieMethod::Average;
        let config = run.signal_config().unwrap();
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.ties, TieMethod::Average);
    }

    #[tokio::test]
    async fn test_execute_writes_all_outputs() {
        let dir = scratch_dir("execute");
        let run = args(dir.clone());
        let tickers: Vec<String> = ["AAPL", "MSFT", "XOM", "CVX", "FAIL"]
            .iter()
            .map(ToString::to_string)
            .collect();

        let report = execute(&fetcher(energy_and_tech()), &tickers, &run, false)
            .await
            .unwrap();

        assert_eq!(report.provider, "static");
        assert_eq!(report.counts.requested, 5);
        assert_eq!(report.counts.fetched, 4);
        assert_eq!(report.counts.failed, 1);
        assert_eq!(report.counts.with_ratio, 4);
        assert_eq!(report.counts.signals, 1);
        assert_eq!(report.failures[0].ticker, "FAIL");
        assert_eq!(report.outputs.len(), 5);

        for name in [
            CSV_FILE_NAME,
            "cfo_distribution.svg",
            "industry_rankings.svg",
            "top_stocks.svg",
            REPORT_FILE_NAME,
        ] {
            assert!(dir.join(name).exists(), "missing {name}");
        }

        let back = cfo_alpha_output::read_csv(&dir.join(CSV_FILE_NAME)).unwrap();
        assert_eq!(back.tickers(), tickers);
        assert_eq!(back.get("MSFT").unwrap().industry_rank, Some(1.0));
        assert_eq!(back.get("FAIL").unwrap().cfo, None);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_execute_aborts_on_rejected_credentials() {
        let dir = scratch_dir("auth");
        let run = args(dir.clone());
        let tickers = vec!["AAPL".to_string(), "BADKEY".to_string()];

        let err = execute(&fetcher(energy_and_tech()), &tickers, &run, false)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Data(DataError::Authentication(_))));
        assert!(!dir.join(CSV_FILE_NAME).exists());
    }

    #[test]
    fn test_screen_picks_strictly_above_threshold() {
        let raw = Dataset::from_records([
            cfo_alpha_data::TickerRecord::with_fields("A", Some(1.0), Some(10.0), Some("X".into())),
            cfo_alpha_data::TickerRecord::with_fields("B", Some(2.0), Some(10.0), Some("X".into())),
        ])
        .unwrap();

        let result = screen(&raw, SignalConfig::default());
        assert_eq!(result.computed.len(), 2);
        assert_eq!(result.signals.tickers(), vec!["B"]);
    }
}
