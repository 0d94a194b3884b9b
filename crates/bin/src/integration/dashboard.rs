//! Interactive dashboard server.
//!
//! Serves a single page that posts a ticker list to `/api/analyze` and shows
//! the ranked table, the three charts, the raw records and a CSV download.
//! Requests may overlap; every fetch goes through one shared rate limiter.

use super::config::ProviderArgs;
use super::pipeline::{PipelineError, screen};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cfo_alpha::universe::{Universe, dashboard_universe};
use cfo_alpha::parse_ticker_list;
use cfo_alpha_data::{
    DataError, FetchFailure, FundamentalsFetcher, FundamentalsProvider, RateLimiter,
};
use cfo_alpha_output::{
    ChartConfig, ChartError, ChartRenderer, ExportError, RankingRow, RankingTable,
    RenderedCharts, to_csv_string,
};
use cfo_alpha_signals::{DEFAULT_THRESHOLD, SignalConfig, TieMethod};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Default listen address.
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:8501";

const DEFAULT_TOP_N: usize = 10;

const INDEX_HTML: &str = include_str!("dashboard.html");

/// Options for the dashboard server.
#[derive(Debug, Clone, Args)]
pub(crate) struct DashboardArgs {
    /// Address to listen on
    #[arg(long, env = "CFO_ALPHA_BIND", default_value = DEFAULT_BIND)]
    pub(crate) bind: String,

    #[command(flatten)]
    pub(crate) provider: ProviderArgs,
}

/// Shared handler state.
#[derive(Debug, Clone)]
pub(crate) struct AppState {
    provider: Arc<dyn FundamentalsProvider>,
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl AppState {
    pub(crate) fn new(provider: Arc<dyn FundamentalsProvider>, min_interval: Duration) -> Self {
        Self {
            provider,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(min_interval))),
        }
    }

    fn fetcher(&self) -> FundamentalsFetcher {
        FundamentalsFetcher::with_rate_limiter(
            Arc::clone(&self.provider),
            Arc::clone(&self.rate_limiter),
        )
    }
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnalyzeRequest {
    /// Tickers separated by newlines, spaces or commas
    pub(crate) tickers: String,
    #[serde(default)]
    pub(crate) threshold: Option<f64>,
    #[serde(default)]
    pub(crate) top_n: Option<usize>,
    #[serde(default)]
    pub(crate) ties: Option<TieMethod>,
}

/// Response of `POST /api/analyze`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnalyzeResponse {
    provider: &'static str,
    threshold: f64,
    ties: TieMethod,
    /// Every record, highest rank first
    records: Vec<RankingRow>,
    signals: Vec<RankingRow>,
    failures: Vec<FetchFailure>,
    charts: RenderedCharts,
    csv: String,
}

#[derive(Debug, Serialize)]
struct UniverseResponse {
    name: &'static str,
    tickers: Vec<String>,
}

/// Errors returned to the browser.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Data(e) if e.is_fatal() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self, "analyze request failed");
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Build the dashboard router.
pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/universe", get(universe))
        .route("/api/analyze", post(analyze))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect the provider and serve until Ctrl-C.
pub(crate) async fn serve(args: DashboardArgs) -> Result<(), PipelineError> {
    let interval = args
        .provider
        .min_interval()
        .map_err(PipelineError::InvalidArgument)?;
    let provider = args.provider.provider.connect()?;
    let state = AppState::new(provider, interval);

    let listener = TcpListener::bind(&args.bind).await?;
    info!(
        addr = %listener.local_addr()?,
        provider = state.provider.name(),
        delay_secs = interval.as_secs_f64(),
        "dashboard listening"
    );
    println!("Dashboard running at http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
    }
    info!("shutting down");
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

async fn universe() -> Json<UniverseResponse> {
    let universe = dashboard_universe();
    Json(UniverseResponse {
        name: universe.name(),
        tickers: universe.symbols(),
    })
}

async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let tickers = parse_ticker_list(&request.tickers);
    if tickers.is_empty() {
        return Err(AppError::InvalidRequest("enter at least one ticker".to_string()));
    }
    let config = SignalConfig {
        threshold: request.threshold.unwrap_or(DEFAULT_THRESHOLD),
        ties: request.ties.unwrap_or_default(),
    };
    if !config.threshold.is_finite() {
        return Err(AppError::InvalidRequest("threshold must be finite".to_string()));
    }

    let fetcher = state.fetcher();
    let outcome = fetcher.fetch(&tickers).await?;
    let result = screen(&outcome.dataset, config);

    let charts = ChartRenderer::new(ChartConfig {
        top_n: request.top_n.unwrap_or(DEFAULT_TOP_N),
        ..ChartConfig::default()
    })
    .render_to_strings(&result.computed)?;

    Ok(Json(AnalyzeResponse {
        provider: fetcher.provider_name(),
        threshold: config.threshold,
        ties: config.ties,
        csv: to_csv_string(&result.computed)?,
        records: RankingTable::ranked(&result.computed).rows,
        signals: RankingTable::ranked(&result.signals).rows,
        failures: outcome.failures,
        charts,
    }))
}
