pub mod chat;
pub mod config;
pub mod dashboard_routes;
pub mod embedded_assets;
pub mod openapi;
pub mod render;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod stock_routes;
pub mod symbol_routes;


use std::sync::Arc;

use ai_analysis::AiAnalyzer;
use analysis_core::AnalysisError;
use analysis_orchestrator::AnalysisOrchestrator;
use anyhow::Context;
use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use yahoo_client::StockDataFetcher;

use crate::config::ServerConfig;
use crate::request_id::request_id_middleware;
use crate::security_headers::security_headers_middleware;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(orchestrator: AnalysisOrchestrator, config: ServerConfig) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            sessions: Arc::new(SessionStore::new(config.session_idle_secs)),
            config: Arc::new(config),
        }
    }
}

/// JSON envelope shared by every `/api` endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error rendered as an [`ApiResponse`] with a status code.
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<AnalysisError> for AppError {
    fn from(error: AnalysisError) -> Self {
        let status = match &error {
            AnalysisError::NotFound(_) => StatusCode::NOT_FOUND,
            AnalysisError::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            e if e.is_upstream() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::with_status(status, error.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed ({}): {:#}", self.status, self.error);
        } else {
            tracing::debug!("Request rejected ({}): {}", self.status, self.error);
        }
        let body = ApiResponse::<()>::error(self.error.to_string());
        (self.status, Json(body)).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(dashboard_routes::dashboard_routes())
        .merge(stock_routes::stock_routes())
        .merge(symbol_routes::symbol_routes())
        .merge(openapi::openapi_routes())
        .layer(middleware::from_fn_with_state(
            state.config.enable_hsts,
            security_headers_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub cached_snapshots: usize,
    pub active_sessions: usize,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "System"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(HealthStatus {
        status: "healthy".to_string(),
        service: "investiq-dashboard".to_string(),
        cached_snapshots: state.orchestrator.cache_len(),
        active_sessions: state.sessions.len(),
    }))
}

fn init_tracing() {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt().json().with_env_filter(filter()).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));

    let config = ServerConfig::from_env()?;
    let fetcher = StockDataFetcher::from_env().context("Invalid Yahoo Finance configuration")?;
    let analyzer = AiAnalyzer::from_env().context("Invalid AI provider configuration")?;

    let orchestrator = AnalysisOrchestrator::new(Arc::new(fetcher), Arc::new(analyzer))
        .with_cache_ttl(config.cache_ttl_secs);

    let addr = config.bind_addr();
    let app = create_router(AppState::new(orchestrator, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("💹 InvestIQ dashboard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
