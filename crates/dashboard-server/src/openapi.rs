use analysis_core::{InsightReport, Recommendation, StockAnalysis, StockSnapshot};
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::symbol_routes::{ResolvedSymbol, SymbolSuggestions};
use crate::{AppState, HealthStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "InvestIQ API",
        description = "Indian stock data and AI-generated analysis. Every response uses the `{success, data, error}` envelope."
    ),
    paths(
        crate::health_check,
        crate::stock_routes::get_stock,
        crate::stock_routes::get_price_chart,
        crate::stock_routes::get_analysis,
        crate::symbol_routes::resolve_symbol,
        crate::symbol_routes::get_suggestions,
    ),
    components(schemas(
        StockSnapshot,
        StockAnalysis,
        InsightReport,
        Recommendation,
        ResolvedSymbol,
        SymbolSuggestions,
        HealthStatus,
    )),
    tags(
        (name = "System", description = "Service health"),
        (name = "Stocks", description = "NSE/BSE stock snapshots and charts"),
        (name = "Analysis", description = "AI provider chain with rule-based fallback"),
        (name = "Symbols", description = "Symbol parsing and suggestions"),
    )
)]
pub struct ApiDoc;

pub fn openapi_routes() -> Router<AppState> {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
