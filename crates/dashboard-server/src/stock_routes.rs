//! Stock data API routes

use analysis_core::{StockAnalysis, StockSnapshot};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::render::charts::price_chart_svg;
use crate::{ApiResponse, AppError, AppState};

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stocks/:symbol", get(get_stock))
        .route("/api/stocks/:symbol/chart.svg", get(get_price_chart))
        .route("/api/analysis/:symbol", get(get_analysis))
}

#[utoipa::path(
    get,
    path = "/api/stocks/{symbol}",
    params(("symbol" = String, Path, description = "Symbol or company name, e.g. TCS or RELIANCE.NS")),
    responses(
        (status = 200, description = "Comprehensive stock snapshot"),
        (status = 404, description = "Unknown symbol or no price data"),
        (status = 502, description = "Upstream data provider failure")
    ),
    tag = "Stocks"
)]
pub async fn get_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<StockSnapshot>>, AppError> {
    let snapshot = state.orchestrator.get_snapshot(&symbol).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

#[utoipa::path(
    get,
    path = "/api/stocks/{symbol}/chart.svg",
    params(("symbol" = String, Path, description = "Symbol or company name")),
    responses(
        (status = 200, description = "Closing-price line chart", body = String, content_type = "image/svg+xml"),
        (status = 404, description = "Unknown symbol or no price history")
    ),
    tag = "Stocks"
)]
pub async fn get_price_chart(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Response, AppError> {
    let snapshot = state.orchestrator.get_snapshot(&symbol).await?;
    let svg = price_chart_svg(&snapshot.history).map_err(|e| {
        AppError::with_status(
            StatusCode::NOT_FOUND,
            e.context(format!("No chart for {}", snapshot.symbol)),
        )
    })?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

#[utoipa::path(
    get,
    path = "/api/analysis/{symbol}",
    params(("symbol" = String, Path, description = "Symbol or company name")),
    responses(
        (status = 200, description = "Snapshot plus AI or rule-based insight report"),
        (status = 404, description = "Unknown symbol or no price data")
    ),
    tag = "Analysis"
)]
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<StockAnalysis>>, AppError> {
    let analysis = state.orchestrator.analyze(&symbol).await?;
    Ok(Json(ApiResponse::success(analysis)))
}
