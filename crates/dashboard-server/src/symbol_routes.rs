//! Symbol lookup API routes
//!
//! Resolves free-form input to the NSE/BSE tickers the data source is queried with.

use analysis_core::symbols::{
    bse_alternative, normalize_indian_symbol, parse_symbol_input, popular_stocks,
    stock_suggestions,
};
use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::chat::INVALID_SYMBOL_REPLY;
use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ResolveQuery {
    /// Free-form input such as `analyze infosys` or `RELIANCE.NS`
    pub q: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResolvedSymbol {
    pub input: String,
    pub symbol: String,
    pub normalized: String,
    pub bse_alternative: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SymbolSuggestions {
    pub popular: Vec<String>,
    pub suggestions: Vec<String>,
}

pub fn symbol_routes() -> Router<AppState> {
    Router::new()
        .route("/api/symbols/resolve", get(resolve_symbol))
        .route("/api/symbols/suggestions", get(get_suggestions))
}

pub fn resolve(input: &str) -> Option<ResolvedSymbol> {
    let symbol = parse_symbol_input(input)?;
    let normalized = normalize_indian_symbol(&symbol);
    Some(ResolvedSymbol {
        input: input.trim().to_string(),
        bse_alternative: bse_alternative(&normalized),
        symbol,
        normalized,
    })
}

#[utoipa::path(
    get,
    path = "/api/symbols/resolve",
    params(ResolveQuery),
    responses(
        (status = 200, description = "Parsed and exchange-qualified symbol", body = ResolvedSymbol),
        (status = 400, description = "No symbol found in the input")
    ),
    tag = "Symbols"
)]
pub async fn resolve_symbol(
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ApiResponse<ResolvedSymbol>>, AppError> {
    let resolved = resolve(&query.q).ok_or_else(|| {
        AppError::with_status(StatusCode::BAD_REQUEST, anyhow::anyhow!(INVALID_SYMBOL_REPLY))
    })?;
    Ok(Json(ApiResponse::success(resolved)))
}

#[utoipa::path(
    get,
    path = "/api/symbols/suggestions",
    responses((status = 200, description = "Popular and suggested NSE symbols", body = SymbolSuggestions)),
    tag = "Symbols"
)]
pub async fn get_suggestions() -> Json<ApiResponse<SymbolSuggestions>> {
    Json(ApiResponse::success(SymbolSuggestions {
        popular: owned(popular_stocks()),
        suggestions: owned(stock_suggestions()),
    }))
}

fn owned(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_name() {
        let resolved = resolve("analyze infosys").unwrap();
        assert_eq!(resolved.symbol, "INFOSYS");
        assert_eq!(resolved.normalized, "INFY.NS");
        assert_eq!(resolved.bse_alternative.as_deref(), Some("INFY.BO"));
    }

    #[test]
    fn test_resolve_bse_symbol_has_no_alternative() {
        let resolved = resolve("500325.BO");
        assert!(resolved.is_none());

        let resolved = resolve("reliance.bo").unwrap();
        assert_eq!(resolved.normalized, "RELIANCE.BO");
        assert!(resolved.bse_alternative.is_none());
    }

    #[test]
    fn test_resolve_rejects_noise() {
        assert!(resolve("   ").is_none());
        assert!(resolve("what is 2 + 2?").is_none());
    }
}
