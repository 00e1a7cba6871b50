//! Local stand-in for the Yahoo endpoints, enforcing the cookie and crumb session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::YahooConfig;

const SESSION_COOKIE: &str = "A3=session";
const CRUMB: &str = "crumb/1";
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Clone, Default)]
pub struct TestYahoo {
    /// Requested paths in order: `summary:SYMBOL` and `chart:SYMBOL:DAYS`.
    pub calls: Arc<Mutex<Vec<String>>>,
    pub crumb_requests: Arc<AtomicUsize>,
    /// Reject the next quote-summary call as if the crumb had expired.
    pub expire_next_crumb: Arc<AtomicBool>,
}

impl TestYahoo {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Serve the fake endpoints on an ephemeral port and return a config pointing at them.
pub async fn spawn(yahoo: TestYahoo) -> YahooConfig {
    let app = Router::new()
        .route("/consent", get(consent))
        .route("/v1/test/getcrumb", get(get_crumb))
        .route("/v10/finance/quoteSummary/:symbol", get(quote_summary))
        .route("/v8/finance/chart/:symbol", get(chart))
        .with_state(yahoo);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    YahooConfig {
        base_url: format!("http://{addr}"),
        cookie_url: format!("http://{addr}/consent"),
        ..Default::default()
    }
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(';').any(|c| c.trim() == SESSION_COOKIE))
}

async fn consent() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
        "",
    )
        .into_response()
}

async fn get_crumb(State(yahoo): State<TestYahoo>, headers: HeaderMap) -> Response {
    yahoo.crumb_requests.fetch_add(1, Ordering::SeqCst);
    if !has_session(&headers) {
        return (StatusCode::UNAUTHORIZED, "").into_response();
    }
    CRUMB.into_response()
}

fn priced_summary(name: &str, price: f64) -> Value {
    json!({
        "quoteSummary": {
            "result": [{
                "price": {
                    "longName": name,
                    "regularMarketPrice": { "raw": price, "fmt": format!("{price:.2}") }
                }
            }],
            "error": null
        }
    })
}

async fn quote_summary(
    State(yahoo): State<TestYahoo>,
    Path(symbol): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let crumb_ok = query.get("crumb").map(String::as_str) == Some(CRUMB);
    let expired = yahoo.expire_next_crumb.swap(false, Ordering::SeqCst);
    if !crumb_ok || !has_session(&headers) || expired {
        return (StatusCode::UNAUTHORIZED, "Invalid Crumb").into_response();
    }
    yahoo.record(format!("summary:{symbol}"));

    match symbol.as_str() {
        "INFY.NS" => Json(priced_summary("Infosys Limited", 1500.0)).into_response(),
        // Listed on NSE without a quote; only the BSE listing is priced
        "TCS.NS" => Json(json!({
            "quoteSummary": { "result": [{ "price": { "longName": "TCS" } }], "error": null }
        }))
        .into_response(),
        "TCS.BO" => Json(priced_summary("Tata Consultancy Services", 3500.0)).into_response(),
        "WIPRO.NS" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream").into_response(),
        "WIPRO.BO" => Json(priced_summary("Wipro Limited", 450.0)).into_response(),
        _ => (StatusCode::NOT_FOUND, "").into_response(),
    }
}

fn bars(closes: &[f64]) -> Value {
    let timestamps: Vec<i64> = (0..closes.len() as i64)
        .map(|i| 1_704_067_200 + i * SECONDS_PER_DAY)
        .collect();
    json!({
        "chart": {
            "result": [{
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{
                        "open": closes,
                        "high": closes,
                        "low": closes,
                        "close": closes,
                        "volume": vec![1000; closes.len()]
                    }]
                }
            }],
            "error": null
        }
    })
}

async fn chart(
    State(yahoo): State<TestYahoo>,
    Path(symbol): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let period = |key: &str| query.get(key).and_then(|v| v.parse::<i64>().ok());
    let days = match (period("period1"), period("period2")) {
        (Some(from), Some(to)) => (to - from) / SECONDS_PER_DAY,
        _ => return (StatusCode::BAD_REQUEST, "").into_response(),
    };
    yahoo.record(format!("chart:{symbol}:{days}"));

    match (symbol.as_str(), days) {
        ("INFY.NS", 365) => Json(bars(&[1490.0, 1500.0])).into_response(),
        ("TCS.BO", _) => Json(bars(&[3400.0, 3450.0, 3500.0])).into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "").into_response(),
    }
}
