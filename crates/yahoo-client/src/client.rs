use analysis_core::{AnalysisError, Bar};
use chrono::{DateTime, Utc};
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::summary::QuoteSummary;
use crate::YahooConfig;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Modules requested for the comprehensive snapshot.
pub const SNAPSHOT_MODULES: &[&str] = &[
    "price",
    "summaryDetail",
    "financialData",
    "defaultKeyStatistics",
    "assetProfile",
    "majorHoldersBreakdown",
    "incomeStatementHistory",
    "incomeStatementHistoryQuarterly",
    "balanceSheetHistory",
    "cashflowStatementHistory",
];

#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
    cookie_url: String,
    crumb: Arc<RwLock<Option<String>>>,
}

impl YahooFinanceClient {
    pub fn new(config: YahooConfig) -> Self {
        let client = build_client(
            Client::builder()
                .user_agent(USER_AGENT)
                .timeout(config.timeout)
                .cookie_store(true),
        );

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie_url: config.cookie_url,
            crumb: Arc::new(RwLock::new(None)),
        }
    }

    /// Crumb for the current cookie session, fetched on first use.
    async fn crumb(&self) -> Result<String, AnalysisError> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let mut slot = self.crumb.write().await;
        if let Some(crumb) = slot.as_ref() {
            return Ok(crumb.clone());
        }
        let crumb = self.fetch_crumb().await?;
        *slot = Some(crumb.clone());
        Ok(crumb)
    }

    async fn fetch_crumb(&self) -> Result<String, AnalysisError> {
        // The cookie host answers 404 but still sets the session cookie
        if let Err(e) = self.client.get(&self.cookie_url).send().await {
            tracing::warn!("Yahoo session cookie request failed: {}", e);
        }

        let response = self
            .client
            .get(format!("{}/v1/test/getcrumb", self.base_url))
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;
        let crumb = body.trim();
        if !status.is_success() || crumb.is_empty() || crumb.contains('<') {
            return Err(AnalysisError::ApiError(format!(
                "Yahoo crumb request failed: HTTP {}",
                status
            )));
        }

        tracing::debug!("Obtained Yahoo session crumb");
        Ok(crumb.to_string())
    }

    async fn send_summary_request(&self, url: &str, modules: &str) -> Result<Response, AnalysisError> {
        let crumb = self.crumb().await?;
        self.client
            .get(url)
            .query(&[("modules", modules), ("crumb", crumb.as_str())])
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))
    }

    /// Get the quote-summary modules for a symbol
    pub async fn get_quote_summary(
        &self,
        symbol: &str,
        modules: &[&str],
    ) -> Result<QuoteSummary, AnalysisError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);
        let modules = modules.join(",");

        let mut response = self.send_summary_request(&url, &modules).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            // Crumbs expire with the cookie session; refresh once
            tracing::debug!("Yahoo rejected the crumb for {}, refreshing", symbol);
            *self.crumb.write().await = None;
            response = self.send_summary_request(&url, &modules).await?;
        }

        let json = read_json(response, symbol).await?;
        QuoteSummary::from_response(&json)
            .ok_or_else(|| AnalysisError::NotFound(format!("No quote data found for {}", symbol)))
    }

    /// Get daily price history between two instants
    pub async fn get_history(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        interval: &str,
    ) -> Result<Vec<Bar>, AnalysisError> {
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval={}",
            self.base_url,
            symbol,
            from.timestamp(),
            to.timestamp(),
            interval
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;
        let json = read_json(response, symbol).await?;
        parse_chart(&json)
    }
}

/// Build the client, falling back to reqwest defaults with a warning when the builder is invalid.
fn build_client(builder: ClientBuilder) -> Client {
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("Falling back to a default HTTP client for Yahoo Finance: {}", e);
        Client::new()
    })
}

async fn read_json(response: Response, symbol: &str) -> Result<serde_json::Value, AnalysisError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(AnalysisError::NotFound(format!("No data found for {}", symbol)));
    }
    if !status.is_success() {
        return Err(AnalysisError::ApiError(format!(
            "HTTP {}: {}",
            status,
            response.text().await.unwrap_or_default()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AnalysisError::InvalidData(e.to_string()))
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new(YahooConfig::default())
    }
}

/// Parse a v8 chart response into bars, skipping rows with missing values.
pub fn parse_chart(json: &serde_json::Value) -> Result<Vec<Bar>, AnalysisError> {
    let missing = |what: &str| AnalysisError::InvalidData(format!("No {} in chart response", what));

    let chart = json
        .get("chart")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| missing("chart data"))?;

    // A symbol with no trading in the range has no timestamp array at all
    let timestamps = match chart.get("timestamp").and_then(|v| v.as_array()) {
        Some(ts) => ts,
        None => return Ok(Vec::new()),
    };

    let quotes = chart
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| missing("quote data"))?;

    let opens = series(quotes, "open")?;
    let highs = series(quotes, "high")?;
    let lows = series(quotes, "low")?;
    let closes = series(quotes, "close")?;
    let volumes = series(quotes, "volume")?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let value = |s: &Vec<serde_json::Value>| s.get(i).and_then(|v| v.as_f64());
        if let (Some(ts), Some(o), Some(h), Some(l), Some(c), Some(v)) = (
            ts.as_i64(),
            value(opens),
            value(highs),
            value(lows),
            value(closes),
            value(volumes),
        ) {
            let Some(timestamp) = DateTime::from_timestamp(ts, 0) else {
                continue;
            };
            bars.push(Bar {
                timestamp,
                open: o,
                high: h,
                low: l,
                close: c,
                volume: v,
            });
        }
    }

    Ok(bars)
}

fn series<'a>(
    quotes: &'a serde_json::Value,
    name: &str,
) -> Result<&'a Vec<serde_json::Value>, AnalysisError> {
    quotes
        .get(name)
        .and_then(|v| v.as_array())
        .ok_or_else(|| AnalysisError::InvalidData(format!("No {} in chart response", name)))
}
