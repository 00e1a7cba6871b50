use analysis_core::symbols::{bse_alternative, normalize_indian_symbol};
use analysis_core::{AnalysisError, Bar, MarketDataSource, StockSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::client::SNAPSHOT_MODULES;
use crate::snapshot::build_snapshot;
use crate::{QuoteSummary, YahooConfig, YahooFinanceClient};

/// History windows tried in order, in days.
const HISTORY_WINDOWS_DAYS: [i64; 2] = [3 * 365, 365];

/// Comprehensive per-symbol data fetcher for NSE/BSE listings.
#[derive(Clone)]
pub struct StockDataFetcher {
    client: YahooFinanceClient,
}

impl StockDataFetcher {
    pub fn new(client: YahooFinanceClient) -> Self {
        Self { client }
    }

    pub fn from_env() -> Result<Self, std::num::ParseIntError> {
        Ok(Self::new(YahooFinanceClient::new(YahooConfig::from_env()?)))
    }

    /// Fetch quote summary, statements and price history for a user-supplied symbol.
    pub async fn get_comprehensive_data(&self, symbol: &str) -> Result<StockSnapshot, AnalysisError> {
        if symbol.trim().is_empty() {
            return Err(AnalysisError::InvalidSymbol(symbol.to_string()));
        }
        let normalized = normalize_indian_symbol(symbol);

        let (resolved, summary) = self.resolve_summary(symbol, &normalized).await?;
        let now = Utc::now();
        let history = self.fetch_history(&resolved, now).await;

        tracing::info!(
            "Fetched {} ({} bars of history)",
            resolved,
            history.len()
        );

        Ok(build_snapshot(symbol, &resolved, &summary, history, now))
    }

    /// Quote summary for the NSE symbol, falling back to the BSE listing.
    async fn resolve_summary(
        &self,
        input: &str,
        normalized: &str,
    ) -> Result<(String, QuoteSummary), AnalysisError> {
        let mut candidates = vec![normalized.to_string()];
        candidates.extend(bse_alternative(normalized));

        for candidate in candidates {
            match self.client.get_quote_summary(&candidate, SNAPSHOT_MODULES).await {
                Ok(summary) if summary.has_price() => return Ok((candidate, summary)),
                Ok(_) => tracing::debug!("No price data for {}", candidate),
                Err(e) => tracing::warn!("Quote summary for {} failed: {}", candidate, e),
            }
        }

        Err(not_found(input))
    }

    /// Daily bars for the widest window that returns data; empty when none does.
    async fn fetch_history(&self, symbol: &str, now: DateTime<Utc>) -> Vec<Bar> {
        for days in HISTORY_WINDOWS_DAYS {
            match self
                .client
                .get_history(symbol, now - Duration::days(days), now, "1d")
                .await
            {
                Ok(bars) if !bars.is_empty() => return bars,
                Ok(_) => tracing::debug!("Empty {}-day history for {}", days, symbol),
                Err(e) => tracing::warn!("{}-day history for {} failed: {}", days, symbol, e),
            }
        }
        Vec::new()
    }
}

impl Default for StockDataFetcher {
    fn default() -> Self {
        Self::new(YahooFinanceClient::default())
    }
}

#[async_trait]
impl MarketDataSource for StockDataFetcher {
    async fn fetch_snapshot(&self, symbol: &str) -> Result<StockSnapshot, AnalysisError> {
        self.get_comprehensive_data(symbol).await
    }
}

fn not_found(input: &str) -> AnalysisError {
    AnalysisError::NotFound(format!(
        "Stock symbol '{}' not found or no price data available.",
        input
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{self, TestYahoo};

    #[test]
    fn test_not_found_message_uses_raw_input() {
        assert_eq!(
            not_found("tcs").to_string(),
            "Stock symbol 'tcs' not found or no price data available."
        );
    }

    #[tokio::test]
    async fn test_blank_symbol_is_rejected_before_network() {
        let fetcher = StockDataFetcher::default();
        let err = fetcher.get_comprehensive_data("   ").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSymbol(_)));
    }

    async fn fetcher(yahoo: &TestYahoo) -> StockDataFetcher {
        StockDataFetcher::new(YahooFinanceClient::new(test_server::spawn(yahoo.clone()).await))
    }

    #[tokio::test]
    async fn test_nse_listing_without_price_falls_back_to_bse() {
        let yahoo = TestYahoo::default();
        let snapshot = fetcher(&yahoo).await.get_comprehensive_data("tcs").await.unwrap();

        assert_eq!(snapshot.symbol, "TCS.BO");
        assert_eq!(snapshot.company_name, "Tata Consultancy Services");
        assert_eq!(snapshot.current_price, 3500.0);
        assert_eq!(snapshot.history.len(), 3);
        assert_eq!(
            yahoo.calls(),
            vec!["summary:TCS.NS", "summary:TCS.BO", "chart:TCS.BO:1095"]
        );
    }

    #[tokio::test]
    async fn test_failed_nse_request_falls_back_to_bse_and_missing_history_is_empty() {
        let yahoo = TestYahoo::default();
        let snapshot = fetcher(&yahoo).await.get_comprehensive_data("WIPRO").await.unwrap();

        assert_eq!(snapshot.symbol, "WIPRO.BO");
        assert!(snapshot.history.is_empty());
        assert_eq!(
            yahoo.calls(),
            vec![
                "summary:WIPRO.NS",
                "summary:WIPRO.BO",
                "chart:WIPRO.BO:1095",
                "chart:WIPRO.BO:365"
            ]
        );
    }

    #[tokio::test]
    async fn test_history_falls_back_to_one_year() {
        let yahoo = TestYahoo::default();
        let snapshot = fetcher(&yahoo).await.get_comprehensive_data("infosys").await.unwrap();

        assert_eq!(snapshot.symbol, "INFY.NS");
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(
            yahoo.calls(),
            vec!["summary:INFY.NS", "chart:INFY.NS:1095", "chart:INFY.NS:365"]
        );
    }

    #[tokio::test]
    async fn test_unknown_symbol_tries_both_exchanges_then_not_found() {
        let yahoo = TestYahoo::default();
        let err = fetcher(&yahoo).await.get_comprehensive_data("zzzz").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Stock symbol 'zzzz' not found or no price data available."
        );
        assert_eq!(yahoo.calls(), vec!["summary:ZZZZ.NS", "summary:ZZZZ.BO"]);
    }
}
