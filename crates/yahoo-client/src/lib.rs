pub mod client;
pub mod fetcher;
pub mod snapshot;
pub mod summary;

#[cfg(test)]
mod test_server;

pub use client::YahooFinanceClient;
pub use fetcher::StockDataFetcher;
pub use summary::QuoteSummary;

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
/// Host that issues the session cookie the crumb is bound to.
pub const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";

/// Configuration for the Yahoo Finance endpoints
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub cookie_url: String,
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cookie_url: DEFAULT_COOKIE_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl YahooConfig {
    pub fn from_env() -> Result<Self, std::num::ParseIntError> {
        let var = |key: &str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let timeout = match var("YAHOO_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(secs.parse()?),
            None => defaults.timeout,
        };

        Ok(Self {
            base_url: var("YAHOO_BASE_URL").unwrap_or(defaults.base_url),
            cookie_url: var("YAHOO_COOKIE_URL").unwrap_or(defaults.cookie_url),
            timeout,
        })
    }
}
