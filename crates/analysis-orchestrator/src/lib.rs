use std::sync::Arc;

use analysis_core::{
    AnalysisError, InsightGenerator, InsightReport, MarketDataSource, StockAnalysis, StockSnapshot,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

pub const CACHE_TTL_SECS: i64 = 300; // 5 minutes

/// Fetch-then-analyze pipeline shared by the dashboard and the JSON API.
///
/// Snapshots are cached per input symbol; insight reports are generated fresh
/// on every [`AnalysisOrchestrator::analyze`] call.
pub struct AnalysisOrchestrator {
    data_source: Arc<dyn MarketDataSource>,
    insights: Arc<dyn InsightGenerator>,
    /// Cache snapshots per upper-cased symbol
    snapshot_cache: DashMap<String, CacheEntry<StockSnapshot>>,
    cache_ttl: Duration,
}

impl AnalysisOrchestrator {
    pub fn new(data_source: Arc<dyn MarketDataSource>, insights: Arc<dyn InsightGenerator>) -> Self {
        Self {
            data_source,
            insights,
            snapshot_cache: DashMap::new(),
            cache_ttl: Duration::seconds(CACHE_TTL_SECS),
        }
    }

    pub fn with_cache_ttl(mut self, ttl_secs: i64) -> Self {
        self.cache_ttl = Duration::seconds(ttl_secs);
        self
    }

    /// Get the comprehensive snapshot for a symbol (cached)
    pub async fn get_snapshot(&self, symbol: &str) -> Result<StockSnapshot, AnalysisError> {
        let cache_key = symbol.trim().to_uppercase();
        if cache_key.is_empty() {
            return Err(AnalysisError::InvalidSymbol(symbol.to_string()));
        }

        if let Some(entry) = self.snapshot_cache.get(&cache_key) {
            if Utc::now() - entry.cached_at < self.cache_ttl {
                tracing::debug!("Snapshot cache hit for {}", cache_key);
                return Ok(entry.data.clone());
            }
        }

        let snapshot = self.data_source.fetch_snapshot(symbol.trim()).await?;
        snapshot.validate()?;

        self.snapshot_cache.insert(
            cache_key,
            CacheEntry {
                data: snapshot.clone(),
                cached_at: Utc::now(),
            },
        );

        Ok(snapshot)
    }

    /// Generate an insight report for an already fetched snapshot.
    pub async fn generate_report(&self, snapshot: &StockSnapshot) -> InsightReport {
        self.insights.generate(snapshot).await
    }

    /// Snapshot plus a freshly generated insight report.
    pub async fn analyze(&self, symbol: &str) -> Result<StockAnalysis, AnalysisError> {
        let snapshot = self.get_snapshot(symbol).await?;
        let report = self.generate_report(&snapshot).await;

        tracing::info!(
            "Analyzed {} ({} insights via {})",
            snapshot.symbol,
            report.insights.len(),
            report.source
        );

        Ok(StockAnalysis { snapshot, report })
    }

    pub fn clear_cache(&self) {
        self.snapshot_cache.clear();
    }

    /// Number of cached snapshots, expired entries included.
    pub fn cache_len(&self) -> usize {
        self.snapshot_cache.len()
    }
}
