use async_trait::async_trait;
use crate::{AnalysisError, InsightReport, StockSnapshot};

/// Source of comprehensive per-symbol market data
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch everything known about `symbol`. The symbol may be a bare name
    /// ("INFOSYS") or exchange-qualified ("INFY.NS").
    async fn fetch_snapshot(&self, symbol: &str) -> Result<StockSnapshot, AnalysisError>;
}

/// Produces a narrative report for a snapshot.
///
/// Implementations must always return a well-formed report; provider
/// failures are absorbed rather than surfaced to the caller.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate(&self, snapshot: &StockSnapshot) -> InsightReport;
}
