use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// One fiscal year of headline figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AnnualFinancials {
    pub year: String,
    pub total_revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub eps: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_debt: Option<f64>,
}

/// One fiscal quarter of headline figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct QuarterlyFinancials {
    pub quarter: String,
    pub total_revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub eps: Option<f64>,
}

/// Latest balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BalanceSheet {
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub shareholders_equity: Option<f64>,
    pub total_debt: Option<f64>,
    pub cash_and_equivalents: Option<f64>,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub working_capital: Option<f64>,
}

/// Latest income statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IncomeStatement {
    pub total_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub ebitda: Option<f64>,
    pub interest_expense: Option<f64>,
    pub tax_provision: Option<f64>,
}

/// Latest cash flow statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CashFlow {
    pub operating_cash_flow: Option<f64>,
    pub investing_cash_flow: Option<f64>,
    pub financing_cash_flow: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub capital_expenditures: Option<f64>,
}

/// Shareholding pattern, all values in percent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Shareholding {
    pub promoter: Option<f64>,
    pub fii: Option<f64>,
    pub dii: Option<f64>,
    pub qib: Option<f64>,
    pub retail: Option<f64>,
}

impl Shareholding {
    /// Labelled rows in display order.
    pub fn rows(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("Promoters", self.promoter),
            ("Foreign Institutional Investors (FII)", self.fii),
            ("Domestic Institutional Investors (DII)", self.dii),
            ("Qualified Institutional Buyers (QIB)", self.qib),
            ("Retail Investors", self.retail),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CompanyProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: String,
    pub employees: Option<u64>,
    pub website: Option<String>,
    pub business_summary: Option<String>,
    pub chairman: Option<String>,
    pub managing_director: Option<String>,
}

/// Metrics derived from the last year of daily prices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PriceMetrics {
    /// Percent change from the first to the last close of the year.
    pub year_performance: Option<f64>,
    /// Sample standard deviation of daily returns, in percent.
    pub volatility: Option<f64>,
    pub avg_volume: Option<f64>,
}

/// Comprehensive per-symbol record assembled by a [`crate::MarketDataSource`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StockSnapshot {
    pub symbol: String,
    pub company_name: String,
    pub current_price: f64,
    pub market_cap: Option<f64>,

    // Valuation
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub ev_to_revenue: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
    pub eps: Option<f64>,
    pub book_value: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub dividend_per_share: Option<f64>,

    // Returns and leverage, ratios in percent where noted
    pub roe: Option<f64>,
    pub roce: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub profit_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,

    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,

    pub total_cash: Option<f64>,
    pub total_debt: Option<f64>,
    pub free_cash_flow: Option<f64>,

    pub shareholding: Shareholding,
    pub profile: CompanyProfile,
    pub performance: PriceMetrics,

    pub annual: Vec<AnnualFinancials>,
    pub quarterly: Vec<QuarterlyFinancials>,
    pub balance_sheet: Option<BalanceSheet>,
    pub income_statement: Option<IncomeStatement>,
    pub cash_flow: Option<CashFlow>,

    pub history: Vec<Bar>,
    pub last_updated: DateTime<Utc>,
}

impl StockSnapshot {
    /// Empty snapshot carrying only identity and price.
    pub fn new(symbol: impl Into<String>, company_name: impl Into<String>, current_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            company_name: company_name.into(),
            current_price,
            market_cap: None,
            pe_ratio: None,
            pb_ratio: None,
            price_to_sales: None,
            enterprise_value: None,
            ev_to_revenue: None,
            ev_to_ebitda: None,
            eps: None,
            book_value: None,
            dividend_yield: None,
            dividend_per_share: None,
            roe: None,
            roce: None,
            debt_to_equity: None,
            current_ratio: None,
            quick_ratio: None,
            profit_margins: None,
            operating_margins: None,
            revenue_growth: None,
            earnings_growth: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            total_cash: None,
            total_debt: None,
            free_cash_flow: None,
            shareholding: Shareholding::default(),
            profile: CompanyProfile {
                country: "India".to_string(),
                ..Default::default()
            },
            performance: PriceMetrics::default(),
            annual: Vec::new(),
            quarterly: Vec::new(),
            balance_sheet: None,
            income_statement: None,
            cash_flow: None,
            history: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    /// Check the fields every consumer relies on.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.symbol.trim().is_empty() {
            return Err(AnalysisError::InvalidData("Missing required field: symbol".to_string()));
        }
        if self.company_name.trim().is_empty() {
            return Err(AnalysisError::InvalidData(
                "Missing required field: company_name".to_string(),
            ));
        }
        if !self.current_price.is_finite() {
            return Err(AnalysisError::InvalidData(
                "Missing required field: current_price".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sector(&self) -> &str {
        self.profile.sector.as_deref().unwrap_or("N/A")
    }

    pub fn industry(&self) -> &str {
        self.profile.industry.as_deref().unwrap_or("N/A")
    }
}

/// Investment call extracted from narrative text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl Recommendation {
    pub fn to_label(&self) -> &'static str {
        match self {
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
        }
    }
}

/// Narrative analysis shown under the metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InsightReport {
    /// At most five bullet insights.
    pub insights: Vec<String>,
    pub investment_summary: String,
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
    /// At most three risk bullets.
    #[serde(default)]
    pub risks: Vec<String>,
    /// Provider that produced the text, or `rule-based`.
    pub source: String,
}

/// Snapshot plus the insight report generated for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StockAnalysis {
    pub snapshot: StockSnapshot,
    pub report: InsightReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_minimal_snapshot() {
        let snapshot = StockSnapshot::new("TCS.NS", "Tata Consultancy Services", 3850.5);
        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.profile.country, "India");
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let snapshot = StockSnapshot::new("", "Tata Consultancy Services", 3850.5);
        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("symbol"));

        let snapshot = StockSnapshot::new("TCS.NS", "  ", 3850.5);
        assert!(snapshot.validate().unwrap_err().to_string().contains("company_name"));

        let snapshot = StockSnapshot::new("TCS.NS", "TCS", f64::NAN);
        assert!(snapshot.validate().unwrap_err().to_string().contains("current_price"));
    }

    #[test]
    fn test_sector_defaults_to_na() {
        let mut snapshot = StockSnapshot::new("ITC.NS", "ITC Limited", 450.0);
        assert_eq!(snapshot.sector(), "N/A");
        snapshot.profile.sector = Some("Consumer Defensive".to_string());
        assert_eq!(snapshot.sector(), "Consumer Defensive");
    }

    #[test]
    fn test_chat_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("TCS")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"TCS"}"#);
    }
}
