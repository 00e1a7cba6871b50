//! Rule-based report used when no provider returns usable text.

use analysis_core::{InsightReport, StockSnapshot};

use crate::parser::MAX_INSIGHTS;

pub const RULE_BASED_SOURCE: &str = "rule-based";

const ADVISORY_SUMMARY: &str = "This stock requires detailed fundamental analysis. Consider consulting with a financial advisor for personalized investment advice. Past performance does not guarantee future results.";

const GENERIC_INSIGHTS: [&str; 3] = [
    "Financial analysis requires detailed review of recent performance",
    "Consider industry trends and market conditions",
    "Evaluate long-term growth prospects and competitive position",
];

/// Threshold-driven insights from the snapshot's ratios.
pub fn basic_analysis(snapshot: &StockSnapshot) -> InsightReport {
    let mut insights = Vec::new();

    // A non-positive P/E means losses, which none of the bands describe
    if let Some(pe) = snapshot.pe_ratio.filter(|pe| *pe > 0.0) {
        insights.push(if pe < 15.0 {
            "Stock appears to be undervalued based on P/E ratio"
        } else if pe > 25.0 {
            "Stock appears to be overvalued based on P/E ratio"
        } else {
            "Stock is reasonably valued based on P/E ratio"
        });
    }

    if snapshot.roe.is_some_and(|roe| roe > 15.0) {
        insights.push("Strong Return on Equity indicates efficient management");
    }

    if snapshot.debt_to_equity.is_some_and(|de| de < 0.5) {
        insights.push("Low debt-to-equity ratio suggests conservative financial management");
    }

    if snapshot.dividend_yield.is_some_and(|dy| dy > 2.0) {
        insights.push("Decent dividend yield provides income potential");
    }

    if snapshot.current_ratio.is_some_and(|cr| cr > 1.5) {
        insights.push("Strong current ratio indicates good liquidity position");
    }

    if insights.is_empty() {
        insights.extend(GENERIC_INSIGHTS);
    }

    InsightReport {
        insights: insights
            .into_iter()
            .take(MAX_INSIGHTS)
            .map(str::to_string)
            .collect(),
        investment_summary: ADVISORY_SUMMARY.to_string(),
        recommendation: None,
        risks: Vec::new(),
        source: RULE_BASED_SOURCE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_insights_when_nothing_fires() {
        let snapshot = StockSnapshot::new("ABC.NS", "ABC Ltd", 100.0);
        let report = basic_analysis(&snapshot);
        assert_eq!(report.insights, GENERIC_INSIGHTS.to_vec());
        assert_eq!(report.source, RULE_BASED_SOURCE);
        assert_eq!(report.investment_summary, ADVISORY_SUMMARY);
    }

    #[test]
    fn test_pe_bands() {
        let mut snapshot = StockSnapshot::new("ABC.NS", "ABC Ltd", 100.0);

        snapshot.pe_ratio = Some(12.0);
        assert!(basic_analysis(&snapshot).insights[0].contains("undervalued"));

        snapshot.pe_ratio = Some(30.0);
        assert!(basic_analysis(&snapshot).insights[0].contains("overvalued"));

        snapshot.pe_ratio = Some(20.0);
        assert!(basic_analysis(&snapshot).insights[0].contains("reasonably valued"));

        snapshot.pe_ratio = Some(-8.0);
        assert_eq!(basic_analysis(&snapshot).insights, GENERIC_INSIGHTS.to_vec());
    }

    #[test]
    fn test_all_rules_fire() {
        let mut snapshot = StockSnapshot::new("TCS.NS", "TCS", 3850.0);
        snapshot.pe_ratio = Some(20.0);
        snapshot.roe = Some(46.0);
        snapshot.debt_to_equity = Some(0.1);
        snapshot.dividend_yield = Some(2.5);
        snapshot.current_ratio = Some(2.0);

        let report = basic_analysis(&snapshot);
        assert_eq!(report.insights.len(), 5);
        assert!(report.insights[4].contains("liquidity"));
    }

    #[test]
    fn test_thresholds_are_strict() {
        let mut snapshot = StockSnapshot::new("ABC.NS", "ABC Ltd", 100.0);
        snapshot.roe = Some(15.0);
        snapshot.current_ratio = Some(1.5);
        snapshot.debt_to_equity = Some(0.5);
        assert_eq!(basic_analysis(&snapshot).insights, GENERIC_INSIGHTS.to_vec());
    }
}
