//! Prompt templates built from a stock snapshot.

use analysis_core::format::{format_currency, format_percentage, format_price, format_ratio};
use analysis_core::StockSnapshot;

use crate::provider::PromptStyle;

pub fn build_prompt(style: PromptStyle, snapshot: &StockSnapshot) -> String {
    match style {
        PromptStyle::Structured => structured_prompt(snapshot),
        PromptStyle::Narrative => narrative_prompt(snapshot),
    }
}

/// Prompt asking for `INSIGHTS:` bullets and an `INVESTMENT_SUMMARY:` paragraph.
pub fn structured_prompt(s: &StockSnapshot) -> String {
    let holding = &s.shareholding;

    format!(
        "Analyze the following stock data for {company} ({symbol}) and provide insights:

CURRENT METRICS:
- Current Price: {price}
- Market Cap: {market_cap}
- P/E Ratio: {pe}
- ROE: {roe}
- ROCE: {roce}
- Debt-to-Equity: {de}
- Dividend Yield: {dy}
- Current Ratio: {cr}
- Sector: {sector}
- Industry: {industry}

FINANCIAL PERFORMANCE:
- 52W High: {high}
- 52W Low: {low}

SHAREHOLDING PATTERN:
- Promoter Holding: {promoter}
- FII Holding: {fii}
- DII Holding: {dii}
- Retail Holding: {retail}

Please provide:
1. 3-5 key insights as bullet points
2. A comprehensive investment implication summary (2-3 sentences)

Format your response as:
INSIGHTS:
• [Insight 1]
• [Insight 2]
• [Insight 3]
• [Insight 4]
• [Insight 5]

INVESTMENT_SUMMARY:
[Your investment analysis and recommendation]
",
        company = s.company_name,
        symbol = s.symbol,
        price = format_price(Some(s.current_price)),
        market_cap = format_currency(s.market_cap),
        pe = format_ratio(s.pe_ratio),
        roe = format_percentage(s.roe),
        roce = format_percentage(s.roce),
        de = format_ratio(s.debt_to_equity),
        dy = format_percentage(s.dividend_yield),
        cr = format_ratio(s.current_ratio),
        sector = s.sector(),
        industry = s.industry(),
        high = format_price(s.fifty_two_week_high),
        low = format_price(s.fifty_two_week_low),
        promoter = format_percentage(holding.promoter),
        fii = format_percentage(holding.fii),
        dii = format_percentage(holding.dii),
        retail = format_percentage(holding.retail),
    )
}

/// Stock summary block used by the narrative prompt.
pub fn stock_summary(s: &StockSnapshot) -> String {
    let holding = &s.shareholding;

    format!(
        "Company: {company}
Symbol: {symbol}
Sector: {sector}
Industry: {industry}

Current Price: {price}
Market Cap: {market_cap}

Key Ratios:
- P/E Ratio: {pe}
- P/B Ratio: {pb}
- ROE: {roe}
- ROCE: {roce}
- Debt/Equity: {de}
- Current Ratio: {cr}

Financial Performance:
- Revenue Growth: {rg}
- Earnings Growth: {eg}
- Profit Margin: {pm}
- Operating Margin: {om}

Stock Performance:
- 52W High: {high}
- 52W Low: {low}
- Dividend Yield: {dy}

Shareholding:
- Promoter Holding: {promoter}
- FII Holding: {fii}
- DII Holding: {dii}",
        company = s.company_name,
        symbol = s.symbol,
        sector = s.sector(),
        industry = s.industry(),
        price = format_price(Some(s.current_price)),
        market_cap = format_currency(s.market_cap),
        pe = format_ratio(s.pe_ratio),
        pb = format_ratio(s.pb_ratio),
        roe = format_percentage(s.roe),
        roce = format_percentage(s.roce),
        de = format_ratio(s.debt_to_equity),
        cr = format_ratio(s.current_ratio),
        rg = format_percentage(s.revenue_growth),
        eg = format_percentage(s.earnings_growth),
        pm = format_percentage(s.profit_margins),
        om = format_percentage(s.operating_margins),
        high = format_price(s.fifty_two_week_high),
        low = format_price(s.fifty_two_week_low),
        dy = format_percentage(s.dividend_yield),
        promoter = format_percentage(holding.promoter),
        fii = format_percentage(holding.fii),
        dii = format_percentage(holding.dii),
    )
}

/// Analyst-style prompt asking for insights, a call, risks and outlook.
pub fn narrative_prompt(s: &StockSnapshot) -> String {
    format!(
        "As a professional financial analyst, analyze the following stock data and provide comprehensive insights:

{summary}

Please provide:
1. 3-5 key insights about the company's financial health
2. Investment recommendation (Buy/Hold/Sell) with reasoning
3. Risk assessment and key concerns
4. Growth potential analysis
5. Comparison with industry standards

Format your response as a structured analysis that an investor can easily understand.
",
        summary = stock_summary(s)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StockSnapshot {
        let mut s = StockSnapshot::new("TCS.NS", "Tata Consultancy Services", 3845.2);
        s.pe_ratio = Some(29.456);
        s.roe = Some(46.0);
        s.market_cap = Some(1.4e13);
        s.shareholding.promoter = Some(72.3);
        s
    }

    #[test]
    fn test_structured_prompt_contents() {
        let prompt = structured_prompt(&snapshot());
        assert!(prompt.contains("Tata Consultancy Services (TCS.NS)"));
        assert!(prompt.contains("- Current Price: ₹3,845.20"));
        assert!(prompt.contains("- P/E Ratio: 29.46"));
        assert!(prompt.contains("- ROE: 46.00%"));
        assert!(prompt.contains("- Market Cap: ₹1400000.00 Cr"));
        assert!(prompt.contains("- Promoter Holding: 72.30%"));
        assert!(prompt.contains("INVESTMENT_SUMMARY:"));
    }

    #[test]
    fn test_missing_values_render_na() {
        let prompt = structured_prompt(&snapshot());
        assert!(prompt.contains("- ROCE: N/A"));
        assert!(prompt.contains("- Sector: N/A"));
        assert!(prompt.contains("- DII Holding: N/A"));
    }

    #[test]
    fn test_narrative_prompt_embeds_summary() {
        let prompt = build_prompt(PromptStyle::Narrative, &snapshot());
        assert!(prompt.contains("Company: Tata Consultancy Services"));
        assert!(prompt.contains("Investment recommendation (Buy/Hold/Sell)"));
        assert!(prompt.contains("- Revenue Growth: N/A"));
    }
}
