//! Assembly of a [`StockSnapshot`] from quote-summary modules and price history.

use analysis_core::returns::price_metrics;
use analysis_core::{
    AnnualFinancials, Bar, BalanceSheet, CashFlow, CompanyProfile, IncomeStatement,
    QuarterlyFinancials, Shareholding, StockSnapshot,
};
use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;

use crate::summary::{row_number, QuoteSummary};

const MAX_ANNUAL_ROWS: usize = 5;
const MAX_QUARTERLY_ROWS: usize = 8;
const OFFICERS_CHECKED: usize = 2;

/// Build the snapshot for `resolved_symbol` (the suffix that actually had data).
pub fn build_snapshot(
    input_symbol: &str,
    resolved_symbol: &str,
    summary: &QuoteSummary,
    history: Vec<Bar>,
    now: DateTime<Utc>,
) -> StockSnapshot {
    let company_name = summary
        .text("longName")
        .or_else(|| summary.text("shortName"))
        .unwrap_or_else(|| input_symbol.to_string());
    let price = summary.price().unwrap_or(0.0);

    let mut snapshot = StockSnapshot::new(resolved_symbol, company_name, price);
    let shares = summary.number("sharesOutstanding");

    snapshot.market_cap = summary.number("marketCap");
    snapshot.pe_ratio = summary.number("trailingPE").or_else(|| summary.number("forwardPE"));
    snapshot.pb_ratio = summary.number("priceToBook");
    snapshot.price_to_sales = summary.number("priceToSalesTrailing12Months");
    snapshot.enterprise_value = summary.number("enterpriseValue");
    snapshot.ev_to_revenue = summary.number("enterpriseToRevenue");
    snapshot.ev_to_ebitda = summary.number("enterpriseToEbitda");
    snapshot.eps = summary.number("trailingEps").or_else(|| summary.number("forwardEps"));
    snapshot.book_value = summary.number("bookValue");
    snapshot.dividend_yield = percent(summary.number("dividendYield"));
    snapshot.dividend_per_share = summary.number("dividendRate");

    snapshot.roe = percent(summary.number("returnOnEquity"));
    snapshot.roce = percent(summary.number("returnOnAssets"));
    snapshot.debt_to_equity = summary.number("debtToEquity");
    snapshot.current_ratio = summary.number("currentRatio");
    snapshot.quick_ratio = summary.number("quickRatio");
    snapshot.profit_margins = percent(summary.number("profitMargins"));
    snapshot.operating_margins = percent(summary.number("operatingMargins"));
    snapshot.revenue_growth = percent(summary.number("revenueGrowth"));
    snapshot.earnings_growth = percent(summary.number("earningsGrowth"));

    snapshot.fifty_two_week_high = summary.number("fiftyTwoWeekHigh");
    snapshot.fifty_two_week_low = summary.number("fiftyTwoWeekLow");

    snapshot.total_cash = summary.number("totalCash");
    snapshot.total_debt = summary.number("totalDebt");
    snapshot.free_cash_flow = summary.number("freeCashflow");

    snapshot.shareholding = shareholding(summary);
    snapshot.profile = profile(summary);

    snapshot.annual = annual_rows(summary, shares);
    snapshot.quarterly = quarterly_rows(summary, shares);
    snapshot.balance_sheet = latest_balance_sheet(summary);
    snapshot.income_statement = latest_income_statement(summary);
    snapshot.cash_flow = latest_cash_flow(summary);

    snapshot.performance = price_metrics(&history, now);
    snapshot.history = history;
    snapshot.last_updated = now;
    snapshot
}

fn percent(fraction: Option<f64>) -> Option<f64> {
    fraction.map(|v| v * 100.0)
}

fn eps(net_income: Option<f64>, shares: Option<f64>) -> Option<f64> {
    match (net_income, shares) {
        (Some(income), Some(shares)) if shares != 0.0 => Some(income / shares),
        _ => None,
    }
}

fn sum_known(values: &[Option<f64>]) -> Option<f64> {
    values
        .iter()
        .flatten()
        .copied()
        .reduce(|acc, v| acc + v)
}

fn end_date(row: &Value) -> Option<DateTime<Utc>> {
    row_number(row, "endDate").and_then(|ts| DateTime::from_timestamp(ts as i64, 0))
}

/// Promoter and FII shares come from insider and institutional holdings;
/// retail is the remainder once either is known.
fn shareholding(summary: &QuoteSummary) -> Shareholding {
    let insiders = percent(summary.number("insidersPercentHeld"));
    let institutions = percent(summary.number("institutionsPercentHeld"));

    let retail = match (insiders, institutions) {
        (None, None) => None,
        (a, b) => Some((100.0 - a.unwrap_or(0.0) - b.unwrap_or(0.0)).max(0.0)),
    };

    Shareholding {
        promoter: insiders,
        fii: institutions,
        dii: None,
        qib: None,
        retail,
    }
}

fn profile(summary: &QuoteSummary) -> CompanyProfile {
    let mut profile = CompanyProfile {
        sector: summary.text("sector"),
        industry: summary.text("industry"),
        country: summary.text("country").unwrap_or_else(|| "India".to_string()),
        employees: summary
            .number("fullTimeEmployees")
            .filter(|n| *n >= 0.0)
            .map(|n| n as u64),
        website: summary.text("website"),
        business_summary: summary.text("longBusinessSummary"),
        chairman: None,
        managing_director: None,
    };

    for officer in summary.officers().iter().take(OFFICERS_CHECKED) {
        let title = officer
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_lowercase();
        let Some(name) = officer.get("name").and_then(|v| v.as_str()) else {
            continue;
        };

        if title.contains("chair") {
            profile.chairman.get_or_insert_with(|| name.to_string());
        } else if title.contains("managing director")
            || title.split_whitespace().any(|w| w == "md")
            || title.contains("ceo")
        {
            profile.managing_director.get_or_insert_with(|| name.to_string());
        }
    }

    profile
}

fn balance_sheets(summary: &QuoteSummary) -> &[Value] {
    summary.statements("balanceSheetHistory", "balanceSheetStatements")
}

fn statement_total_debt(row: &Value) -> Option<f64> {
    sum_known(&[
        row_number(row, "longTermDebt"),
        row_number(row, "shortLongTermDebt"),
    ])
}

fn annual_rows(summary: &QuoteSummary, shares: Option<f64>) -> Vec<AnnualFinancials> {
    let sheets = balance_sheets(summary);

    summary
        .statements("incomeStatementHistory", "incomeStatementHistory")
        .iter()
        .take(MAX_ANNUAL_ROWS)
        .map(|row| {
            let date = end_date(row);
            let sheet = date.and_then(|d| sheets.iter().find(|s| end_date(s) == Some(d)));
            let net_income = row_number(row, "netIncome");

            AnnualFinancials {
                year: date.map(|d| d.year().to_string()).unwrap_or_else(|| "N/A".to_string()),
                total_revenue: row_number(row, "totalRevenue"),
                net_income,
                eps: eps(net_income, shares),
                total_assets: sheet.and_then(|s| row_number(s, "totalAssets")),
                total_debt: sheet.and_then(statement_total_debt),
            }
        })
        .collect()
}

fn quarterly_rows(summary: &QuoteSummary, shares: Option<f64>) -> Vec<QuarterlyFinancials> {
    summary
        .statements("incomeStatementHistoryQuarterly", "incomeStatementHistory")
        .iter()
        .take(MAX_QUARTERLY_ROWS)
        .map(|row| {
            let net_income = row_number(row, "netIncome");
            QuarterlyFinancials {
                quarter: end_date(row)
                    .map(|d| format!("{}-Q{}", d.year(), (d.month() - 1) / 3 + 1))
                    .unwrap_or_else(|| "N/A".to_string()),
                total_revenue: row_number(row, "totalRevenue"),
                net_income,
                eps: eps(net_income, shares),
            }
        })
        .collect()
}

fn latest_balance_sheet(summary: &QuoteSummary) -> Option<BalanceSheet> {
    let row = balance_sheets(summary).first()?;
    let current_assets = row_number(row, "totalCurrentAssets");
    let current_liabilities = row_number(row, "totalCurrentLiabilities");

    Some(BalanceSheet {
        total_assets: row_number(row, "totalAssets"),
        total_liabilities: row_number(row, "totalLiab"),
        shareholders_equity: row_number(row, "totalStockholderEquity"),
        total_debt: statement_total_debt(row),
        cash_and_equivalents: row_number(row, "cash"),
        current_assets,
        current_liabilities,
        working_capital: match (current_assets, current_liabilities) {
            (Some(a), Some(l)) => Some(a - l),
            _ => None,
        },
    })
}

fn latest_income_statement(summary: &QuoteSummary) -> Option<IncomeStatement> {
    let row = summary
        .statements("incomeStatementHistory", "incomeStatementHistory")
        .first()?;

    Some(IncomeStatement {
        total_revenue: row_number(row, "totalRevenue"),
        gross_profit: row_number(row, "grossProfit"),
        operating_income: row_number(row, "operatingIncome"),
        net_income: row_number(row, "netIncome"),
        ebitda: summary.number("ebitda"),
        interest_expense: row_number(row, "interestExpense"),
        tax_provision: row_number(row, "incomeTaxExpense"),
    })
}

fn latest_cash_flow(summary: &QuoteSummary) -> Option<CashFlow> {
    let row = summary
        .statements("cashflowStatementHistory", "cashflowStatements")
        .first()?;
    let operating = row_number(row, "totalCashFromOperatingActivities");
    let capex = row_number(row, "capitalExpenditures");

    Some(CashFlow {
        operating_cash_flow: operating,
        investing_cash_flow: row_number(row, "totalCashflowsFromInvestingActivities"),
        financing_cash_flow: row_number(row, "totalCashFromFinancingActivities"),
        // Capital expenditures are reported as a negative outflow
        free_cash_flow: match (operating, capex) {
            (Some(op), Some(cx)) => Some(op + cx),
            _ => None,
        },
        capital_expenditures: capex,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const FY2024: i64 = 1711843200; // 2024-03-31
    const FY2023: i64 = 1680220800; // 2023-03-31
    const Q_DEC: i64 = 1703980800; // 2023-12-31

    fn raw(v: f64) -> Value {
        json!({ "raw": v, "fmt": v.to_string() })
    }

    fn sample_summary() -> QuoteSummary {
        QuoteSummary::from_response(&json!({
            "quoteSummary": { "result": [{
                "price": { "longName": "Tata Consultancy Services Limited", "regularMarketPrice": raw(3850.0) },
                "summaryDetail": {
                    "marketCap": raw(1.4e13),
                    "trailingPE": raw(29.5),
                    "dividendYield": raw(0.012),
                    "fiftyTwoWeekHigh": raw(4200.0),
                    "fiftyTwoWeekLow": raw(3300.0)
                },
                "financialData": {
                    "currentPrice": raw(3851.0),
                    "returnOnEquity": raw(0.46),
                    "returnOnAssets": raw(0.23),
                    "profitMargins": raw(0.19),
                    "debtToEquity": raw(0.08),
                    "ebitda": raw(6.0e11)
                },
                "defaultKeyStatistics": { "sharesOutstanding": raw(3.6e9) },
                "majorHoldersBreakdown": {
                    "insidersPercentHeld": raw(0.72),
                    "institutionsPercentHeld": raw(0.20)
                },
                "assetProfile": {
                    "sector": "Technology",
                    "industry": "Information Technology Services",
                    "fullTimeEmployees": 601546,
                    "companyOfficers": [
                        { "name": "Mr. N. Chandrasekaran", "title": "Chairman" },
                        { "name": "Mr. K. Krithivasan", "title": "CEO & MD" },
                        { "name": "Someone Else", "title": "Chairman Emeritus" }
                    ]
                },
                "incomeStatementHistory": { "incomeStatementHistory": [
                    { "endDate": raw(FY2024 as f64), "totalRevenue": raw(2.4e12), "netIncome": raw(4.6e11), "grossProfit": raw(1.0e12) },
                    { "endDate": raw(FY2023 as f64), "totalRevenue": raw(2.2e12), "netIncome": raw(4.2e11) }
                ]},
                "incomeStatementHistoryQuarterly": { "incomeStatementHistory": [
                    { "endDate": raw(Q_DEC as f64), "totalRevenue": raw(6.0e11), "netIncome": raw(1.2e11) }
                ]},
                "balanceSheetHistory": { "balanceSheetStatements": [
                    { "endDate": raw(FY2024 as f64), "totalAssets": raw(1.5e12), "longTermDebt": raw(1.0e10),
                      "totalCurrentAssets": raw(9.0e11), "totalCurrentLiabilities": raw(4.0e11) }
                ]},
                "cashflowStatementHistory": { "cashflowStatements": [
                    { "totalCashFromOperatingActivities": raw(4.4e11), "capitalExpenditures": raw(-3.0e10) }
                ]}
            }]}
        }))
        .unwrap()
    }

    #[test]
    fn test_build_snapshot_scales_and_maps_fields() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let s = build_snapshot("TCS", "TCS.NS", &sample_summary(), Vec::new(), now);

        assert_eq!(s.symbol, "TCS.NS");
        assert_eq!(s.company_name, "Tata Consultancy Services Limited");
        assert_eq!(s.current_price, 3851.0);
        assert_eq!(s.pe_ratio, Some(29.5));
        assert!((s.roe.unwrap() - 46.0).abs() < 1e-9);
        assert!((s.roce.unwrap() - 23.0).abs() < 1e-9);
        assert!((s.dividend_yield.unwrap() - 1.2).abs() < 1e-9);
        assert_eq!(s.debt_to_equity, Some(0.08));
        assert_eq!(s.profile.employees, Some(601546));
        assert_eq!(s.profile.country, "India");
        assert_eq!(s.last_updated, now);
    }

    #[test]
    fn test_shareholding_remainder_is_retail() {
        let s = build_snapshot("TCS", "TCS.NS", &sample_summary(), Vec::new(), Utc::now());
        let holding = s.shareholding;
        assert!((holding.promoter.unwrap() - 72.0).abs() < 1e-9);
        assert!((holding.fii.unwrap() - 20.0).abs() < 1e-9);
        assert!((holding.retail.unwrap() - 8.0).abs() < 1e-9);
        assert!(holding.dii.is_none());
    }

    #[test]
    fn test_officers_from_first_two_only() {
        let s = build_snapshot("TCS", "TCS.NS", &sample_summary(), Vec::new(), Utc::now());
        assert_eq!(s.profile.chairman.as_deref(), Some("Mr. N. Chandrasekaran"));
        assert_eq!(s.profile.managing_director.as_deref(), Some("Mr. K. Krithivasan"));
    }

    #[test]
    fn test_statement_rows() {
        let s = build_snapshot("TCS", "TCS.NS", &sample_summary(), Vec::new(), Utc::now());

        assert_eq!(s.annual.len(), 2);
        assert_eq!(s.annual[0].year, "2024");
        assert_eq!(s.annual[0].total_assets, Some(1.5e12));
        assert_eq!(s.annual[0].total_debt, Some(1.0e10));
        assert!((s.annual[0].eps.unwrap() - 4.6e11 / 3.6e9).abs() < 1e-6);
        // No balance sheet for FY2023
        assert!(s.annual[1].total_assets.is_none());

        assert_eq!(s.quarterly.len(), 1);
        assert_eq!(s.quarterly[0].quarter, "2023-Q4");

        let bs = s.balance_sheet.unwrap();
        assert_eq!(bs.working_capital, Some(5.0e11));

        let cf = s.cash_flow.unwrap();
        assert_eq!(cf.free_cash_flow, Some(4.1e11));

        let is = s.income_statement.unwrap();
        assert_eq!(is.ebitda, Some(6.0e11));
    }

    #[test]
    fn test_sparse_summary_yields_empty_sections() {
        let summary = QuoteSummary::from_response(&json!({
            "quoteSummary": { "result": [{ "summaryDetail": { "previousClose": raw(10.0) } }] }
        }))
        .unwrap();

        let s = build_snapshot("XYZ", "XYZ.NS", &summary, Vec::new(), Utc::now());
        assert_eq!(s.company_name, "XYZ");
        assert!(s.annual.is_empty());
        assert!(s.balance_sheet.is_none());
        assert!(s.shareholding.retail.is_none());
        assert!(s.performance.year_performance.is_none());
    }

    #[test]
    fn test_eps_requires_nonzero_shares() {
        assert_eq!(eps(Some(10.0), Some(0.0)), None);
        assert_eq!(eps(None, Some(5.0)), None);
        assert_eq!(eps(Some(10.0), Some(5.0)), Some(2.0));
    }
}
