//! The single dashboard page: chat, results and the landing showcase.

use analysis_core::format::{
    format_cell, format_count, format_currency, format_percentage, format_price, format_ratio,
    format_signed_percent, HealthLevel, NOT_AVAILABLE,
};
use analysis_core::symbols::popular_stocks;
use analysis_core::{ChatRole, InsightReport, StockSnapshot};
use chrono::{DateTime, FixedOffset, Utc};

use super::charts::{price_chart_svg, shareholding_chart_svg};
use super::html::{escape, facts, info, layout, metric, metric_row, table, warning};
use crate::session::Session;

const PAGE_TITLE: &str = "InvestIQ - AI Stock Analysis";
const BUSINESS_SUMMARY_CHARS: usize = 500;
const IST_OFFSET_SECS: i32 = 5 * 3600 + 1800;

const SECTIONS: [(&str, &str); 7] = [
    ("dashboard", "🏠 Dashboard"),
    ("overview", "📊 Overview"),
    ("analysis", "📋 Analysis"),
    ("profit-loss", "💰 Profit & Loss"),
    ("balance-sheet", "📊 Balance Sheet"),
    ("cash-flow", "💸 Cash Flow"),
    ("investors", "👥 Investors"),
];

/// Render the whole page for a session (or a fresh visitor).
pub fn render_dashboard(session: Option<&Session>, now: DateTime<Utc>) -> String {
    let mut body = String::new();

    body.push_str(&header());
    body.push_str(&feature_cards());
    body.push_str(&quick_start());
    body.push_str(&chat(session));

    match session.and_then(Session::result) {
        Some((snapshot, report)) => {
            body.push_str(&analysis(snapshot, report));
        }
        None => {
            body.push_str(&showcase());
            body.push_str(&market_information(now));
        }
    }

    body.push_str(&footer());
    layout(PAGE_TITLE, &body)
}

fn header() -> String {
    r#"<header class="main-header">
<h1>💹 InvestIQ</h1>
<h3>Professional AI-Powered Stock Analysis Platform</h3>
<p>Real-time financial data • Advanced analytics • AI-driven insights</p>
<div class="market-status">🟢 Markets Open • Real-time Data</div>
</header>"#
        .to_string()
}

fn feature_cards() -> String {
    let cards = [
        ("📊 Real-time Data", "Live stock prices, financial ratios, and market metrics from NSE/BSE"),
        ("🤖 AI Analysis", "Advanced AI-powered investment insights and recommendations"),
        ("📈 Comprehensive Metrics", "40+ financial indicators including valuation, growth, and risk metrics"),
        ("💼 Professional Reports", "Detailed quarterly analysis, shareholding patterns, and performance tracking"),
    ];
    let cards: String = cards
        .iter()
        .map(|(title, text)| {
            format!(
                r#"<div class="feature-card"><h4>{}</h4><p>{}</p></div>"#,
                escape(title),
                escape(text)
            )
        })
        .collect();
    format!(r#"<section class="features">{cards}</section><hr>"#)
}

fn quick_start() -> String {
    let buttons: String = popular_stocks()
        .iter()
        .map(|symbol| {
            format!(
                r#"<form method="post" action="/chat" class="quick-form"><input type="hidden" name="message" value="{s}"><button type="submit" class="quick-button">📊 {s}</button></form>"#,
                s = escape(symbol)
            )
        })
        .collect();

    format!(
        r#"<section class="start">
<h3>📈 Start Your Analysis</h3>
<p>Enter any Indian stock symbol or company name to get comprehensive analysis:</p>
<p><strong>Popular Stocks:</strong></p>
<div class="quick-buttons">{buttons}</div>
</section>"#
    )
}

fn chat(session: Option<&Session>) -> String {
    let history: String = session
        .map(|s| s.chat_history.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|message| {
            let (class, who) = match message.role {
                ChatRole::User => ("chat-user", "You"),
                ChatRole::Assistant => ("chat-assistant", "InvestIQ"),
            };
            format!(
                r#"<div class="chat-message {class}"><span class="chat-role">{who}</span><p>{}</p></div>"#,
                escape(&message.content)
            )
        })
        .collect();

    format!(
        r#"<section class="chat">
<h2>💬 AI Stock Analysis Chat</h2>
<form method="post" action="/chat" class="chat-form">
<input type="text" name="message" autocomplete="off" required placeholder="💼 Enter stock symbol or company name (e.g., 'TCS', 'Infosys', 'RELIANCE.NS')">
<button type="submit">Analyze</button>
</form>
<div class="chat-history">{history}</div>
</section>"#
    )
}

fn opt_text(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn analysis(s: &StockSnapshot, report: &InsightReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        r#"<hr><h2>📊 Analysis: {} ({})</h2>"#,
        escape(&s.company_name),
        escape(&s.symbol)
    ));
    out.push_str(&company_banner(s));
    out.push_str(&market_metrics(s));
    out.push_str(&health_indicators(s));

    let nav: String = SECTIONS
        .iter()
        .map(|(id, label)| format!(r##"<a href="#{id}">{}</a>"##, escape(label)))
        .collect();
    out.push_str(&format!(r#"<nav class="section-nav">{nav}</nav>"#));

    out.push_str(&dashboard_section(s));
    out.push_str(&overview_section(s));
    out.push_str(&statements_section(s));
    out.push_str(&profit_loss_section(s));
    out.push_str(&balance_sheet_section(s));
    out.push_str(&cash_flow_section(s));
    out.push_str(&investors_section(s));
    out.push_str(&price_history(s));
    out.push_str(&insights(report));

    out.push_str(
        r#"<form method="post" action="/clear" class="clear-form"><button type="submit" class="secondary">🔄 Clear Analysis</button></form>"#,
    );
    out
}

fn company_banner(s: &StockSnapshot) -> String {
    format!(
        r#"<div class="company-banner">
<h2>🏢 {company}</h2>
<h4>Symbol: {symbol} | {sector} Sector</h4>
<p>{industry} • {country}</p>
</div>"#,
        company = escape(&s.company_name),
        symbol = escape(&s.symbol),
        sector = escape(s.sector()),
        industry = escape(s.industry()),
        country = escape(&s.profile.country),
    )
}

fn market_metrics(s: &StockSnapshot) -> String {
    let year = s
        .performance
        .year_performance
        .map(|p| format!("{} (1Y)", format_signed_percent(Some(p))));
    let employees = s
        .profile
        .employees
        .map(|e| format!("👥 {} employees", format_count(Some(e as f64))));
    let pb = s.pb_ratio.map(|pb| format!("P/B: {}", format_ratio(Some(pb))));
    let low = s
        .fifty_two_week_low
        .map(|low| format!("Low: {}", format_price(Some(low))));
    let dividend = s
        .dividend_yield
        .map(|dy| format!("🎯 Div: {}", format_percentage(Some(dy))));

    format!(
        "<h3>📊 Real-Time Market Data</h3>{}",
        metric_row(&[
            metric("Current Price", &format_price(Some(s.current_price)), year.as_deref()),
            metric("Market Cap", &format_currency(s.market_cap), employees.as_deref()),
            metric("P/E Ratio", &format_ratio(s.pe_ratio), pb.as_deref()),
            metric("52W High", &format_price(s.fifty_two_week_high), low.as_deref()),
            metric("ROE", &format_percentage(s.roe), dividend.as_deref()),
        ])
    )
}

fn health_card(label: &str, value: Option<f64>, rate: fn(f64) -> HealthLevel, percent: bool) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return metric(label, NOT_AVAILABLE, None);
    };
    let level = rate(v);
    let shown = if percent {
        format_percentage(Some(v))
    } else {
        format_ratio(Some(v))
    };
    format!(
        r#"<div class="metric-card {}"><div class="metric-label">{}</div><div class="metric-value">{}</div><div class="metric-caption">{}</div></div>"#,
        level.css_class(),
        escape(label),
        escape(&shown),
        level.emoji()
    )
}

fn health_indicators(s: &StockSnapshot) -> String {
    if s.profit_margins.is_none() && s.revenue_growth.is_none() && s.debt_to_equity.is_none() {
        return String::new();
    }

    format!(
        "<h3>💼 Financial Health Indicators</h3>{}",
        metric_row(&[
            health_card("Profit Margin", s.profit_margins, HealthLevel::profit_margin, true),
            health_card("Revenue Growth", s.revenue_growth, HealthLevel::revenue_growth, true),
            health_card("Debt/Equity", s.debt_to_equity, HealthLevel::debt_to_equity, false),
            health_card("Current Ratio", s.current_ratio, HealthLevel::current_ratio, false),
        ])
    )
}

fn section(id: &str, title: &str, content: &str) -> String {
    format!(
        r#"<section id="{id}" class="report-section"><h3>{}</h3>{content}</section>"#,
        escape(title)
    )
}

fn holding_legend(s: &StockSnapshot) -> String {
    let items: String = s
        .shareholding
        .rows()
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            format!(
                r#"<li><span class="swatch swatch-{i}"></span>{}: {}</li>"#,
                escape(label),
                escape(&format_percentage(*value))
            )
        })
        .collect();
    format!(r#"<ul class="legend">{items}</ul>"#)
}

fn chart_figure(result: anyhow::Result<String>, what: &str) -> String {
    match result {
        Ok(svg) => format!(r#"<figure class="chart">{svg}</figure>"#),
        Err(e) => {
            tracing::debug!("{} chart skipped: {}", what, e);
            info(&format!("📉 {what} chart unavailable: {e}"))
        }
    }
}

fn dashboard_section(s: &StockSnapshot) -> String {
    let company = facts(&[
        ("Scrip Name", s.symbol.clone()),
        ("Chairman", opt_text(s.profile.chairman.as_deref())),
        ("Status", "Active".to_string()),
    ]);
    let corporate = facts(&[
        ("Symbol", s.symbol.clone()),
        ("Managing Director", opt_text(s.profile.managing_director.as_deref())),
        ("Country", s.profile.country.clone()),
    ]);
    let business = facts(&[
        ("Industry", s.industry().to_string()),
        ("Sector", s.sector().to_string()),
        ("Employees", format_count(s.profile.employees.map(|e| e as f64))),
    ]);

    let quick = metric_row(&[
        metric("ROE (%)", &format_ratio(s.roe), None),
        metric("ROCE (%)", &format_ratio(s.roce), None),
        metric("EPS (₹)", &format_ratio(s.eps), None),
        metric("PAT Margin (%)", &format_ratio(s.profit_margins), None),
        metric("Dividend per Share", &format_ratio(s.dividend_per_share), None),
        metric("Earnings Growth (%)", &format_ratio(s.earnings_growth), None),
        metric("Debt/Equity", &format_ratio(s.debt_to_equity), None),
        metric("Current Ratio", &format_ratio(s.current_ratio), None),
        metric("Net Sales Growth (%)", &format_ratio(s.revenue_growth), None),
    ]);

    let content = format!(
        r#"<div class="columns">
<div><h4>Company Information</h4>{company}</div>
<div><h4>Corporate Details</h4>{corporate}</div>
<div><h4>Business Information</h4>{business}</div>
</div>
<div class="columns two">
<div><h4>Shareholding Pattern</h4>{chart}{legend}</div>
<div><h4>Quick Financial Analysis</h4><p class="caption">Latest Data: Current Quarter</p>{quick}</div>
</div>"#,
        chart = chart_figure(shareholding_chart_svg(&s.shareholding), "Shareholding"),
        legend = holding_legend(s),
    );

    section("dashboard", "📊 Company Dashboard", &content)
}

fn overview_section(s: &StockSnapshot) -> String {
    let details = facts(&[
        ("Name", s.company_name.clone()),
        ("Symbol", s.symbol.clone()),
        ("Sector", s.sector().to_string()),
        ("Industry", s.industry().to_string()),
    ]);
    let market = facts(&[
        ("Market Cap", format_currency(s.market_cap)),
        ("Current Price", format_price(Some(s.current_price))),
        (
            "52W High/Low",
            format!(
                "{} / {}",
                format_price(s.fifty_two_week_high),
                format_price(s.fifty_two_week_low)
            ),
        ),
        ("Book Value", format_price(s.book_value)),
    ]);
    let ratios = facts(&[
        ("P/E Ratio", format_ratio(s.pe_ratio)),
        ("P/B Ratio", format_ratio(s.pb_ratio)),
        ("ROE", format_percentage(s.roe)),
        ("Dividend Yield", format_percentage(s.dividend_yield)),
    ]);

    let additional = metric_row(&[
        metric("Price/Sales", &format_ratio(s.price_to_sales), None),
        metric("Enterprise Value", &format_currency(s.enterprise_value), None),
        metric("EV/Revenue", &format_ratio(s.ev_to_revenue), None),
        metric("EV/EBITDA", &format_ratio(s.ev_to_ebitda), None),
        metric("Quick Ratio", &format_ratio(s.quick_ratio), None),
        metric("Operating Margin (%)", &format_ratio(s.operating_margins), None),
        metric("Total Cash", &format_currency(s.total_cash), None),
        metric("Total Debt", &format_currency(s.total_debt), None),
        metric("Free Cash Flow", &format_currency(s.free_cash_flow), None),
    ]);

    let content = format!(
        r#"<div class="columns">
<div><h4>Company Details</h4>{details}</div>
<div><h4>Market Data</h4>{market}</div>
<div><h4>Key Ratios</h4>{ratios}</div>
</div>
<h4>Additional Metrics</h4>{additional}"#
    );

    section("overview", "Company Overview", &content)
}

fn statements_section(s: &StockSnapshot) -> String {
    let mut content = String::from("<h4>Annual Financial Summary (Last 5 Years)</h4>");
    if s.annual.is_empty() {
        content.push_str(&warning("Annual financial data not available for this stock."));
    } else {
        let rows: Vec<Vec<String>> = s
            .annual
            .iter()
            .map(|year| {
                vec![
                    year.year.clone(),
                    format_cell("Total Revenue", year.total_revenue),
                    format_cell("Net Income", year.net_income),
                    format_cell("EPS", year.eps),
                    format_cell("Total Assets", year.total_assets),
                    format_cell("Total Debt", year.total_debt),
                ]
            })
            .collect();
        content.push_str(&table(
            &["Year", "Total Revenue", "Net Income", "EPS", "Total Assets", "Total Debt"],
            &rows,
        ));
    }

    content.push_str("<h4>Quarterly Analysis (Last 8 Quarters)</h4>");
    if s.quarterly.is_empty() {
        content.push_str(&warning("Quarterly financial data not available for this stock."));
    } else {
        let rows: Vec<Vec<String>> = s
            .quarterly
            .iter()
            .map(|quarter| {
                vec![
                    quarter.quarter.clone(),
                    format_cell("Total Revenue", quarter.total_revenue),
                    format_cell("Net Income", quarter.net_income),
                    format_cell("EPS", quarter.eps),
                ]
            })
            .collect();
        content.push_str(&table(&["Quarter", "Total Revenue", "Net Income", "EPS"], &rows));
    }

    section("analysis", "📋 Comprehensive Analysis", &content)
}

fn profit_loss_section(s: &StockSnapshot) -> String {
    let Some(income) = &s.income_statement else {
        return section(
            "profit-loss",
            "💰 Profit & Loss Statement",
            &warning("Profit & Loss data not available for this stock."),
        );
    };

    let revenue = table(
        &["Metric", "Amount (₹ Cr)"],
        &[
            vec!["Total Revenue".into(), format_currency(income.total_revenue)],
            vec!["Gross Profit".into(), format_currency(income.gross_profit)],
            vec!["Operating Income".into(), format_currency(income.operating_income)],
            vec!["EBITDA".into(), format_currency(income.ebitda)],
            vec!["Net Income".into(), format_currency(income.net_income)],
        ],
    );
    let expenses = table(
        &["Metric", "Amount"],
        &[
            vec!["Interest Expense".into(), format_currency(income.interest_expense)],
            vec!["Tax Provision".into(), format_currency(income.tax_provision)],
            vec!["Operating Margin %".into(), format_percentage(s.operating_margins)],
            vec!["Net Margin %".into(), format_percentage(s.profit_margins)],
        ],
    );

    section(
        "profit-loss",
        "💰 Profit & Loss Statement",
        &format!(
            r#"<h4>Income Statement (Latest Year)</h4><div class="columns two"><div><h4>Revenue &amp; Profitability</h4>{revenue}</div><div><h4>Expenses &amp; Taxes</h4>{expenses}</div></div>"#
        ),
    )
}

fn balance_sheet_section(s: &StockSnapshot) -> String {
    let Some(balance) = &s.balance_sheet else {
        return section(
            "balance-sheet",
            "📊 Balance Sheet",
            &warning("Balance sheet data not available for this stock."),
        );
    };

    let assets = table(
        &["Assets", "Amount (₹ Cr)"],
        &[
            vec!["Total Assets".into(), format_currency(balance.total_assets)],
            vec!["Current Assets".into(), format_currency(balance.current_assets)],
            vec!["Cash & Equivalents".into(), format_currency(balance.cash_and_equivalents)],
        ],
    );
    let liabilities = table(
        &["Liabilities & Equity", "Amount (₹ Cr)"],
        &[
            vec!["Total Liabilities".into(), format_currency(balance.total_liabilities)],
            vec!["Current Liabilities".into(), format_currency(balance.current_liabilities)],
            vec!["Total Debt".into(), format_currency(balance.total_debt)],
            vec!["Shareholders Equity".into(), format_currency(balance.shareholders_equity)],
        ],
    );
    let ratios = metric_row(&[
        metric("Working Capital", &format_currency(balance.working_capital), None),
        metric("Current Ratio", &format_ratio(s.current_ratio), None),
        metric("Debt to Equity", &format_ratio(s.debt_to_equity), None),
    ]);

    section(
        "balance-sheet",
        "📊 Balance Sheet",
        &format!(
            r#"<h4>Balance Sheet (Latest Year)</h4><div class="columns two"><div><h4>Assets</h4>{assets}</div><div><h4>Liabilities &amp; Equity</h4>{liabilities}</div></div><h4>Key Balance Sheet Ratios</h4>{ratios}"#
        ),
    )
}

fn cash_flow_section(s: &StockSnapshot) -> String {
    let Some(cash) = &s.cash_flow else {
        return section(
            "cash-flow",
            "💸 Cash Flow Statement",
            &warning("Cash flow data not available for this stock."),
        );
    };

    let capex = format!("CapEx: {}", format_currency(cash.capital_expenditures));
    let free = format!("Free Cash Flow: {}", format_currency(cash.free_cash_flow));
    let cards = metric_row(&[
        metric("Operating Cash Flow", &format_currency(cash.operating_cash_flow), None),
        metric("Investing Cash Flow", &format_currency(cash.investing_cash_flow), Some(capex.as_str())),
        metric("Financing Cash Flow", &format_currency(cash.financing_cash_flow), Some(free.as_str())),
    ]);
    let summary = table(
        &["Activity", "Amount (₹ Cr)"],
        &[
            vec!["Operating Cash Flow".into(), format_currency(cash.operating_cash_flow)],
            vec!["Investing Cash Flow".into(), format_currency(cash.investing_cash_flow)],
            vec!["Financing Cash Flow".into(), format_currency(cash.financing_cash_flow)],
            vec!["Free Cash Flow".into(), format_currency(cash.free_cash_flow)],
        ],
    );

    section(
        "cash-flow",
        "💸 Cash Flow Statement",
        &format!("<h4>Cash Flow Statement (Latest Year)</h4>{cards}<h4>Cash Flow Summary</h4>{summary}"),
    )
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

fn investors_section(s: &StockSnapshot) -> String {
    let rows = s.shareholding.rows();
    let cards: Vec<String> = rows
        .iter()
        .map(|(label, value)| {
            let short = label.split(" (").next().unwrap_or(*label);
            metric(short, &format_percentage(*value), None)
        })
        .collect();
    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(label, value)| vec![label.to_string(), format_percentage(*value)])
        .collect();

    let mut content = format!(
        "<h4>Shareholding Pattern</h4>{}{}<h4>Key Information</h4>",
        metric_row(&cards),
        table(&["Shareholder Type", "Percentage (%)"], &table_rows)
    );

    if let Some(employees) = s.profile.employees {
        content.push_str(&info(&format!(
            "Total Employees: {}",
            format_count(Some(employees as f64))
        )));
    }
    if let Some(website) = s.profile.website.as_deref().filter(|w| !w.is_empty()) {
        // Only link plain web addresses
        if website.starts_with("https://") || website.starts_with("http://") {
            content.push_str(&format!(
                r#"<p class="notice notice-info">Website: <a href="{url}" rel="noopener noreferrer">{url}</a></p>"#,
                url = escape(website)
            ));
        } else {
            content.push_str(&info(&format!("Website: {website}")));
        }
    }
    if let Some(summary) = s
        .profile
        .business_summary
        .as_deref()
        .filter(|b| !b.is_empty() && *b != NOT_AVAILABLE)
    {
        content.push_str(&format!(
            "<h4>Business Summary</h4><p>{}</p>",
            escape(&truncate_chars(summary, BUSINESS_SUMMARY_CHARS))
        ));
    }

    section("investors", "👥 Investors & Shareholding", &content)
}

fn price_history(s: &StockSnapshot) -> String {
    let perf = &s.performance;
    let stats = metric_row(&[
        metric("1Y Performance", &format_signed_percent(perf.year_performance), None),
        metric("Volatility (daily %)", &format_ratio(perf.volatility), None),
        metric("Avg Volume", &format_count(perf.avg_volume), None),
    ]);

    format!(
        r#"<section class="report-section"><h3>📈 Price History</h3>{}{stats}</section>"#,
        chart_figure(price_chart_svg(&s.history), "Price")
    )
}

fn insights(report: &InsightReport) -> String {
    let items = if report.insights.is_empty() {
        info("No specific insights available for this stock.")
    } else {
        let list: String = report
            .insights
            .iter()
            .map(|insight| format!("<li>{}</li>", escape(insight)))
            .collect();
        format!("<ol>{list}</ol>")
    };

    let summary = if report.investment_summary.trim().is_empty() {
        info("Investment analysis not available for this stock.")
    } else {
        format!("<p>{}</p>", escape(&report.investment_summary))
    };

    let call = report
        .recommendation
        .map(|r| {
            format!(
                r#"<p class="recommendation recommendation-{}">Recommendation: {}</p>"#,
                r.to_label().to_lowercase(),
                r.to_label()
            )
        })
        .unwrap_or_default();

    let risks = if report.risks.is_empty() {
        String::new()
    } else {
        let list: String = report
            .risks
            .iter()
            .map(|risk| format!("<li>{}</li>", escape(risk)))
            .collect();
        format!("<h4>⚠️ Key Risks</h4><ul>{list}</ul>")
    };

    format!(
        r#"<hr><section class="ai-analysis">
<h2>🤖 AI-Generated Analysis</h2>
<div class="columns two">
<div><h3>💡 Key Insights</h3>{items}</div>
<div><h3>📈 Investment Implication</h3>{call}{summary}{risks}</div>
</div>
<p class="caption">Source: {source}</p>
</section>"#,
        source = escape(&report.source)
    )
}

fn showcase() -> String {
    r#"<hr><section class="showcase">
<h3>🔍 What You'll Get</h3>
<div class="columns two">
<div><h4>📊 Comprehensive Financial Analysis:</h4><ul>
<li>Real-time stock prices and market data</li>
<li>40+ key financial metrics and ratios</li>
<li>Year-over-year performance tracking</li>
<li>Quarterly earnings analysis</li>
<li>Shareholding pattern breakdown</li>
</ul></div>
<div><h4>🤖 AI-Powered Insights:</h4><ul>
<li>Investment recommendations</li>
<li>Risk assessment analysis</li>
<li>Growth potential evaluation</li>
<li>Market trend analysis</li>
<li>Professional investment thesis</li>
</ul></div>
</div>
</section>"#
        .to_string()
}

/// Wall-clock time in India Standard Time.
fn ist_time(now: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(IST_OFFSET_SECS) {
        Some(ist) => format!("{} IST", now.with_timezone(&ist).format("%Y-%m-%d %H:%M:%S")),
        None => format!("{} UTC", now.format("%Y-%m-%d %H:%M:%S")),
    }
}

fn market_information(now: DateTime<Utc>) -> String {
    format!(
        r#"<div class="footer-info">
<h4>📈 Market Information</h4>
<p><strong>NSE &amp; BSE Data:</strong> Real-time during market hours (9:15 AM - 3:30 PM IST)</p>
<p><strong>Current Time:</strong> {}</p>
<p><strong>Data Source:</strong> Real-time NSE/BSE market data</p>
<small>⚠️ <strong>Disclaimer:</strong> This is for educational purposes only. Not financial advice. Please consult a qualified financial advisor for investment decisions.</small>
</div>"#,
        escape(&ist_time(now))
    )
}

fn footer() -> String {
    r#"<hr><footer class="page-footer">
<strong>InvestIQ</strong> - Professional AI Stock Analysis Platform<br>
Real-time NSE/BSE Market Data | Professional Financial Analysis Platform<br>
<small>⚠️ Educational purposes only. Not financial advice. Consult qualified advisors for investment decisions.</small>
</footer>"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{ChatMessage, Recommendation};
    use chrono::TimeZone;

    fn session() -> Session {
        let mut s = Session {
            chat_history: Vec::new(),
            current_snapshot: None,
            current_report: None,
            last_seen: Utc::now(),
        };
        s.push_message(ChatMessage::user("<TCS>"));
        s
    }

    fn report() -> InsightReport {
        InsightReport {
            insights: vec!["Strong ROE".to_string()],
            investment_summary: "Quality compounder.".to_string(),
            recommendation: Some(Recommendation::Buy),
            risks: vec!["Currency headwinds".to_string()],
            source: "groq".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 4, 0, 0).unwrap()
    }

    #[test]
    fn test_landing_page_shows_showcase_and_market_hours() {
        let page = render_dashboard(None, now());
        assert!(page.contains("💹 InvestIQ"));
        assert!(page.contains("What You'll Get"));
        assert!(page.contains("9:15 AM - 3:30 PM IST"));
        assert!(page.contains("2024-06-03 09:30:00 IST"));
        assert!(page.contains(r#"value="HDFCBANK""#));
        assert!(!page.contains("Clear Analysis"));
    }

    #[test]
    fn test_chat_history_is_escaped() {
        let s = session();
        let page = render_dashboard(Some(&s), now());
        assert!(page.contains("&lt;TCS&gt;"));
        assert!(!page.contains("<TCS>"));
    }

    #[test]
    fn test_results_render_all_sections() {
        let mut s = session();
        let mut snapshot = StockSnapshot::new("TCS.NS", "Tata Consultancy Services", 3845.2);
        snapshot.profit_margins = Some(19.0);
        snapshot.debt_to_equity = Some(0.08);
        s.set_result(snapshot, report());

        let page = render_dashboard(Some(&s), now());
        for (id, _) in SECTIONS {
            assert!(page.contains(&format!(r#"id="{id}""#)), "missing section {id}");
        }
        assert!(page.contains("🏢 Tata Consultancy Services"));
        assert!(page.contains("Financial Health Indicators"));
        assert!(page.contains("health-good"));
        assert!(page.contains("Annual financial data not available for this stock."));
        assert!(page.contains("Price chart unavailable"));
        assert!(page.contains("Recommendation: Buy"));
        assert!(page.contains("Currency headwinds"));
        assert!(page.contains("🔄 Clear Analysis"));
        assert!(!page.contains("What You'll Get"));
    }

    #[test]
    fn test_health_row_hidden_without_inputs() {
        let mut s = session();
        s.set_result(StockSnapshot::new("ITC.NS", "ITC Limited", 450.0), report());
        let page = render_dashboard(Some(&s), now());
        assert!(!page.contains("Financial Health Indicators"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("₹₹₹₹", 2), "₹₹...");
    }
}
