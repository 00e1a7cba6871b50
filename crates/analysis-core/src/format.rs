//! Display formatting for rupee amounts, ratios and percentages.
//!
//! Every formatter returns `"N/A"` for missing or non-finite input so the
//! dashboard never prints `NaN`.

pub const NOT_AVAILABLE: &str = "N/A";

const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;
const THOUSAND: f64 = 1_000.0;

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Rupee amount scaled to crore / lakh / thousand.
pub fn format_currency(amount: Option<f64>) -> String {
    let Some(amount) = finite(amount) else {
        return NOT_AVAILABLE.to_string();
    };

    let magnitude = amount.abs();
    if magnitude >= CRORE {
        format!("₹{:.2} Cr", amount / CRORE)
    } else if magnitude >= LAKH {
        format!("₹{:.2} L", amount / LAKH)
    } else if magnitude >= THOUSAND {
        format!("₹{:.2} K", amount / THOUSAND)
    } else {
        format!("₹{:.2}", amount)
    }
}

pub fn format_percentage(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:.2}%", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_signed_percent(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:+.2}%", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_ratio(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:.2}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Rupee price with thousands separators, e.g. `₹3,845.20`.
pub fn format_price(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("₹{}", group_thousands(v, 2)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Whole number with thousands separators, e.g. `614,795`.
pub fn format_count(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => group_thousands(v, 0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a table cell based on its column name.
pub fn format_cell(column: &str, value: Option<f64>) -> String {
    let col = column.to_lowercase();
    if ["revenue", "income", "assets", "debt"].iter().any(|k| col.contains(k)) {
        format_currency(value)
    } else if col.contains("eps") {
        match finite(value) {
            Some(v) => format!("₹{:.2}", v),
            None => NOT_AVAILABLE.to_string(),
        }
    } else if col.contains('%') || col.contains("ratio") {
        format_ratio(value)
    } else {
        match finite(value) {
            Some(v) => v.to_string(),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Traffic-light rating for the financial health row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthLevel {
    Good,
    Fair,
    Poor,
}

impl HealthLevel {
    pub fn emoji(&self) -> &'static str {
        match self {
            HealthLevel::Good => "🟢",
            HealthLevel::Fair => "🟡",
            HealthLevel::Poor => "🔴",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            HealthLevel::Good => "health-good",
            HealthLevel::Fair => "health-fair",
            HealthLevel::Poor => "health-poor",
        }
    }

    fn higher_is_better(value: f64, good: f64, fair: f64) -> Self {
        if value > good {
            HealthLevel::Good
        } else if value > fair {
            HealthLevel::Fair
        } else {
            HealthLevel::Poor
        }
    }

    /// Profit margin in percent.
    pub fn profit_margin(value: f64) -> Self {
        Self::higher_is_better(value, 15.0, 5.0)
    }

    /// Revenue growth in percent.
    pub fn revenue_growth(value: f64) -> Self {
        Self::higher_is_better(value, 10.0, 0.0)
    }

    pub fn current_ratio(value: f64) -> Self {
        Self::higher_is_better(value, 1.5, 1.0)
    }

    pub fn debt_to_equity(value: f64) -> Self {
        if value < 0.5 {
            HealthLevel::Good
        } else if value < 1.0 {
            HealthLevel::Fair
        } else {
            HealthLevel::Poor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_scales() {
        assert_eq!(format_currency(Some(2.5e11)), "₹25000.00 Cr");
        assert_eq!(format_currency(Some(1.0e7)), "₹1.00 Cr");
        assert_eq!(format_currency(Some(250_000.0)), "₹2.50 L");
        assert_eq!(format_currency(Some(1_500.0)), "₹1.50 K");
        assert_eq!(format_currency(Some(999.5)), "₹999.50");
    }

    #[test]
    fn test_format_currency_negative_uses_magnitude() {
        assert_eq!(format_currency(Some(-3.2e8)), "₹-32.00 Cr");
    }

    #[test]
    fn test_missing_values_render_na() {
        assert_eq!(format_currency(None), "N/A");
        assert_eq!(format_currency(Some(f64::NAN)), "N/A");
        assert_eq!(format_percentage(Some(f64::INFINITY)), "N/A");
        assert_eq!(format_ratio(None), "N/A");
        assert_eq!(format_price(None), "N/A");
    }

    #[test]
    fn test_percent_and_ratio() {
        assert_eq!(format_percentage(Some(12.3456)), "12.35%");
        assert_eq!(format_signed_percent(Some(4.5)), "+4.50%");
        assert_eq!(format_signed_percent(Some(-4.5)), "-4.50%");
        assert_eq!(format_ratio(Some(0.456)), "0.46");
    }

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(Some(3845.2)), "₹3,845.20");
        assert_eq!(format_price(Some(1234567.891)), "₹1,234,567.89");
        assert_eq!(format_price(Some(12.0)), "₹12.00");
        assert_eq!(format_price(Some(-1500.0)), "₹-1,500.00");
        assert_eq!(format_count(Some(614795.0)), "614,795");
    }

    #[test]
    fn test_format_cell_by_column() {
        assert_eq!(format_cell("Total Revenue", Some(2.0e10)), "₹2000.00 Cr");
        assert_eq!(format_cell("Net Income", Some(5.0e5)), "₹5.00 L");
        assert_eq!(format_cell("EPS", Some(16.6139)), "₹16.61");
        assert_eq!(format_cell("Current Ratio", Some(1.234)), "1.23");
        assert_eq!(format_cell("EPS", None), "N/A");
    }

    #[test]
    fn test_health_levels() {
        assert_eq!(HealthLevel::profit_margin(20.0), HealthLevel::Good);
        assert_eq!(HealthLevel::profit_margin(10.0), HealthLevel::Fair);
        assert_eq!(HealthLevel::profit_margin(2.0), HealthLevel::Poor);
        assert_eq!(HealthLevel::revenue_growth(-1.0), HealthLevel::Poor);
        assert_eq!(HealthLevel::debt_to_equity(0.2), HealthLevel::Good);
        assert_eq!(HealthLevel::debt_to_equity(0.8), HealthLevel::Fair);
        assert_eq!(HealthLevel::debt_to_equity(45.0), HealthLevel::Poor);
        assert_eq!(HealthLevel::current_ratio(1.2).emoji(), "🟡");
    }
}
