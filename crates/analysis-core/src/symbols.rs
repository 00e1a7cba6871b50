//! Symbol extraction and NSE/BSE normalization.

use regex::Regex;
use std::sync::LazyLock;

pub const NSE_SUFFIX: &str = ".NS";
pub const BSE_SUFFIX: &str = ".BO";

/// Phrasings accepted in the chat box, tried in order.
static INPUT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)analyze\s+stock:\s*([A-Za-z]+)",
        r"(?i)analyze\s+([A-Za-z]+)",
        r"(?i)stock:\s*([A-Za-z]+)",
        r"(?i)^([A-Za-z]+)$",
        r"(?i)([A-Za-z]+)\s+stock",
        r"(?i)([A-Za-z]+)\s+analysis",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static symbol pattern"))
    .collect()
});

static QUALIFIED_SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Za-z][A-Za-z0-9&-]*)\.(NS|BO)$").expect("static qualified symbol pattern")
});

/// Company names and short forms mapped to their NSE tickers.
const KNOWN_SYMBOLS: &[(&str, &str)] = &[
    ("TCS", "TCS.NS"),
    ("INFY", "INFY.NS"),
    ("INFOSYS", "INFY.NS"),
    ("RELIANCE", "RELIANCE.NS"),
    ("HDFCBANK", "HDFCBANK.NS"),
    ("HDFC", "HDFCBANK.NS"),
    ("ITC", "ITC.NS"),
    ("SBIN", "SBIN.NS"),
    ("SBI", "SBIN.NS"),
    ("BHARTIARTL", "BHARTIARTL.NS"),
    ("AIRTEL", "BHARTIARTL.NS"),
    ("ICICIBANK", "ICICIBANK.NS"),
    ("ICICI", "ICICIBANK.NS"),
    ("LT", "LT.NS"),
    ("LARSEN", "LT.NS"),
    ("HCLTECH", "HCLTECH.NS"),
    ("HCL", "HCLTECH.NS"),
    ("WIPRO", "WIPRO.NS"),
    ("ONGC", "ONGC.NS"),
    ("NTPC", "NTPC.NS"),
    ("POWERGRID", "POWERGRID.NS"),
    ("COALINDIA", "COALINDIA.NS"),
    ("MARUTI", "MARUTI.NS"),
    ("BAJFINANCE", "BAJFINANCE.NS"),
    ("BAJAJ", "BAJFINANCE.NS"),
    ("SUNPHARMA", "SUNPHARMA.NS"),
    ("DRREDDY", "DRREDDY.NS"),
    ("NESTLEIND", "NESTLEIND.NS"),
    ("NESTLE", "NESTLEIND.NS"),
    ("HINDUNILVR", "HINDUNILVR.NS"),
    ("HUL", "HINDUNILVR.NS"),
    ("ULTRACEMCO", "ULTRACEMCO.NS"),
    ("ADANIPORTS", "ADANIPORTS.NS"),
    ("ADANI", "ADANIPORTS.NS"),
];

const SUGGESTIONS: [&str; 20] = [
    "TCS", "INFY", "RELIANCE", "HDFCBANK", "ITC", "SBIN", "BHARTIARTL", "ICICIBANK", "LT",
    "HCLTECH", "WIPRO", "ONGC", "NTPC", "MARUTI", "BAJFINANCE", "SUNPHARMA", "NESTLEIND",
    "HINDUNILVR", "ULTRACEMCO", "ADANIPORTS",
];

const POPULAR: [&str; 5] = ["TCS", "INFY", "RELIANCE", "HDFCBANK", "ICICIBANK"];

/// Extract a stock symbol from free-form chat input.
///
/// Accepts "INFY", "analyze INFY", "analyze stock: INFY", "stock: INFY",
/// "INFY stock", "INFY analysis" and exchange-qualified tickers such as
/// "RELIANCE.NS". Returns the upper-cased symbol, or `None` if nothing
/// plausible was found.
pub fn parse_symbol_input(input: &str) -> Option<String> {
    let cleaned = input.trim();
    if cleaned.is_empty() {
        return None;
    }

    if QUALIFIED_SYMBOL.is_match(cleaned) {
        return Some(cleaned.to_uppercase());
    }

    for pattern in INPUT_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(cleaned) {
            let symbol = caps[1].trim().to_uppercase();
            if symbol.len() >= 2 && symbol.chars().all(|c| c.is_ascii_alphabetic()) {
                return Some(symbol);
            }
        }
    }

    let compact: String = cleaned.chars().filter(|c| *c != ' ').collect();
    if !compact.is_empty()
        && compact.chars().all(char::is_alphabetic)
        && compact.chars().count() <= 10
    {
        return Some(compact.to_uppercase());
    }

    None
}

/// Convert a symbol to its Yahoo-style Indian market form.
///
/// Symbols already carrying `.NS`/`.BO` are kept; known names are mapped to
/// their NSE ticker; everything else defaults to NSE.
pub fn normalize_indian_symbol(symbol: &str) -> String {
    let symbol = symbol.trim().to_uppercase();

    if symbol.ends_with(NSE_SUFFIX) || symbol.ends_with(BSE_SUFFIX) {
        return symbol;
    }

    if let Some((_, mapped)) = KNOWN_SYMBOLS.iter().find(|(name, _)| *name == symbol) {
        return (*mapped).to_string();
    }

    format!("{}{}", symbol, NSE_SUFFIX)
}

/// The BSE listing to try when an NSE symbol returns no data.
pub fn bse_alternative(symbol: &str) -> Option<String> {
    symbol
        .strip_suffix(NSE_SUFFIX)
        .map(|base| format!("{}{}", base, BSE_SUFFIX))
}

/// Common Indian stocks offered as suggestions.
pub fn stock_suggestions() -> &'static [&'static str] {
    &SUGGESTIONS
}

/// Quick-access symbols shown as buttons on the dashboard.
pub fn popular_stocks() -> &'static [&'static str] {
    &POPULAR
}
