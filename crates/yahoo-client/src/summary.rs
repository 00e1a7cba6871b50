use serde_json::Value;

/// Lookup order for flattened field access, mirroring how the modules overlap.
const MODULE_PRIORITY: &[&str] = &[
    "financialData",
    "summaryDetail",
    "defaultKeyStatistics",
    "price",
    "majorHoldersBreakdown",
    "assetProfile",
];

/// One `quoteSummary` result with typed accessors.
///
/// Yahoo wraps most numbers as `{"raw": 1.5, "fmt": "1.50"}` and leaves
/// unavailable fields as `{}`; the accessors hide both shapes.
#[derive(Debug, Clone)]
pub struct QuoteSummary {
    result: Value,
}

impl QuoteSummary {
    /// Extract the first result from a raw `quoteSummary` response.
    pub fn from_response(json: &Value) -> Option<Self> {
        json.get("quoteSummary")
            .and_then(|v| v.get("result"))
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .map(|result| Self { result: result.clone() })
    }

    pub fn module(&self, name: &str) -> Option<&Value> {
        self.result.get(name)
    }

    /// First numeric value for `key` across the known modules.
    pub fn number(&self, key: &str) -> Option<f64> {
        MODULE_PRIORITY
            .iter()
            .filter_map(|m| self.module(m))
            .find_map(|m| m.get(key).and_then(raw_number))
    }

    /// First non-empty string for `key` across the known modules.
    pub fn text(&self, key: &str) -> Option<String> {
        MODULE_PRIORITY
            .iter()
            .filter_map(|m| self.module(m))
            .find_map(|m| m.get(key).and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Current price, falling back to the regular market price and the previous close.
    pub fn price(&self) -> Option<f64> {
        self.number("currentPrice")
            .or_else(|| self.number("regularMarketPrice"))
            .or_else(|| self.number("previousClose"))
    }

    pub fn has_price(&self) -> bool {
        self.price().is_some()
    }

    /// Statement rows stored under `module.list_key`, newest first.
    pub fn statements(&self, module: &str, list_key: &str) -> &[Value] {
        self.module(module)
            .and_then(|m| m.get(list_key))
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Company officers in the order Yahoo lists them.
    pub fn officers(&self) -> &[Value] {
        self.module("assetProfile")
            .and_then(|m| m.get("companyOfficers"))
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Read a number that may be plain or wrapped as `{"raw": ...}`.
pub fn raw_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => map.get("raw").and_then(|v| v.as_f64()),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Numeric field of a statement row.
pub fn row_number(row: &Value, key: &str) -> Option<f64> {
    row.get(key).and_then(raw_number)
}
