//! Lenient line-oriented parsing of LLM responses into an [`InsightReport`].
//!
//! Each line is classified as a section header, a bullet or prose by prefix
//! and keyword matching. Nothing here fails: missing sections fall back to
//! canned text.

use analysis_core::{InsightReport, Recommendation};

pub const MAX_INSIGHTS: usize = 5;
pub const MAX_RISKS: usize = 3;

const PENDING_INSIGHT: &str = "Analysis pending - please check back for detailed insights";
const PENDING_SUMMARY: &str =
    "Investment analysis is being processed. Please try again for detailed recommendations.";
const COMPLETED_INSIGHT: &str = "Analysis completed successfully";
const DEFAULT_RISK: &str = "Market volatility risk";

const MIN_INSIGHTS_BEFORE_SENTENCES: usize = 3;
const SENTENCE_MIN_CHARS: usize = 50;
const SENTENCE_MAX_CHARS: usize = 200;

/// Source tag used before the analyzer names the provider.
const UNTAGGED: &str = "llm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Insights,
    Summary,
    Recommendation,
    Risks,
}

const BULLET_MARKERS: [char; 3] = ['•', '-', '*'];

/// Text after the leading bullet markers (`•`, `-`, `*`), or `None` for non-bullets.
/// A bold-led line such as `**Valuation:** cheap` is a bullet too.
fn symbol_bullet(line: &str) -> Option<&str> {
    if !line.starts_with(BULLET_MARKERS) {
        return None;
    }
    Some(
        line.trim_start_matches(|c: char| BULLET_MARKERS.contains(&c) || c.is_whitespace())
            .trim(),
    )
}

/// Wholly bold line or bold label ending in a colon, e.g. `**Key Insights:**`.
fn is_bold_heading(line: &str) -> bool {
    line.starts_with("**") && (line.ends_with("**") || strip_markup(line).ends_with(':'))
}

/// Text after a `1.` or `1)` numeral.
fn numbered_bullet(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .filter(|r| r.starts_with(char::is_whitespace))
        .map(str::trim)
}

fn strip_markup(text: &str) -> String {
    text.replace("**", "").trim().to_string()
}

/// Parse a response to the `INSIGHTS:` / `INVESTMENT_SUMMARY:` prompt.
pub fn parse_structured(text: &str) -> InsightReport {
    let mut section = Section::None;
    let mut insights: Vec<String> = Vec::new();
    let mut summary = String::new();

    for line in text.lines().map(str::trim) {
        let upper = line.to_ascii_uppercase();

        if upper.contains("INSIGHTS:") {
            section = Section::Insights;
            continue;
        }
        if let Some(pos) = upper.find("INVESTMENT_SUMMARY:") {
            section = Section::Summary;
            // Same-line text after the header belongs to the summary
            let rest = line
                .get(pos + "INVESTMENT_SUMMARY:".len()..)
                .map(str::trim)
                .unwrap_or_default();
            if !rest.is_empty() {
                summary.push_str(rest);
                summary.push(' ');
            }
            continue;
        }

        if let Some(item) = symbol_bullet(line).or_else(|| numbered_bullet(line)) {
            if section == Section::Insights && !item.is_empty() {
                insights.push(strip_markup(item));
            }
            continue;
        }

        if section == Section::Summary && !line.is_empty() {
            summary.push_str(line);
            summary.push(' ');
        }
    }

    insights.truncate(MAX_INSIGHTS);
    if insights.is_empty() {
        insights.push(PENDING_INSIGHT.to_string());
    }

    let summary = summary.trim();
    let investment_summary = if summary.is_empty() {
        PENDING_SUMMARY.to_string()
    } else {
        summary.to_string()
    };

    InsightReport {
        insights,
        investment_summary,
        recommendation: None,
        risks: Vec::new(),
        source: UNTAGGED.to_string(),
    }
}

fn narrative_section(lower: &str) -> Option<Section> {
    if lower.contains("insight") || lower.contains("key point") {
        Some(Section::Insights)
    } else if lower.contains("recommendation") || lower.contains("invest") {
        Some(Section::Recommendation)
    } else if lower.contains("risk") || lower.contains("concern") {
        Some(Section::Risks)
    } else {
        None
    }
}

/// Buy/Sell/Hold call in a line, matched on whole words. Later lines override earlier ones.
fn recommendation_in(lower: &str) -> Option<Recommendation> {
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    if words.contains(&"buy") {
        Some(Recommendation::Buy)
    } else if words.contains(&"sell") {
        Some(Recommendation::Sell)
    } else if words.contains(&"hold") {
        Some(Recommendation::Hold)
    } else {
        None
    }
}

/// Sentences of moderate length, used when the response has too few bullets.
fn key_sentences(text: &str) -> Vec<String> {
    text.split(". ")
        .map(str::trim)
        .filter(|s| {
            let len = s.chars().count();
            len > SENTENCE_MIN_CHARS && len < SENTENCE_MAX_CHARS
        })
        .map(strip_markup)
        .take(MAX_INSIGHTS)
        .collect()
}

/// Parse a free-form analyst write-up.
pub fn parse_narrative(text: &str) -> InsightReport {
    let mut section = Section::None;
    let mut insights: Vec<String> = Vec::new();
    let mut risks: Vec<String> = Vec::new();
    let mut recommendation = None;
    let mut summary: Vec<String> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();

        let bullet = if is_bold_heading(line) && narrative_section(&lower).is_some() {
            None
        } else {
            symbol_bullet(line)
        };

        if let Some(item) = bullet {
            let item = strip_markup(item);
            if item.is_empty() {
                continue;
            }
            match section {
                Section::Insights if insights.len() < MAX_INSIGHTS => insights.push(item),
                Section::Risks if risks.len() < MAX_RISKS => risks.push(item),
                Section::Recommendation => {
                    if let Some(call) = recommendation_in(&lower) {
                        recommendation = Some(call);
                    }
                    summary.push(item);
                }
                _ => {}
            }
            continue;
        }

        if let Some(next) = narrative_section(&lower) {
            section = next;
            if section == Section::Recommendation {
                if let Some(call) = recommendation_in(&lower) {
                    recommendation = Some(call);
                }
            }
            continue;
        }

        if section == Section::Recommendation {
            if let Some(call) = recommendation_in(&lower) {
                recommendation = Some(call);
            }
            summary.push(strip_markup(line));
        }
    }

    if insights.len() < MIN_INSIGHTS_BEFORE_SENTENCES {
        insights = key_sentences(text);
    }
    if insights.is_empty() {
        insights.push(COMPLETED_INSIGHT.to_string());
    }
    if risks.is_empty() {
        risks.push(DEFAULT_RISK.to_string());
    }

    let summary = summary.join(" ");
    let investment_summary = if summary.trim().is_empty() {
        strip_markup(text)
    } else {
        summary.trim().to_string()
    };

    InsightReport {
        insights,
        investment_summary,
        recommendation: Some(recommendation.unwrap_or(Recommendation::Hold)),
        risks,
        source: UNTAGGED.to_string(),
    }
}
