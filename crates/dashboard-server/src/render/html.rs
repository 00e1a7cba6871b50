//! Small HTML building blocks. Every helper escapes the text it is given.

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Full document around an already rendered body.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
<main class="container">
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

/// Metric card with an optional caption line under the value.
pub fn metric(label: &str, value: &str, caption: Option<&str>) -> String {
    let caption = caption
        .map(|c| format!(r#"<div class="metric-caption">{}</div>"#, escape(c)))
        .unwrap_or_default();
    format!(
        r#"<div class="metric-card"><div class="metric-label">{}</div><div class="metric-value">{}</div>{}</div>"#,
        escape(label),
        escape(value),
        caption
    )
}

/// Row of metric cards.
pub fn metric_row(cards: &[String]) -> String {
    format!(r#"<div class="metric-row">{}</div>"#, cards.concat())
}

pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape(h)))
        .collect();
    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!("<td>{}</td>", escape(cell)))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();
    format!(r#"<table class="data-table"><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>"#)
}

pub fn warning(text: &str) -> String {
    format!(r#"<p class="notice notice-warning">{}</p>"#, escape(text))
}

pub fn info(text: &str) -> String {
    format!(r#"<p class="notice notice-info">{}</p>"#, escape(text))
}

/// `**Label:** value` style definition list.
pub fn facts(items: &[(&str, String)]) -> String {
    let rows: String = items
        .iter()
        .map(|(label, value)| {
            format!(
                "<li><strong>{}:</strong> {}</li>",
                escape(label),
                escape(value)
            )
        })
        .collect();
    format!(r#"<ul class="facts">{rows}</ul>"#)
}
