//! Price-history statistics used for the performance row of the dashboard.

use chrono::{DateTime, Duration, Utc};

use crate::{Bar, PriceMetrics};

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample standard deviation.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}

/// Simple day-over-day returns. Pairs with a zero previous close are skipped.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Percent change from the first to the last close.
pub fn period_change_percent(closes: &[f64]) -> Option<f64> {
    let first = *closes.first()?;
    let last = *closes.last()?;
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

/// Derive one-year performance, volatility and average volume.
///
/// Only bars within 365 days of `as_of` are considered; an empty window
/// yields all-`None` metrics.
pub fn price_metrics(bars: &[Bar], as_of: DateTime<Utc>) -> PriceMetrics {
    let cutoff = as_of - Duration::days(365);
    let window: Vec<&Bar> = bars.iter().filter(|b| b.timestamp >= cutoff).collect();

    if window.is_empty() {
        return PriceMetrics::default();
    }

    let closes: Vec<f64> = window.iter().map(|b| b.close).collect();
    let returns = daily_returns(&closes);
    let volumes: Vec<f64> = window.iter().map(|b| b.volume).collect();

    PriceMetrics {
        year_performance: period_change_percent(&closes),
        volatility: if returns.len() >= 2 { Some(std_dev(&returns) * 100.0) } else { None },
        avg_volume: Some(mean(&volumes)),
    }
}
