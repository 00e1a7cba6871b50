//! SVG charts drawn with plotters.
//!
//! The charts carry no text; titles, axes and legends live in the
//! surrounding HTML so no system fonts are needed at runtime.

use analysis_core::{Bar, Shareholding};
use anyhow::bail;
use plotters::prelude::*;

const PRICE_SIZE: (u32, u32) = (760, 280);
const HOLDING_SIZE: (u32, u32) = (420, 260);
const MIN_PRICE_POINTS: usize = 2;

const PRICE_LINE: RGBColor = RGBColor(42, 82, 152);
const GUIDE: RGBColor = RGBColor(222, 226, 230);

/// Bar colors, in [`Shareholding::rows`] order. Mirrored by `.swatch-N` in the stylesheet.
pub const HOLDING_PALETTE: [RGBColor; 5] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
];

fn chart_error<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!("chart rendering failed: {e}")
}

/// Closing-price line with guides at the period high and low.
pub fn price_chart_svg(history: &[Bar]) -> anyhow::Result<String> {
    let closes: Vec<f64> = history
        .iter()
        .map(|bar| bar.close)
        .filter(|c| c.is_finite() && *c > 0.0)
        .collect();
    if closes.len() < MIN_PRICE_POINTS {
        bail!("not enough price history");
    }

    let (low, high) = closes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(*c), hi.max(*c))
        });
    let pad = ((high - low) * 0.05).max(high * 0.005);
    let x_max = (closes.len() - 1) as f64;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PRICE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .build_cartesian_2d(0f64..x_max, (low - pad)..(high + pad))
            .map_err(chart_error)?;

        for level in [low, high] {
            chart
                .draw_series(LineSeries::new(
                    [(0.0, level), (x_max, level)],
                    GUIDE.stroke_width(1),
                ))
                .map_err(chart_error)?;
        }

        chart
            .draw_series(LineSeries::new(
                closes.iter().enumerate().map(|(i, c)| (i as f64, *c)),
                PRICE_LINE.stroke_width(2),
            ))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

/// One bar per holder category on a 0-100% scale. Unknown categories are left empty.
pub fn shareholding_chart_svg(holding: &Shareholding) -> anyhow::Result<String> {
    let rows = holding.rows();
    if rows.iter().all(|(_, value)| value.is_none()) {
        bail!("no shareholding data");
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, HOLDING_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .build_cartesian_2d(0f64..rows.len() as f64, 0f64..100f64)
            .map_err(chart_error)?;

        for level in [25.0, 50.0, 75.0] {
            chart
                .draw_series(LineSeries::new(
                    [(0.0, level), (rows.len() as f64, level)],
                    GUIDE.stroke_width(1),
                ))
                .map_err(chart_error)?;
        }

        chart
            .draw_series(rows.iter().enumerate().filter_map(|(i, (_, value))| {
                let value = value.filter(|v| v.is_finite())?.clamp(0.0, 100.0);
                let x = i as f64;
                Some(Rectangle::new(
                    [(x + 0.15, 0.0), (x + 0.85, value)],
                    HOLDING_PALETTE[i].filled(),
                ))
            }))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}
