//! Server-side HTML and SVG rendering for the dashboard.

pub mod charts;
pub mod dashboard;
pub mod html;

pub use dashboard::render_dashboard;
