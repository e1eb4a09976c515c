//! Access Statistics Visualization Library
//!
//! Draws the AICP statistics dashboard: pie charts for access and visitor
//! types, bar charts for statuses and hours of day, and a seven-day trend
//! line. Charts are painted through the [`DrawingSurface`] trait so they can
//! be recorded for inspection or exported to SVG/PNG with plotters.
//!
//! # Architecture
//!
//! - `surface`: drawing context trait and a recording implementation
//! - `layouts`: margins, pie placement, column and point geometry
//! - `styles`: category colors, themes and visual styling
//! - `data`: series preparation and sample data
//! - `charts`: pie, bar and line renderers with the empty state
//! - `dashboard`: the five dashboard charts
//! - `export`: plotters-backed SVG/PNG export
//!
//! ```
//! use aicp::ChartDataset;
//! use aicp_visualization::{ChartCanvas, ChartRenderer, DrawOutcome, RecordingSurface};
//!
//! let dataset = ChartDataset::from_pairs([("visitor", 3), ("resident", 5)]);
//! let mut surface = RecordingSurface::new(600.0, 400.0);
//! let outcome = ChartRenderer::default()
//!     .draw_pie(&mut ChartCanvas::new(&mut surface), &dataset)
//!     .unwrap();
//! assert_eq!(outcome, DrawOutcome::Drawn);
//! ```

pub mod charts;
pub mod dashboard;
pub mod data;
pub mod errors;
pub mod export;
pub mod layouts;
pub mod styles;
pub mod surface;

// Re-export key types for convenience
pub use charts::{ChartCanvas, ChartRenderer, DateLabeler, DrawOutcome, EMPTY_MESSAGE};
pub use dashboard::ChartKind;
pub use data::{DailyPoint, SeriesPreprocessor};
pub use errors::{Result, VisualizationError};
pub use export::{export_dashboard, export_png, export_svg, ImageFormat, PlottersSurface};
pub use layouts::{Margins, PieLayout, PlotArea};
pub use styles::{ChartStyle, ColorScheme, Theme};
pub use surface::{DrawingSurface, RecordingSurface};

/// Version of the visualization library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default chart dimensions for export
pub const DEFAULT_WIDTH: u32 = 600;
pub const DEFAULT_HEIGHT: u32 = 400;
