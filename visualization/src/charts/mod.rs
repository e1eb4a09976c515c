//! Chart renderers for the access statistics dashboard
//!
//! Each `draw_*` call paints one chart onto a [`ChartCanvas`] and reports
//! what it did:
//!
//! - [`DrawOutcome::Skipped`] when the canvas has no drawing context
//! - [`DrawOutcome::EmptyState`] when the dataset is empty or all zero
//! - [`DrawOutcome::Drawn`] otherwise
//!
//! Renderers are stateless apart from styling; the same renderer can draw
//! any number of charts.

mod bar;
mod line;
mod pie;

pub use bar::{bar_rects, hourly_label};
pub use line::line_points;
pub use pie::{pie_wedges, PieWedge};

use chrono::NaiveDate;

use crate::data::SeriesPreprocessor;
use crate::errors::Result;
use crate::layouts::LegendLayout;
use crate::styles::ChartStyle;
use crate::surface::{DrawingSurface, Point, Rect, TextStyle};

/// Message shown when a chart has nothing to plot
pub const EMPTY_MESSAGE: &str = "No hay datos disponibles";

/// What a draw call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn,
    EmptyState,
    /// No drawing context was available
    Skipped,
}

/// Surface size plus an optional drawing context
pub struct ChartCanvas<'s> {
    context: Option<&'s mut (dyn DrawingSurface + 's)>,
    width: f64,
    height: f64,
}

impl<'s> ChartCanvas<'s> {
    /// Canvas backed by `surface`, sized from it
    pub fn new<S: DrawingSurface + 's>(surface: &'s mut S) -> Self {
        let (width, height) = surface.size();
        Self {
            context: Some(surface as &'s mut (dyn DrawingSurface + 's)),
            width,
            height,
        }
    }

    /// Canvas whose context never became available
    pub fn detached(width: f64, height: f64) -> Self {
        Self {
            context: None,
            width,
            height,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn is_attached(&self) -> bool {
        self.context.is_some()
    }

    fn context(&mut self) -> Option<&mut (dyn DrawingSurface + 's)> {
        self.context.as_deref_mut()
    }
}

/// Axis label for a date on the weekly trend
pub trait DateLabeler {
    fn label(&self, date: NaiveDate) -> String;
}

/// `"7 sept"` style labels
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanishShortDate;

impl DateLabeler for SpanishShortDate {
    fn label(&self, date: NaiveDate) -> String {
        aicp::format::short_day_month(date)
    }
}

/// Draws pie, bar and line charts onto a [`ChartCanvas`]
pub struct ChartRenderer {
    style: ChartStyle,
    legend: LegendLayout,
    series: SeriesPreprocessor,
    dates: Box<dyn DateLabeler + Send + Sync>,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(ChartStyle::default())
    }
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self {
            style,
            legend: LegendLayout::default(),
            series: SeriesPreprocessor::default(),
            dates: Box::new(SpanishShortDate),
        }
    }

    pub fn with_date_labeler(mut self, labeler: impl DateLabeler + Send + Sync + 'static) -> Self {
        self.dates = Box::new(labeler);
        self
    }

    pub fn with_series(mut self, series: SeriesPreprocessor) -> Self {
        self.series = series;
        self
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn series(&self) -> &SeriesPreprocessor {
        &self.series
    }

    /// Clear the whole canvas and centre the "no data" message
    pub fn draw_empty_state(&self, canvas: &mut ChartCanvas<'_>) -> Result<DrawOutcome> {
        self.render(canvas, false, |_, _, _| Ok(()))
    }

    /// Shared draw protocol: skip without a context, fall back to the
    /// empty state without data, otherwise clear and run `paint`.
    fn render<F>(&self, canvas: &mut ChartCanvas<'_>, has_data: bool, paint: F) -> Result<DrawOutcome>
    where
        F: FnOnce(&mut dyn DrawingSurface, f64, f64) -> Result<()>,
    {
        let (width, height) = (canvas.width(), canvas.height());
        let Some(surface) = canvas.context() else {
            return Ok(DrawOutcome::Skipped);
        };

        if !has_data {
            self.paint_empty_state(surface, width, height)?;
            return Ok(DrawOutcome::EmptyState);
        }

        surface.clear(Rect::new(0.0, 0.0, width, height))?;
        paint(surface, width, height)?;
        Ok(DrawOutcome::Drawn)
    }

    fn paint_empty_state(
        &self,
        surface: &mut dyn DrawingSurface,
        width: f64,
        height: f64,
    ) -> Result<()> {
        surface.clear(Rect::new(0.0, 0.0, width, height))?;
        let style = TextStyle::new(self.style.empty_font_size, self.style.empty_text_color()).centered();
        surface.fill_text(EMPTY_MESSAGE, Point::new(width / 2.0, height / 2.0), &style)
    }

    fn legend(&self) -> &LegendLayout {
        &self.legend
    }

    fn date_label(&self, date: NaiveDate) -> String {
        self.dates.label(date)
    }
}
