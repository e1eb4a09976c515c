//! Vertical bar charts: status breakdown and hourly activity

use aicp::ChartDataset;

use super::{ChartCanvas, ChartRenderer, DrawOutcome};
use crate::errors::Result;
use crate::layouts::{ColumnLayout, Margins, PlotArea};
use crate::styles::{category_color, opaque};
use crate::surface::{DrawingSurface, Path, Point, Rect, TextAlign, TextBaseline, TextStyle};

/// Gap between a bar top and its value label
const VALUE_LABEL_GAP: f64 = 5.0;
/// Gap between the baseline and a category label
const CATEGORY_LABEL_GAP: f64 = 5.0;
/// Every n-th hour gets an axis label
const HOUR_LABEL_STEP: usize = 3;

/// Bar rectangles for `values`, scaled against the largest (at least 1)
pub fn bar_rects(values: &[u64], plot: PlotArea, bar_width_ratio: f64) -> Vec<Rect> {
    let max = values.iter().copied().max().unwrap_or(0).max(1);
    let columns = ColumnLayout::new(plot, values.len(), bar_width_ratio);
    values
        .iter()
        .enumerate()
        .map(|(index, value)| columns.bar(index, *value, max))
        .collect()
}

/// Axis label for an hour slot, only on every third hour
pub fn hourly_label(hour: usize) -> Option<String> {
    (hour % HOUR_LABEL_STEP == 0).then(|| format!("{}h", hour))
}

impl ChartRenderer {
    /// One bar per category in dataset order, colored per category
    pub fn draw_bar(
        &self,
        canvas: &mut ChartCanvas<'_>,
        dataset: &ChartDataset,
    ) -> Result<DrawOutcome> {
        self.render(canvas, dataset.has_data(), |surface, width, height| {
            let plot = PlotArea::new(width, height, Margins::standard());
            let values: Vec<u64> = dataset.iter().map(|(_, value)| value).collect();
            let rects = bar_rects(&values, plot, self.style().bar_width_ratio);

            for ((label, value), rect) in dataset.iter().zip(&rects) {
                surface.fill_rect(*rect, opaque(category_color(label)))?;
                self.value_label(surface, *rect, value)?;
                self.category_label(surface, plot, *rect, label)?;
            }

            self.draw_baseline(surface, plot)
        })
    }

    /// Twenty-four bars for hours 0..23 in a single series color
    pub fn draw_hourly_bar(
        &self,
        canvas: &mut ChartCanvas<'_>,
        by_hour: &ChartDataset,
    ) -> Result<DrawOutcome> {
        let counts = self.series().hourly_counts(by_hour);
        let has_data = counts.iter().any(|count| *count > 0);

        self.render(canvas, has_data, |surface, width, height| {
            let plot = PlotArea::new(width, height, Margins::hourly());
            let rects = bar_rects(&counts, plot, self.style().bar_width_ratio);
            let color = self.style().accent_color();

            for (hour, (count, rect)) in counts.iter().zip(&rects).enumerate() {
                surface.fill_rect(*rect, color)?;
                if *count > 0 {
                    self.value_label(surface, *rect, *count)?;
                }
                if let Some(label) = hourly_label(hour) {
                    self.category_label(surface, plot, *rect, &label)?;
                }
            }
            self.draw_baseline(surface, plot)
        })
    }

    fn value_label(&self, surface: &mut dyn DrawingSurface, rect: Rect, value: u64) -> Result<()> {
        let style = TextStyle::new(self.style().font_size, self.style().text_color())
            .align(TextAlign::Center)
            .baseline(TextBaseline::Bottom);
        let anchor = Point::new(rect.x + rect.width / 2.0, rect.y - VALUE_LABEL_GAP);
        surface.fill_text(&value.to_string(), anchor, &style)
    }

    fn category_label(
        &self,
        surface: &mut dyn DrawingSurface,
        plot: PlotArea,
        rect: Rect,
        label: &str,
    ) -> Result<()> {
        let style = TextStyle::new(self.style().font_size, self.style().text_color())
            .align(TextAlign::Center)
            .baseline(TextBaseline::Top);
        let anchor = Point::new(rect.x + rect.width / 2.0, plot.baseline() + CATEGORY_LABEL_GAP);
        surface.fill_text(label, anchor, &style)
    }

    pub(super) fn draw_baseline(&self, surface: &mut dyn DrawingSurface, plot: PlotArea) -> Result<()> {
        let axis = Path::polyline(&[
            Point::new(plot.left, plot.baseline()),
            Point::new(plot.right(), plot.baseline()),
        ]);
        surface.stroke_path(&axis, self.style().axis_color(), 1.0)
    }
}
