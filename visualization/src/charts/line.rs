//! Weekly trend: daily totals joined by a line with point markers

use aicp::ChartDataset;

use super::{ChartCanvas, ChartRenderer, DrawOutcome};
use crate::errors::Result;
use crate::layouts::{Margins, PlotArea, PointLayout};
use crate::surface::{Path, Point, TextAlign, TextBaseline, TextStyle};

const DATE_LABEL_GAP: f64 = 8.0;
const VALUE_LABEL_GAP: f64 = 4.0;

/// Point positions for `values`, scaled against the largest (at least 1)
pub fn line_points(values: &[u64], plot: PlotArea) -> Vec<Point> {
    let max = values.iter().copied().max().unwrap_or(0).max(1);
    let layout = PointLayout::new(plot, values.len());
    values
        .iter()
        .enumerate()
        .map(|(index, value)| layout.point(index, *value, max))
        .collect()
}

impl ChartRenderer {
    /// Line over the most recent days of `by_date` (keys `YYYY-MM-DD`)
    pub fn draw_line(
        &self,
        canvas: &mut ChartCanvas<'_>,
        by_date: &ChartDataset,
    ) -> Result<DrawOutcome> {
        let days = self.series().daily_series(by_date);
        let has_data = days.iter().any(|day| day.count > 0);

        self.render(canvas, has_data, |surface, width, height| {
            let plot = PlotArea::new(width, height, Margins::standard());
            let counts: Vec<u64> = days.iter().map(|day| day.count).collect();
            let points = line_points(&counts, plot);
            let color = self.style().accent_color();

            self.draw_baseline(surface, plot)?;
            if points.len() > 1 {
                surface.stroke_path(&Path::polyline(&points), color, self.style().line_width)?;
            }

            let label_style = TextStyle::new(self.style().font_size, self.style().text_color())
                .align(TextAlign::Center)
                .baseline(TextBaseline::Top);
            let value_style = label_style.baseline(TextBaseline::Bottom);
            let value_offset = self.style().marker_radius + VALUE_LABEL_GAP;

            for (day, point) in days.iter().zip(&points) {
                surface.fill_path(&Path::circle(*point, self.style().marker_radius), color)?;
                surface.fill_text(
                    &day.count.to_string(),
                    Point::new(point.x, point.y - value_offset),
                    &value_style,
                )?;
                surface.fill_text(
                    &self.date_label(day.date),
                    Point::new(point.x, plot.baseline() + DATE_LABEL_GAP),
                    &label_style,
                )?;
            }
            Ok(())
        })
    }
}
