//! Pie chart: one wedge per category, clockwise from 12 o'clock

use std::f64::consts::{FRAC_PI_2, TAU};

use plotters::style::{RGBColor, WHITE};

use aicp::ChartDataset;

use super::{ChartCanvas, ChartRenderer, DrawOutcome};
use crate::errors::Result;
use crate::layouts::PieLayout;
use crate::styles::{category_color, opaque};
use crate::surface::{DrawingSurface, Path, TextBaseline, TextStyle};

/// Percentage labels sit at this fraction of the radius
const LABEL_RADIUS_FRACTION: f64 = 0.7;

/// Angular extent of one category
#[derive(Debug, Clone, PartialEq)]
pub struct PieWedge {
    pub label: String,
    pub value: u64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: RGBColor,
}

impl PieWedge {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep() / 2.0
    }

    /// Share of the full circle, rounded to a whole percent
    pub fn percentage(&self) -> u64 {
        (self.sweep() / TAU * 100.0).round() as u64
    }
}

/// Wedges in dataset order starting at -pi/2; empty when the total is 0.
///
/// Sweeps are proportional to the counts and together cover the full
/// circle.
pub fn pie_wedges(dataset: &ChartDataset) -> Vec<PieWedge> {
    // f64 sum; the saturating `ChartDataset::total` undercounts near u64::MAX
    let total: f64 = dataset.iter().map(|(_, value)| value as f64).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = -FRAC_PI_2;
    dataset
        .iter()
        .map(|(label, value)| {
            let sweep = value as f64 / total * TAU;
            let wedge = PieWedge {
                label: label.to_string(),
                value,
                start_angle: angle,
                end_angle: angle + sweep,
                color: category_color(label),
            };
            angle += sweep;
            wedge
        })
        .collect()
}

impl ChartRenderer {
    /// Proportional pie with percentage labels and a top-left legend
    pub fn draw_pie(
        &self,
        canvas: &mut ChartCanvas<'_>,
        dataset: &ChartDataset,
    ) -> Result<DrawOutcome> {
        self.render(canvas, dataset.has_data(), |surface, width, height| {
            let layout = PieLayout::new(width, height);
            let label_style = TextStyle::new(self.style().font_size, opaque(WHITE)).centered();

            for wedge in pie_wedges(dataset) {
                if wedge.value == 0 {
                    continue;
                }
                let outline = Path::wedge(
                    layout.center,
                    layout.radius,
                    wedge.start_angle,
                    wedge.end_angle,
                );
                surface.fill_path(&outline, opaque(wedge.color))?;

                let anchor = layout.polar(wedge.mid_angle(), LABEL_RADIUS_FRACTION);
                surface.fill_text(&format!("{}%", wedge.percentage()), anchor, &label_style)?;
            }

            self.draw_legend(surface, dataset)
        })
    }

    fn draw_legend(&self, surface: &mut dyn DrawingSurface, dataset: &ChartDataset) -> Result<()> {
        let legend = self.legend();
        let text_style = TextStyle::new(self.style().legend_font_size, self.style().text_color())
            .baseline(TextBaseline::Middle);

        for (row, (label, value)) in dataset.iter().enumerate() {
            surface.fill_rect(legend.swatch(row), opaque(category_color(label)))?;
            surface.fill_text(
                &format!("{}: {}", label, value),
                legend.label_anchor(row),
                &text_style,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wedges_cover_circle_in_order() {
        let dataset = ChartDataset::from_pairs([("visitor", 3), ("resident", 5), ("provider", 2)]);
        let wedges = pie_wedges(&dataset);

        assert_eq!(wedges.len(), 3);
        assert!((wedges[0].start_angle + FRAC_PI_2).abs() < 1e-12);
        assert!((wedges[0].sweep() - 0.3 * TAU).abs() < 1e-12);
        assert!((wedges[1].sweep() - 0.5 * TAU).abs() < 1e-12);
        assert!((wedges[2].sweep() - 0.2 * TAU).abs() < 1e-12);
        assert!((wedges[2].end_angle - (TAU - FRAC_PI_2)).abs() < 1e-9);
        for pair in wedges.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
    }

    #[test]
    fn test_percentages() {
        let dataset = ChartDataset::from_pairs([("a", 1), ("b", 2)]);
        let wedges = pie_wedges(&dataset);
        assert_eq!(wedges[0].percentage(), 33);
        assert_eq!(wedges[1].percentage(), 67);
    }

    #[test]
    fn test_huge_counts_keep_proportions() {
        let dataset = ChartDataset::from_pairs([("visitor", u64::MAX), ("resident", u64::MAX)]);
        let wedges = pie_wedges(&dataset);

        assert_eq!(wedges.len(), 2);
        assert!((wedges[0].sweep() - TAU / 2.0).abs() < 1e-9);
        assert!((wedges[1].end_angle - (TAU - FRAC_PI_2)).abs() < 1e-9);
        assert_eq!(wedges[0].percentage(), 50);
    }

    #[test]
    fn test_zero_total_has_no_wedges() {
        assert!(pie_wedges(&ChartDataset::from_pairs([("a", 0)])).is_empty());
        assert!(pie_wedges(&ChartDataset::new()).is_empty());
    }

    #[test]
    fn test_unmapped_label_is_grey() {
        let wedges = pie_wedges(&ChartDataset::from_pairs([("martian", 1)]));
        assert_eq!(wedges[0].color, crate::styles::FALLBACK_COLOR);
    }
}
