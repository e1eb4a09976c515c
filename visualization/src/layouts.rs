//! Chart layout geometry: margins, pie placement, columns and points

use serde::{Deserialize, Serialize};

use crate::surface::{Point, Rect};

/// Margin configuration for chart layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Status bar chart and daily line chart
    pub const fn standard() -> Self {
        Self::new(50.0, 50.0, 40.0, 40.0)
    }

    /// Hourly bar chart: more headroom, tighter hour labels
    pub const fn hourly() -> Self {
        Self::new(50.0, 50.0, 50.0, 30.0)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::standard()
    }
}

/// Legend block anchored to the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendLayout {
    pub x: f64,
    pub first_row_y: f64,
    pub row_height: f64,
    pub swatch_size: f64,
}

impl Default for LegendLayout {
    fn default() -> Self {
        Self {
            x: 20.0,
            first_row_y: 20.0,
            row_height: 25.0,
            swatch_size: 15.0,
        }
    }
}

impl LegendLayout {
    pub fn swatch(&self, row: usize) -> Rect {
        Rect::new(
            self.x,
            self.row_y(row),
            self.swatch_size,
            self.swatch_size,
        )
    }

    /// Label anchor, vertically centred on the swatch
    pub fn label_anchor(&self, row: usize) -> Point {
        Point::new(
            self.x + self.swatch_size + 5.0,
            self.row_y(row) + self.swatch_size / 2.0,
        )
    }

    fn row_y(&self, row: usize) -> f64 {
        self.first_row_y + row as f64 * self.row_height
    }
}

/// Center and radius of a pie chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieLayout {
    pub center: Point,
    pub radius: f64,
}

impl PieLayout {
    /// Centred pie with radius a third of the shorter side
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            center: Point::new(width / 2.0, height / 2.0),
            radius: width.min(height) / 3.0,
        }
    }

    /// Point at `fraction` of the radius along `angle`
    pub fn polar(&self, angle: f64, fraction: f64) -> Point {
        let distance = self.radius * fraction;
        Point::new(
            self.center.x + distance * angle.cos(),
            self.center.y + distance * angle.sin(),
        )
    }
}

/// Plot rectangle inside the margins, shared by bar and line charts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Plot area of a `width` x `height` surface; never negative
    pub fn new(width: f64, height: f64, margins: Margins) -> Self {
        Self {
            left: margins.left,
            top: margins.top,
            width: (width - margins.left - margins.right).max(0.0),
            height: (height - margins.top - margins.bottom).max(0.0),
        }
    }

    /// y of the zero line
    pub fn baseline(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Pixel height of `value` scaled against `max`; 0 when `max` is 0
    pub fn scaled_height(&self, value: u64, max: u64) -> f64 {
        if max == 0 {
            return 0.0;
        }
        value as f64 / max as f64 * self.height
    }
}

/// Evenly split columns, one per category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub plot: PlotArea,
    pub count: usize,
    pub bar_width_ratio: f64,
}

impl ColumnLayout {
    pub fn new(plot: PlotArea, count: usize, bar_width_ratio: f64) -> Self {
        Self {
            plot,
            count,
            bar_width_ratio: bar_width_ratio.clamp(0.1, 1.0),
        }
    }

    pub fn column_width(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.plot.width / self.count as f64
        }
    }

    pub fn bar_width(&self) -> f64 {
        self.column_width() * self.bar_width_ratio
    }

    /// Horizontal centre of column `index`
    pub fn column_center(&self, index: usize) -> f64 {
        self.plot.left + self.column_width() * (index as f64 + 0.5)
    }

    /// Bar rectangle for `value`, rising from the baseline
    pub fn bar(&self, index: usize, value: u64, max: u64) -> Rect {
        let height = self.plot.scaled_height(value, max);
        let width = self.bar_width();
        Rect::new(
            self.column_center(index) - width / 2.0,
            self.plot.baseline() - height,
            width,
            height,
        )
    }
}

/// Point placement for a line chart over `count` samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLayout {
    pub plot: PlotArea,
    pub count: usize,
}

impl PointLayout {
    pub fn new(plot: PlotArea, count: usize) -> Self {
        Self { plot, count }
    }

    /// x of sample `index`; a lone sample sits in the middle
    pub fn x(&self, index: usize) -> f64 {
        if self.count <= 1 {
            return self.plot.left + self.plot.width / 2.0;
        }
        let step = self.plot.width / (self.count - 1) as f64;
        self.plot.left + step * index as f64
    }

    pub fn point(&self, index: usize, value: u64, max: u64) -> Point {
        Point::new(
            self.x(index),
            self.plot.baseline() - self.plot.scaled_height(value, max),
        )
    }
}
