//! Immediate-mode drawing surface the chart renderer paints onto
//!
//! Renderers only ever talk to [`DrawingSurface`]. The plotters-backed
//! implementation lives in [`crate::export`]; [`RecordingSurface`] keeps the
//! issued commands so drawings can be inspected without rasterizing.

use plotters::style::RGBAColor;

use crate::errors::Result;

/// Point in surface pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// One step of a [`Path`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Clockwise arc (y grows downward); connects from the current point
    /// to the arc start.
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Close,
}

/// Outline built from move/line/arc commands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, point: Point) -> Self {
        self.commands.push(PathCommand::MoveTo(point));
        self
    }

    pub fn line_to(mut self, point: Point) -> Self {
        self.commands.push(PathCommand::LineTo(point));
        self
    }

    pub fn arc(mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Pie wedge from `center` sweeping `start_angle..end_angle`
    pub fn wedge(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self::new()
            .move_to(center)
            .arc(center, radius, start_angle, end_angle)
            .close()
    }

    /// Full circle around `center`
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new()
            .arc(center, radius, 0.0, std::f64::consts::TAU)
            .close()
    }

    /// Open polyline through `points`
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = Self::new();
        for (i, point) in points.iter().enumerate() {
            path = if i == 0 {
                path.move_to(*point)
            } else {
                path.line_to(*point)
            };
        }
        path
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Flatten into polygon vertices, arcs sampled every `max_step` radians
    pub fn flatten(&self, max_step: f64) -> Vec<Point> {
        let mut points = Vec::new();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => points.push(p),
                PathCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    let sweep = end_angle - start_angle;
                    let steps = ((sweep.abs() / max_step.max(1e-3)).ceil() as usize).max(1);
                    for i in 0..=steps {
                        let angle = start_angle + sweep * i as f64 / steps as f64;
                        points.push(Point::new(
                            center.x + radius * angle.cos(),
                            center.y + radius * angle.sin(),
                        ));
                    }
                }
                PathCommand::Close => {}
            }
        }
        points
    }
}

/// Horizontal anchor of a text label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Vertical anchor of a text label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
}

/// Font and anchoring for [`DrawingSurface::fill_text`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: RGBAColor,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    pub fn new(size: f64, color: RGBAColor) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Left,
            baseline: TextBaseline::Middle,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn centered(self) -> Self {
        self.align(TextAlign::Center).baseline(TextBaseline::Middle)
    }
}

/// Imperative 2D drawing context
pub trait DrawingSurface {
    /// Surface size in pixels
    fn size(&self) -> (f64, f64);

    /// Reset `area` to the surface background
    fn clear(&mut self, area: Rect) -> Result<()>;

    fn fill_rect(&mut self, area: Rect, color: RGBAColor) -> Result<()>;

    fn fill_path(&mut self, path: &Path, color: RGBAColor) -> Result<()>;

    fn stroke_path(&mut self, path: &Path, color: RGBAColor, width: f64) -> Result<()>;

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<()>;
}

/// A command issued against a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    FillRect {
        area: Rect,
        color: RGBAColor,
    },
    FillPath {
        path: Path,
        color: RGBAColor,
    },
    StrokePath {
        path: Path,
        color: RGBAColor,
        width: f64,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// Surface that records every command instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear_log(&mut self) {
        self.commands.clear();
    }

    /// Every text label drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Filled rectangles, in order
    pub fn rects(&self) -> Vec<(Rect, RGBAColor)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRect { area, color } => Some((*area, *color)),
                _ => None,
            })
            .collect()
    }

    /// Filled paths, in order
    pub fn filled_paths(&self) -> Vec<(&Path, RGBAColor)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillPath { path, color } => Some((path, *color)),
                _ => None,
            })
            .collect()
    }

    /// Stroked paths, in order
    pub fn stroked_paths(&self) -> Vec<&Path> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::StrokePath { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self, area: Rect) -> Result<()> {
        self.commands.push(DrawCommand::Clear(area));
        Ok(())
    }

    fn fill_rect(&mut self, area: Rect, color: RGBAColor) -> Result<()> {
        self.commands.push(DrawCommand::FillRect { area, color });
        Ok(())
    }

    fn fill_path(&mut self, path: &Path, color: RGBAColor) -> Result<()> {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            color,
        });
        Ok(())
    }

    fn stroke_path(&mut self, path: &Path, color: RGBAColor, width: f64) -> Result<()> {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            color,
            width,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> Result<()> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            style: *style,
        });
        Ok(())
    }
}
