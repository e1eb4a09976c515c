//! Static image export through plotters backends
//!
//! [`PlottersSurface`] adapts a plotters drawing area to
//! [`DrawingSurface`]; the export helpers render one chart (or the whole
//! dashboard) to SVG or PNG files.

use std::fs;
use std::path::{Path as FsPath, PathBuf};
use std::sync::OnceLock;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use aicp::AccessStats;

use crate::charts::{ChartCanvas, ChartRenderer, DrawOutcome};
use crate::dashboard::ChartKind;
use crate::errors::{Result, VisualizationError};
use crate::surface::{self, DrawingSurface, Point, Rect, TextAlign, TextBaseline};

/// Arc flattening step in radians
const ARC_STEP: f64 = 0.02;
const FONT_FAMILY: &str = "sans-serif";

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = VisualizationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            other => Err(VisualizationError::InvalidData {
                message: format!("unsupported image format '{}'", other),
            }),
        }
    }
}

/// [`DrawingSurface`] over a plotters drawing area
pub struct PlottersSurface<DB: DrawingBackend> {
    area: DrawingArea<DB, Shift>,
    background: RGBAColor,
}

impl<DB: DrawingBackend> PlottersSurface<DB>
where
    DB::ErrorType: 'static,
{
    pub fn new(area: DrawingArea<DB, Shift>, background: RGBAColor) -> Self {
        Self { area, background }
    }

    /// Flush pending drawing to the backend
    pub fn present(self) -> Result<()> {
        self.area.present()?;
        Ok(())
    }
}

fn pixel(point: Point) -> (i32, i32) {
    (point.x.round() as i32, point.y.round() as i32)
}

fn corners(area: Rect) -> [(i32, i32); 2] {
    [
        pixel(Point::new(area.x, area.y)),
        pixel(Point::new(area.right(), area.bottom())),
    ]
}

impl<DB: DrawingBackend> DrawingSurface for PlottersSurface<DB>
where
    DB::ErrorType: 'static,
{
    fn size(&self) -> (f64, f64) {
        let (width, height) = self.area.dim_in_pixel();
        (f64::from(width), f64::from(height))
    }

    fn clear(&mut self, area: Rect) -> Result<()> {
        self.area
            .draw(&Rectangle::new(corners(area), self.background.filled()))?;
        Ok(())
    }

    fn fill_rect(&mut self, area: Rect, color: RGBAColor) -> Result<()> {
        if area.width <= 0.0 || area.height <= 0.0 {
            return Ok(());
        }
        self.area
            .draw(&Rectangle::new(corners(area), color.filled()))?;
        Ok(())
    }

    fn fill_path(&mut self, path: &surface::Path, color: RGBAColor) -> Result<()> {
        let points: Vec<(i32, i32)> = path.flatten(ARC_STEP).into_iter().map(pixel).collect();
        if points.len() < 3 {
            return Ok(());
        }
        self.area.draw(&Polygon::new(points, color.filled()))?;
        Ok(())
    }

    fn stroke_path(&mut self, path: &surface::Path, color: RGBAColor, width: f64) -> Result<()> {
        let points: Vec<(i32, i32)> = path.flatten(ARC_STEP).into_iter().map(pixel).collect();
        if points.len() < 2 {
            return Ok(());
        }
        let stroke = color.stroke_width(width.round().max(1.0) as u32);
        self.area.draw(&PathElement::new(points, stroke))?;
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &surface::TextStyle) -> Result<()> {
        let h_pos = match style.align {
            TextAlign::Left => HPos::Left,
            TextAlign::Center => HPos::Center,
            TextAlign::Right => HPos::Right,
        };
        let v_pos = match style.baseline {
            TextBaseline::Top => VPos::Top,
            TextBaseline::Middle => VPos::Center,
            TextBaseline::Bottom => VPos::Bottom,
        };
        let text_style = (FONT_FAMILY, style.size)
            .into_font()
            .color(&style.color)
            .pos(Pos::new(h_pos, v_pos));
        self.area.draw_text(text, &text_style, pixel(at))?;
        Ok(())
    }
}

/// Render one chart to an SVG document in memory
pub fn render_svg(
    renderer: &ChartRenderer,
    kind: ChartKind,
    stats: &AccessStats,
    size: (u32, u32),
) -> Result<(String, DrawOutcome)> {
    let mut svg = String::new();
    let outcome = {
        let backend = SVGBackend::with_string(&mut svg, size);
        let mut surface = PlottersSurface::new(backend.into_drawing_area(), background(renderer));
        let outcome = renderer.draw_chart(kind, &mut ChartCanvas::new(&mut surface), stats)?;
        surface.present()?;
        outcome
    };
    Ok((svg, outcome))
}

/// Render one chart to an SVG file
pub fn export_svg(
    renderer: &ChartRenderer,
    kind: ChartKind,
    stats: &AccessStats,
    path: &FsPath,
    size: (u32, u32),
) -> Result<DrawOutcome> {
    let (svg, outcome) = render_svg(renderer, kind, stats, size)?;
    fs::write(path, svg)?;
    Ok(outcome)
}

/// Render one chart to a PNG file.
///
/// Text needs a registered font; see [`register_font_file`].
pub fn export_png(
    renderer: &ChartRenderer,
    kind: ChartKind,
    stats: &AccessStats,
    path: &FsPath,
    size: (u32, u32),
) -> Result<DrawOutcome> {
    let (width, height) = size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    let outcome = {
        let backend = BitMapBackend::with_buffer(&mut buffer, size);
        let mut surface = PlottersSurface::new(backend.into_drawing_area(), background(renderer));
        let outcome = renderer.draw_chart(kind, &mut ChartCanvas::new(&mut surface), stats)?;
        surface.present()?;
        outcome
    };

    let image = image::RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        VisualizationError::ImageError {
            message: format!("pixel buffer does not match {}x{}", width, height),
        }
    })?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(outcome)
}

/// Render every dashboard chart into `dir` as `<chart>.<ext>`
pub fn export_dashboard(
    renderer: &ChartRenderer,
    stats: &AccessStats,
    dir: &FsPath,
    format: ImageFormat,
    size: (u32, u32),
) -> Result<Vec<(PathBuf, DrawOutcome)>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(ChartKind::ALL.len());
    for kind in ChartKind::ALL {
        let path = dir.join(format!("{}.{}", kind.name(), format.extension()));
        let outcome = match format {
            ImageFormat::Svg => export_svg(renderer, kind, stats, &path, size)?,
            ImageFormat::Png => export_png(renderer, kind, stats, &path, size)?,
        };
        tracing::debug!(chart = %kind, path = %path.display(), ?outcome, "chart exported");
        written.push((path, outcome));
    }

    tracing::info!(charts = written.len(), dir = %dir.display(), "dashboard exported");
    Ok(written)
}

static REGISTERED_FONT: OnceLock<()> = OnceLock::new();

/// Register a TrueType font for bitmap text; only the first call has effect.
pub fn register_font_file(path: &FsPath) -> Result<()> {
    if REGISTERED_FONT.get().is_some() {
        return Ok(());
    }

    let bytes: &'static [u8] = Box::leak(fs::read(path)?.into_boxed_slice());
    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes).map_err(|_| {
        VisualizationError::FontError {
            message: format!("{} is not a usable font", path.display()),
        }
    })?;
    let _ = REGISTERED_FONT.set(());
    tracing::debug!(font = %path.display(), "font registered");
    Ok(())
}

fn background(renderer: &ChartRenderer) -> RGBAColor {
    crate::styles::opaque(renderer.style().colors.background)
}
