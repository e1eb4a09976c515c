//! Color schemes and visual styling for access charts

use std::str::FromStr;

use plotters::style::{RGBAColor, RGBColor};

use crate::errors::VisualizationError;

/// Fallback for categories without an assigned color
pub const FALLBACK_COLOR: RGBColor = RGBColor(158, 158, 158); // Grey

/// Fixed category-to-color table shared by every theme
const CATEGORY_COLORS: &[(&str, RGBColor)] = &[
    ("visitor", RGBColor(76, 175, 80)),    // Green
    ("resident", RGBColor(33, 150, 243)),  // Blue
    ("provider", RGBColor(255, 152, 0)),   // Orange
    ("frequent", RGBColor(156, 39, 176)),  // Purple
    ("one-time", RGBColor(0, 188, 212)),   // Cyan
    ("event", RGBColor(233, 30, 99)),      // Pink
    ("active", RGBColor(76, 175, 80)),     // Green
    ("dentro", RGBColor(33, 150, 243)),    // Blue
    ("salio", RGBColor(121, 85, 72)),      // Brown
    ("pending", RGBColor(255, 193, 7)),    // Amber
    ("inactive", RGBColor(244, 67, 54)),   // Red
    ("expired", RGBColor(96, 125, 139)),   // Blue Grey
];

/// Color for a category label, grey when the label is unmapped
pub fn category_color(label: &str) -> RGBColor {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Attach an alpha channel to an opaque color
pub fn with_alpha(color: RGBColor, alpha: f64) -> RGBAColor {
    RGBAColor(color.0, color.1, color.2, alpha.clamp(0.0, 1.0))
}

/// Opaque variant of a color
pub fn opaque(color: RGBColor) -> RGBAColor {
    with_alpha(color, 1.0)
}

/// Surface-level colors that change between themes
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub background: RGBColor,
    /// Axis and separator lines
    pub axis: RGBColor,
    pub text: RGBColor,
    /// Series color for single-color charts (hourly bars, trend line)
    pub accent: RGBColor,
}

impl ColorScheme {
    /// Light theme, the default
    pub fn light() -> Self {
        Self {
            background: RGBColor(255, 255, 255), // White
            axis: RGBColor(189, 189, 189),       // Light Grey
            text: RGBColor(33, 33, 33),          // Near Black
            accent: RGBColor(33, 150, 243),      // Blue
        }
    }

    /// Dark theme color scheme
    pub fn dark() -> Self {
        Self {
            background: RGBColor(21, 23, 25), // Very Dark Gray
            axis: RGBColor(64, 68, 75),       // Dark Gray
            text: RGBColor(208, 210, 214),    // Light Gray
            accent: RGBColor(100, 181, 246),  // Light Blue
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Named theme selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Light => ColorScheme::light(),
            Theme::Dark => ColorScheme::dark(),
        }
    }
}

impl FromStr for Theme {
    type Err = VisualizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(VisualizationError::InvalidData {
                message: format!("unknown theme '{}'", other),
            }),
        }
    }
}

/// Visual styling shared by every chart kind
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub colors: ColorScheme,
    /// Bar width relative to its column (0.1 to 1.0)
    pub bar_width_ratio: f64,
    pub font_size: f64,
    pub legend_font_size: f64,
    pub empty_font_size: f64,
    /// Opacity of the empty-state message
    pub empty_opacity: f64,
    pub line_width: f64,
    pub marker_radius: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::for_theme(Theme::Light)
    }
}

impl ChartStyle {
    pub fn for_theme(theme: Theme) -> Self {
        Self {
            colors: theme.colors(),
            bar_width_ratio: 0.8,
            font_size: 12.0,
            legend_font_size: 12.0,
            empty_font_size: 16.0,
            empty_opacity: 0.5,
            line_width: 2.0,
            marker_radius: 4.0,
        }
    }

    pub fn text_color(&self) -> RGBAColor {
        opaque(self.colors.text)
    }

    /// Muted text for the empty-state message
    pub fn empty_text_color(&self) -> RGBAColor {
        with_alpha(self.colors.text, self.empty_opacity)
    }

    pub fn axis_color(&self) -> RGBAColor {
        opaque(self.colors.axis)
    }

    pub fn accent_color(&self) -> RGBAColor {
        opaque(self.colors.accent)
    }
}
