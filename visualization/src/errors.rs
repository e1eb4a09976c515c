//! Error types for access chart rendering

use thiserror::Error;

/// Result type alias for visualization operations
pub type Result<T> = std::result::Result<T, VisualizationError>;

/// Errors that can occur while drawing or exporting charts
#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("Invalid data format: {message}")]
    InvalidData { message: String },

    #[error("Chart rendering failed: {message}")]
    RenderingError { message: String },

    #[error("File I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Image processing error: {message}")]
    ImageError { message: String },

    #[error("Layout calculation error: {message}")]
    LayoutError { message: String },

    #[error("Font error: {message}")]
    FontError { message: String },
}

impl From<image::ImageError> for VisualizationError {
    fn from(err: image::ImageError) -> Self {
        VisualizationError::ImageError {
            message: err.to_string(),
        }
    }
}

impl<T: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<T>>
    for VisualizationError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        VisualizationError::RenderingError {
            message: format!("Drawing area error: {}", err),
        }
    }
}

impl From<serde_json::Error> for VisualizationError {
    fn from(err: serde_json::Error) -> Self {
        VisualizationError::InvalidData {
            message: err.to_string(),
        }
    }
}
