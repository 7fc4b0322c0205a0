//! Watermark error types.
//!
//! Every variant is fatal to the invocation and maps to its own process
//! exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during watermark processing.
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// Input file is missing or is not a regular file
    #[error("Path error: '{}': {reason}", .path.display())]
    Path { path: PathBuf, reason: String },

    /// Source or overlay image could not be decoded
    #[error("Failed to decode image '{}': {message}", .path.display())]
    ImageDecode { path: PathBuf, message: String },

    /// Requested font is not installed or cannot be loaded
    #[error("Font not found: {name}")]
    FontNotFound { name: String },

    /// A parameter is out of range or malformed
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    /// Output extension names a format we cannot write
    #[error("Unsupported output format: {format}")]
    UnsupportedFormat { format: String },

    /// Failed to render text watermark
    #[error("Failed to render text watermark: {0}")]
    Render(String),

    /// Failed to write the output image
    #[error("Failed to write '{}': {message}", .path.display())]
    Encode { path: PathBuf, message: String },
}

impl WatermarkError {
    pub fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error. 2 is left to argument parsing.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Path { .. } => 3,
            Self::ImageDecode { .. } => 4,
            Self::FontNotFound { .. } => 5,
            Self::InvalidParameter { .. } => 6,
            Self::UnsupportedFormat { .. } => 7,
            Self::Render(_) | Self::Encode { .. } => 8,
        }
    }
}
