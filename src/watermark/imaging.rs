//! The imaging capability the watermark processor depends on.
//!
//! [`SystemImaging`] is the real implementation backed by the `image` crate,
//! `ab_glyph` and the host font directories. Tests swap in an in-memory one.

use super::compositor;
use super::fonts::FontResolver;
use super::output::{write_image, OutputFormat};
use super::position::PlacementPosition;
use super::text_renderer::{self, TextRenderOptions};
use super::WatermarkError;
use ab_glyph::FontArc;
use image::RgbaImage;
use std::path::Path;

/// Decoding, encoding, font lookup and text rasterisation.
pub trait Imaging {
    type Font;

    /// Decode the image at `path` into RGBA.
    fn decode(&self, path: &Path) -> Result<RgbaImage, WatermarkError>;

    fn encode(
        &self,
        image: &RgbaImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), WatermarkError>;

    /// Look up a font by name or path; `None` means the default font.
    fn resolve_font(&self, name: Option<&str>) -> Result<Self::Font, WatermarkError>;

    fn render_text(
        &self,
        font: &Self::Font,
        options: &TextRenderOptions,
    ) -> Result<RgbaImage, WatermarkError>;

    fn composite(
        &self,
        target: &mut RgbaImage,
        overlay: &RgbaImage,
        at: PlacementPosition,
        opacity: f32,
    ) {
        compositor::composite(target, overlay, at, opacity);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemImaging {
    fonts: FontResolver,
}

impl SystemImaging {
    pub fn new(fonts: FontResolver) -> Self {
        Self { fonts }
    }

    pub fn system() -> Self {
        Self::new(FontResolver::system())
    }
}

impl Imaging for SystemImaging {
    type Font = FontArc;

    fn decode(&self, path: &Path) -> Result<RgbaImage, WatermarkError> {
        if !path.exists() {
            return Err(WatermarkError::Path {
                path: path.to_path_buf(),
                reason: "does not exist".to_string(),
            });
        }
        if !path.is_file() {
            return Err(WatermarkError::Path {
                path: path.to_path_buf(),
                reason: "is not a regular file".to_string(),
            });
        }

        let decoded = image::io::Reader::open(path)
            .map_err(|e| WatermarkError::Path {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
            .with_guessed_format()
            .map_err(|e| WatermarkError::ImageDecode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .decode()
            .map_err(|e| WatermarkError::ImageDecode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(decoded.to_rgba8())
    }

    fn encode(
        &self,
        image: &RgbaImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), WatermarkError> {
        write_image(image, path, format)
    }

    fn resolve_font(&self, name: Option<&str>) -> Result<FontArc, WatermarkError> {
        self.fonts.resolve(name)
    }

    fn render_text(
        &self,
        font: &FontArc,
        options: &TextRenderOptions,
    ) -> Result<RgbaImage, WatermarkError> {
        text_renderer::render_text(font, options)
    }
}
