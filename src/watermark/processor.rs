//! Watermark processor for applying watermarks to images.
//!
//! This module provides the high-level API: validate a [`WatermarkSpec`],
//! decode the source, build the overlay, composite it and write the result.
//!
//! Steps run in an order that guarantees no output file is created when the
//! parameters are bad or the font cannot be found.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tidymark::watermark::{SystemImaging, WatermarkProcessor, WatermarkSpec};
//!
//! let processor = WatermarkProcessor::new(SystemImaging::system());
//! let spec = WatermarkSpec::text("(c) 2025").with_opacity(0.4);
//!
//! let outcome = processor.process(Path::new("photo.jpg"), &spec, None)?;
//! println!("wrote {}", outcome.output.display());
//! # Ok::<(), tidymark::watermark::WatermarkError>(())
//! ```

use super::config::{Payload, ScalePolicy, WatermarkSpec, MAX_OVERLAY_SIDE};
use super::imaging::Imaging;
use super::output::{resolve_output_path, OutputFormat};
use super::position::{resolve_placement, ImageDimensions, WatermarkDimensions};
use super::text_renderer::TextRenderOptions;
use super::WatermarkError;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatermarkOutcome {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub source_dimensions: (u32, u32),
    /// Size of the overlay after rendering or scaling.
    pub overlay_dimensions: (u32, u32),
    /// Number of overlay copies drawn (more than one when tiled).
    pub placements: usize,
}

/// Result of compositing an overlay onto an in-memory image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composition {
    pub overlay_dimensions: (u32, u32),
    pub placements: usize,
}

/// Watermark processor, generic over the imaging backend.
#[derive(Debug, Clone)]
pub struct WatermarkProcessor<I: Imaging> {
    imaging: I,
}

impl<I: Imaging> WatermarkProcessor<I> {
    pub fn new(imaging: I) -> Self {
        Self { imaging }
    }

    pub fn imaging(&self) -> &I {
        &self.imaging
    }

    /// Watermark `source` and write the result.
    ///
    /// `output` defaults to `<stem>_watermarked.<ext>` beside the source.
    /// The source file is never modified.
    pub fn process(
        &self,
        source: &Path,
        spec: &WatermarkSpec,
        output: Option<&Path>,
    ) -> Result<WatermarkOutcome, WatermarkError> {
        spec.validate()?;

        let (output, format) = resolve_output_path(source, output)?;
        debug!(output = %output.display(), format = %format, "Resolved output");

        let mut image = self.imaging.decode(source)?;
        let source_dimensions = image.dimensions();

        let composition = self.compose(&mut image, spec)?;

        self.imaging.encode(&image, &output, format)?;

        info!(
            source = %source.display(),
            output = %output.display(),
            placements = composition.placements,
            opacity = spec.opacity,
            "Watermark applied"
        );

        Ok(WatermarkOutcome {
            output,
            format,
            source_dimensions,
            overlay_dimensions: composition.overlay_dimensions,
            placements: composition.placements,
        })
    }

    /// Build the overlay for `spec` and composite it onto `target`.
    pub fn compose(
        &self,
        target: &mut RgbaImage,
        spec: &WatermarkSpec,
    ) -> Result<Composition, WatermarkError> {
        let overlay = self.build_overlay(&spec.payload, target.width())?;

        let image_dims = ImageDimensions {
            width: target.width(),
            height: target.height(),
        };
        let wm_dims = WatermarkDimensions {
            width: overlay.width(),
            height: overlay.height(),
        };

        let positions = resolve_placement(spec.placement, &image_dims, &wm_dims, spec.margin);
        for position in &positions {
            self.imaging
                .composite(target, &overlay, *position, spec.opacity);
        }

        Ok(Composition {
            overlay_dimensions: overlay.dimensions(),
            placements: positions.len(),
        })
    }

    fn build_overlay(
        &self,
        payload: &Payload,
        source_width: u32,
    ) -> Result<RgbaImage, WatermarkError> {
        match payload {
            Payload::Text(text) => {
                let font = self.imaging.resolve_font(text.font.as_deref())?;
                let options = TextRenderOptions {
                    text: text.text.clone(),
                    font_size: text.font_size,
                    color: text.color,
                };
                self.imaging.render_text(&font, &options)
            }
            Payload::Image(overlay) => {
                let decoded = self.imaging.decode(&overlay.path)?;
                scale_overlay(&decoded, &overlay.scale, source_width)
            }
        }
    }
}

/// Resize an overlay according to its scale policy, preserving the aspect
/// ratio unless both dimensions are given.
///
/// Fails with [`WatermarkError::InvalidParameter`] when the requested size
/// exceeds [`MAX_OVERLAY_SIDE`] on either side, before anything is allocated.
pub fn scale_overlay(
    overlay: &RgbaImage,
    policy: &ScalePolicy,
    source_width: u32,
) -> Result<RgbaImage, WatermarkError> {
    let (src_w, src_h) = overlay.dimensions();
    if src_w == 0 || src_h == 0 {
        return Ok(overlay.clone());
    }

    let aspect = src_h as f64 / src_w as f64;
    let (target_w, target_h) = match *policy {
        ScalePolicy::Original => return Ok(overlay.clone()),
        ScalePolicy::RelativeToSource(fraction) => {
            let w = (source_width as f64 * fraction as f64).round().max(1.0);
            (w, (w * aspect).round().max(1.0))
        }
        ScalePolicy::Exact { width, height } => match (width, height) {
            (Some(w), Some(h)) => (w as f64, h as f64),
            (Some(w), None) => (w as f64, (w as f64 * aspect).round().max(1.0)),
            (None, Some(h)) => ((h as f64 / aspect).round().max(1.0), h as f64),
            (None, None) => return Ok(overlay.clone()),
        },
    };

    let limit = MAX_OVERLAY_SIDE as f64;
    if target_w > limit || target_h > limit {
        return Err(WatermarkError::invalid(
            "scale",
            format!(
                "overlay would be {}x{} px, the limit is {} px per side",
                target_w, target_h, MAX_OVERLAY_SIDE
            ),
        ));
    }

    let (target_w, target_h) = (target_w as u32, target_h as u32);
    if (target_w, target_h) == (src_w, src_h) {
        return Ok(overlay.clone());
    }

    Ok(imageops::resize(overlay, target_w, target_h, FilterType::Lanczos3))
}
