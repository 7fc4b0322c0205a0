//! Text watermark rendering.
//!
//! Rasterises a string into a tightly sized RGBA image with a transparent
//! background. Glyph outlines come from `ab_glyph`; opacity is applied later
//! by the compositor, so rendered glyphs are fully opaque.
//!
//! # Example
//!
//! ```no_run
//! use tidymark::watermark::fonts::FontResolver;
//! use tidymark::watermark::text_renderer::{parse_color, render_text, TextRenderOptions};
//!
//! let font = FontResolver::system().resolve(None).unwrap();
//! let options = TextRenderOptions {
//!     text: "Copyright 2025".to_string(),
//!     font_size: 24.0,
//!     color: parse_color("#FFFFFF").unwrap(),
//! };
//!
//! let image = render_text(&font, &options).unwrap();
//! ```

use super::compositor::blend_pixels;
use super::config::MAX_OVERLAY_SIDE;
use super::WatermarkError;
use ab_glyph::{Font, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Padding added around measured text, in pixels.
const TEXT_PADDING: u32 = 2;

/// RGB text colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn red() -> Self {
        Self::new(255, 0, 0)
    }

    pub fn gray() -> Self {
        Self::new(128, 128, 128)
    }
}

impl FromStr for Color {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

/// Options for text rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRenderOptions {
    /// The text to render.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color (RGB).
    pub color: Color,
}

impl Default for TextRenderOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 24.0,
            color: Color::white(),
        }
    }
}

fn color_error(message: impl Into<String>) -> WatermarkError {
    WatermarkError::invalid("color", message)
}

/// Parse a hex color string into RGB components.
///
/// Supports both #RGB and #RRGGBB formats.
///
/// # Examples
///
/// ```
/// use tidymark::watermark::text_renderer::{parse_hex_color, Color};
///
/// assert_eq!(parse_hex_color("#FFF").unwrap(), Color::new(255, 255, 255));
/// assert_eq!(parse_hex_color("#FF0000").unwrap(), Color::new(255, 0, 0));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| color_error("Color must start with '#'"))?;

    if !hex.is_ascii() {
        return Err(color_error("Invalid hex digit"));
    }

    let digit = |s: &str| u8::from_str_radix(s, 16).map_err(|_| color_error("Invalid hex digit"));

    match hex.len() {
        3 => {
            // #RGB format - each digit is doubled: 0xF -> 0xFF, 0xA -> 0xAA
            let r = digit(&hex[0..1])?;
            let g = digit(&hex[1..2])?;
            let b = digit(&hex[2..3])?;
            Ok(Color::new(r * 17, g * 17, b * 17))
        }
        6 => Ok(Color::new(
            digit(&hex[0..2])?,
            digit(&hex[2..4])?,
            digit(&hex[4..6])?,
        )),
        _ => Err(color_error(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            hex.len()
        ))),
    }
}

/// Parse a colour given as a hex string or one of the names
/// `white`, `black`, `red`, `gray`/`grey`.
pub fn parse_color(value: &str) -> Result<Color, WatermarkError> {
    let value = value.trim();
    match value.to_lowercase().as_str() {
        "white" => Ok(Color::white()),
        "black" => Ok(Color::black()),
        "red" => Ok(Color::red()),
        "gray" | "grey" => Ok(Color::gray()),
        _ if value.starts_with('#') => parse_hex_color(value),
        _ => Err(color_error(format!(
            "unknown color '{}' (use white, black, red, gray or #RRGGBB)",
            value
        ))),
    }
}

/// Calculate the dimensions of rendered text.
///
/// Returns (width, height) in pixels, including a small padding.
pub fn measure_text<F: Font>(font: &F, text: &str, font_size: f32) -> (u32, u32) {
    let scaled_font = font.as_scaled(PxScale::from(font_size));

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }

        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    let height = scaled_font.height();

    (
        (width.max(0.0).ceil() as u32).saturating_add(TEXT_PADDING),
        (height.max(0.0).ceil() as u32).saturating_add(TEXT_PADDING),
    )
}

/// Canvas for a measured text, refused when a side exceeds
/// [`MAX_OVERLAY_SIDE`].
fn canvas_size(width: u32, height: u32) -> Result<(u32, u32), WatermarkError> {
    if width > MAX_OVERLAY_SIDE || height > MAX_OVERLAY_SIDE {
        return Err(WatermarkError::invalid(
            "text",
            format!(
                "rendered text would be {}x{} px, the limit is {} px per side",
                width, height, MAX_OVERLAY_SIDE
            ),
        ));
    }
    Ok((width.max(1), height.max(1)))
}

/// Render text to an RGBA image with a transparent background.
pub fn render_text<F: Font>(
    font: &F,
    options: &TextRenderOptions,
) -> Result<RgbaImage, WatermarkError> {
    if options.text.is_empty() {
        return Err(WatermarkError::Render("Cannot render empty text".to_string()));
    }
    if !options.font_size.is_finite() || options.font_size <= 0.0 {
        return Err(WatermarkError::Render(format!(
            "Invalid font size {}",
            options.font_size
        )));
    }

    let scale = PxScale::from(options.font_size);
    let scaled_font = font.as_scaled(scale);

    let (width, height) = measure_text(font, &options.text, options.font_size);
    let (canvas_width, canvas_height) = canvas_size(width, height)?;

    let mut image = RgbaImage::new(canvas_width, canvas_height);

    let offset = TEXT_PADDING as f32 / 2.0;
    let baseline_y = offset + scaled_font.ascent();

    let mut cursor_x = offset;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in options.text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && y >= 0 && x < canvas_width as i32 && y < canvas_height as i32 {
                    let pixel_alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    let pixel = Rgba([
                        options.color.r,
                        options.color.g,
                        options.color.b,
                        pixel_alpha,
                    ]);

                    // Overlapping glyph edges accumulate coverage
                    let existing = *image.get_pixel(x as u32, y as u32);
                    image.put_pixel(x as u32, y as u32, blend_pixels(existing, pixel, 1.0));
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    Ok(image)
}
