//! Watermark specification types.
//!
//! A [`WatermarkSpec`] describes what to overlay (text or an image), where
//! to put it, and how opaque it is. It is built from command-line flags and
//! checked with [`WatermarkSpec::validate`] before any file is touched.

use super::error::WatermarkError;
use super::text_renderer::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_OPACITY: f32 = 0.5;
pub const DEFAULT_MARGIN: u32 = 10;
pub const DEFAULT_FONT_SIZE: f32 = 50.0;
/// Overlay width as a fraction of the source width.
pub const DEFAULT_SCALE: f32 = 0.2;
pub const DEFAULT_TILE_SPACING: u32 = 20;
/// Largest overlay side, in pixels, that is ever allocated.
pub const MAX_OVERLAY_SIDE: u32 = 8192;

/// Named placement relative to the image edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Anchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = WatermarkError;

    /// Accepts `bottom-right`, `bottom_right`, `Bottom Right`, `br`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "topleft" | "tl" => Ok(Self::TopLeft),
            "topright" | "tr" => Ok(Self::TopRight),
            "bottomleft" | "bl" => Ok(Self::BottomLeft),
            "bottomright" | "br" => Ok(Self::BottomRight),
            "center" | "centre" | "c" => Ok(Self::Center),
            _ => Err(WatermarkError::invalid(
                "position",
                format!(
                    "unknown anchor '{}' (expected top-left, top-right, bottom-left, \
                     bottom-right, center, tile, or X,Y)",
                    s
                ),
            )),
        }
    }
}

/// Where the overlay goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Anchor(Anchor),
    /// Top-left corner of the overlay in source pixels. Clamped into the
    /// image when out of bounds.
    Offset { x: i32, y: i32 },
    /// Repeat the overlay across the whole image.
    Tiled { spacing: u32 },
}

impl Default for Placement {
    fn default() -> Self {
        Self::Anchor(Anchor::BottomRight)
    }
}

impl FromStr for Placement {
    type Err = WatermarkError;

    /// Parses an anchor name, `tile`, or `X,Y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some((x, y)) = trimmed.split_once(',') {
            let parse = |v: &str, axis: &str| {
                v.trim().parse::<i32>().map_err(|_| {
                    WatermarkError::invalid(
                        "position",
                        format!("{} coordinate '{}' is not an integer", axis, v.trim()),
                    )
                })
            };
            return Ok(Self::Offset {
                x: parse(x, "x")?,
                y: parse(y, "y")?,
            });
        }

        if trimmed.eq_ignore_ascii_case("tile") || trimmed.eq_ignore_ascii_case("tiled") {
            return Ok(Self::Tiled {
                spacing: DEFAULT_TILE_SPACING,
            });
        }

        trimmed.parse::<Anchor>().map(Self::Anchor)
    }
}

/// How an image overlay is sized before compositing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Overlay width is this fraction of the source width; aspect kept.
    RelativeToSource(f32),
    /// Explicit target size. With one side given the other follows the
    /// overlay's aspect ratio.
    Exact {
        width: Option<u32>,
        height: Option<u32>,
    },
    /// Use the overlay as is.
    Original,
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self::RelativeToSource(DEFAULT_SCALE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    pub text: String,
    /// Font family or file name; `None` picks a system default.
    pub font: Option<String>,
    /// Font size in pixels
    pub font_size: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub path: PathBuf,
    pub scale: ScalePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    Text(TextPayload),
    Image(ImagePayload),
}

/// Everything needed to watermark one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkSpec {
    pub payload: Payload,
    pub placement: Placement,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: f32,
    /// Inset from the edges for anchored placements, in pixels
    pub margin: u32,
}

impl WatermarkSpec {
    /// Text watermark with default font, size, colour and placement.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_payload(Payload::Text(TextPayload {
            text: text.into(),
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            color: Color::white(),
        }))
    }

    /// Image watermark scaled to the default fraction of the source width.
    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self::with_payload(Payload::Image(ImagePayload {
            path: path.into(),
            scale: ScalePolicy::default(),
        }))
    }

    fn with_payload(payload: Payload) -> Self {
        Self {
            payload,
            placement: Placement::default(),
            opacity: DEFAULT_OPACITY,
            margin: DEFAULT_MARGIN,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Only affects text payloads.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        if let Payload::Text(text) = &mut self.payload {
            text.font = Some(font.into());
        }
        self
    }

    /// Only affects text payloads.
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        if let Payload::Text(text) = &mut self.payload {
            text.font_size = font_size;
        }
        self
    }

    /// Only affects text payloads.
    pub fn with_color(mut self, color: Color) -> Self {
        if let Payload::Text(text) = &mut self.payload {
            text.color = color;
        }
        self
    }

    /// Only affects image payloads.
    pub fn with_scale(mut self, scale: ScalePolicy) -> Self {
        if let Payload::Image(image) = &mut self.payload {
            image.scale = scale;
        }
        self
    }

    pub fn validate(&self) -> Result<(), WatermarkError> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(WatermarkError::invalid(
                "opacity",
                format!("must be between 0.0 and 1.0, got {}", self.opacity),
            ));
        }

        match &self.payload {
            Payload::Text(text) => {
                if text.text.trim().is_empty() {
                    return Err(WatermarkError::invalid("text", "must not be empty"));
                }
                if !text.font_size.is_finite() || text.font_size <= 0.0 {
                    return Err(WatermarkError::invalid(
                        "font-size",
                        format!("must be positive, got {}", text.font_size),
                    ));
                }
                if text.font_size > MAX_OVERLAY_SIDE as f32 {
                    return Err(WatermarkError::invalid(
                        "font-size",
                        format!(
                            "must be at most {}, got {}",
                            MAX_OVERLAY_SIDE, text.font_size
                        ),
                    ));
                }
                if let Some(font) = &text.font {
                    if font.trim().is_empty() {
                        return Err(WatermarkError::invalid("font", "must not be empty"));
                    }
                }
            }
            Payload::Image(image) => match image.scale {
                ScalePolicy::RelativeToSource(scale) => {
                    if !scale.is_finite() || scale <= 0.0 {
                        return Err(WatermarkError::invalid(
                            "scale",
                            format!("must be positive, got {}", scale),
                        ));
                    }
                }
                ScalePolicy::Exact { width, height } => {
                    if width.is_none() && height.is_none() {
                        return Err(WatermarkError::invalid(
                            "width",
                            "width or height is required for an exact size",
                        ));
                    }
                    if width == Some(0) || height == Some(0) {
                        return Err(WatermarkError::invalid(
                            "width",
                            "overlay dimensions must be positive",
                        ));
                    }
                    for (param, side) in [("width", width), ("height", height)] {
                        if let Some(side) = side.filter(|side| *side > MAX_OVERLAY_SIDE) {
                            return Err(WatermarkError::invalid(
                                param,
                                format!("must be at most {}, got {}", MAX_OVERLAY_SIDE, side),
                            ));
                        }
                    }
                }
                ScalePolicy::Original => {}
            },
        }

        Ok(())
    }
}
