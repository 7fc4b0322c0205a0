//! Position calculation for watermark placement.
//!
//! Turns a [`Placement`] into the top-left pixel coordinates of every
//! overlay copy.
//!
//! # Position Modes
//!
//! - **Anchors**: TopLeft, TopRight, BottomLeft, BottomRight, Center, inset
//!   by a margin
//! - **Offset**: explicit `(x, y)`, clamped into the image
//! - **Tiled**: repeating grid pattern across the entire image
//!
//! # Example
//!
//! ```
//! use tidymark::watermark::position::{calculate_position, ImageDimensions, WatermarkDimensions};
//! use tidymark::watermark::Anchor;
//!
//! let image = ImageDimensions { width: 800, height: 600 };
//! let watermark = WatermarkDimensions { width: 100, height: 50 };
//!
//! let pos = calculate_position(Anchor::BottomRight, &image, &watermark, 10);
//! assert_eq!((pos.x, pos.y), (690, 540)); // 800 - 100 - 10, 600 - 50 - 10
//! ```

use super::config::{Anchor, Placement};

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of the watermark to be placed.
#[derive(Debug, Clone, Copy)]
pub struct WatermarkDimensions {
    pub width: u32,
    pub height: u32,
}

/// A single position where a watermark should be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Calculate the position for an anchored watermark.
///
/// Coordinates may be negative if the watermark is larger than the image;
/// [`resolve_placement`] clamps them.
pub fn calculate_position(
    anchor: Anchor,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
    margin: u32,
) -> PlacementPosition {
    let img_w = image.width as i32;
    let img_h = image.height as i32;
    let wm_w = watermark.width as i32;
    let wm_h = watermark.height as i32;
    let m = margin as i32;

    match anchor {
        Anchor::TopLeft => PlacementPosition::new(m, m),
        Anchor::TopRight => PlacementPosition::new(img_w - wm_w - m, m),
        Anchor::BottomLeft => PlacementPosition::new(m, img_h - wm_h - m),
        Anchor::BottomRight => PlacementPosition::new(img_w - wm_w - m, img_h - wm_h - m),
        Anchor::Center => PlacementPosition::new((img_w - wm_w) / 2, (img_h - wm_h) / 2),
    }
}

/// Calculate positions for tiled watermark placement.
///
/// Generates a grid of positions covering the entire image with the specified
/// spacing between watermarks, starting at the top-left corner.
pub fn calculate_tiled_positions(
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
    spacing: u32,
) -> Vec<PlacementPosition> {
    let mut positions = Vec::new();

    // A zero-sized overlay with no spacing would never advance
    let step_x = (watermark.width + spacing).max(1) as i64;
    let step_y = (watermark.height + spacing).max(1) as i64;

    let mut y = 0i64;
    while y < image.height as i64 {
        let mut x = 0i64;
        while x < image.width as i64 {
            positions.push(PlacementPosition::new(x as i32, y as i32));
            x += step_x;
        }
        y += step_y;
    }

    positions
}

/// Clamp a position to ensure the watermark stays within image bounds.
///
/// When the watermark is larger than the image the position is pinned to
/// the top-left corner.
pub fn clamp_to_bounds(
    pos: PlacementPosition,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
) -> PlacementPosition {
    let max_x = (image.width as i32 - watermark.width as i32).max(0);
    let max_y = (image.height as i32 - watermark.height as i32).max(0);

    PlacementPosition::new(pos.x.clamp(0, max_x), pos.y.clamp(0, max_y))
}

/// Resolve a placement into concrete overlay positions.
///
/// Anchored and explicit placements yield one clamped position; tiled
/// placement yields the whole grid.
pub fn resolve_placement(
    placement: Placement,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
    margin: u32,
) -> Vec<PlacementPosition> {
    match placement {
        Placement::Anchor(anchor) => vec![clamp_to_bounds(
            calculate_position(anchor, image, watermark, margin),
            image,
            watermark,
        )],
        Placement::Offset { x, y } => vec![clamp_to_bounds(
            PlacementPosition::new(x, y),
            image,
            watermark,
        )],
        Placement::Tiled { spacing } => calculate_tiled_positions(image, watermark, spacing),
    }
}
