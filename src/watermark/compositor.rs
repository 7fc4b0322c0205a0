//! Watermark compositor for blending watermarks onto images.
//!
//! This module handles alpha blending of an overlay onto a target image at
//! a position computed by [`super::position`].
//!
//! # Features
//!
//! - Porter-Duff "over" blending with an extra opacity factor
//! - Clipping at the image edges, including negative positions
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use tidymark::watermark::compositor::composite;
//! use tidymark::watermark::position::PlacementPosition;
//!
//! let mut target = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
//! let overlay = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
//!
//! composite(&mut target, &overlay, PlacementPosition { x: 10, y: 10 }, 0.5);
//! ```

use super::position::PlacementPosition;
use image::{Rgba, RgbaImage};

/// Blend two pixels using alpha compositing with additional opacity.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha).
/// A foreground that ends up fully transparent leaves the background as is.
pub(crate) fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    if fg_alpha <= 0.0 {
        return background;
    }

    let bg_alpha = background[3] as f32 / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Composite `overlay` onto `target` with its top-left corner at `at`.
///
/// The part of the overlay that falls outside `target` is clipped. An
/// opacity of zero (or NaN) leaves `target` untouched.
pub fn composite(target: &mut RgbaImage, overlay: &RgbaImage, at: PlacementPosition, opacity: f32) {
    if opacity <= 0.0 || opacity.is_nan() {
        return;
    }

    let target_width = target.width() as i64;
    let target_height = target.height() as i64;

    let pos_x = at.x as i64;
    let pos_y = at.y as i64;

    // Visible region, clipped to the target
    let x_start = pos_x.max(0);
    let y_start = pos_y.max(0);
    let x_end = (pos_x + overlay.width() as i64).min(target_width);
    let y_end = (pos_y + overlay.height() as i64).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wm_pixel = *overlay.get_pixel((tx - pos_x) as u32, (ty - pos_y) as u32);
            let target_pixel = target.get_pixel_mut(tx as u32, ty as u32);
            *target_pixel = blend_pixels(*target_pixel, wm_pixel, opacity);
        }
    }
}
