//! Watermark module for applying text and image watermarks to images.
//!
//! A source image is decoded, an overlay is built from a [`WatermarkSpec`]
//! (rendered text or a second image), composited at the requested placement
//! and opacity, and written to a new file. The source is never modified.
//!
//! # Features
//!
//! - **Text watermarks** rendered with a host font located by name
//! - **Image watermarks** scaled relative to the source or to an exact size
//! - **Placement**: five anchors with a margin, explicit `X,Y`, or tiled
//! - **Output format** chosen from the output file extension
//!
//! # Exit codes
//!
//! Every [`WatermarkError`] variant maps to its own process exit code via
//! [`WatermarkError::exit_code`].

pub mod compositor;
pub mod config;
pub mod error;
pub mod fonts;
pub mod imaging;
pub mod output;
pub mod position;
pub mod processor;
pub mod text_renderer;

// Re-export main types for convenience
pub use compositor::composite;
pub use config::{
    Anchor, ImagePayload, Payload, Placement, ScalePolicy, TextPayload, WatermarkSpec,
    DEFAULT_FONT_SIZE, DEFAULT_MARGIN, DEFAULT_OPACITY, DEFAULT_SCALE, DEFAULT_TILE_SPACING,
    MAX_OVERLAY_SIDE,
};
pub use error::WatermarkError;
pub use fonts::{FontResolver, DEFAULT_FONT_CANDIDATES};
pub use imaging::{Imaging, SystemImaging};
pub use output::{default_output_path, resolve_output_path, write_image, OutputFormat};
pub use position::{
    calculate_position, calculate_tiled_positions, clamp_to_bounds, resolve_placement,
    ImageDimensions, PlacementPosition, WatermarkDimensions,
};
pub use processor::{scale_overlay, Composition, WatermarkOutcome, WatermarkProcessor};
pub use text_renderer::{
    measure_text, parse_color, parse_hex_color, render_text, Color, TextRenderOptions,
};
