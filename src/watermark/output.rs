//! Output path and format handling.

use super::WatermarkError;
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Suffix added to the source stem for the default output name.
pub const OUTPUT_SUFFIX: &str = "_watermarked";

/// Extension used when the output path has none.
const FALLBACK_EXTENSION: &str = "png";

/// Image formats the watermarker can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Gif,
    Tiff,
}

impl OutputFormat {
    /// Format named by the path's extension.
    pub fn from_path(path: &Path) -> Result<Self, WatermarkError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            "gif" => Ok(Self::Gif),
            "tif" | "tiff" => Ok(Self::Tiff),
            "" => Err(WatermarkError::UnsupportedFormat {
                format: "(none)".to_string(),
            }),
            other => Err(WatermarkError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
            Self::Gif => ImageFormat::Gif,
            Self::Tiff => ImageFormat::Tiff,
        }
    }

    /// JPEG output drops the alpha channel.
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Tiff => "tiff",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<dir>/<stem>_watermarked.<ext>` next to the source.
///
/// Sources whose format cannot be written (e.g. WebP) or that have no
/// extension get a `.png` output.
pub fn default_output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .filter(|_| OutputFormat::from_path(source).is_ok())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    source.with_file_name(format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext))
}

/// Decide where the result goes and in which format.
pub fn resolve_output_path(
    source: &Path,
    output: Option<&Path>,
) -> Result<(PathBuf, OutputFormat), WatermarkError> {
    let path = match output {
        None => default_output_path(source),
        Some(path) => {
            let mut path = path.to_path_buf();
            let has_extension = path
                .extension()
                .map(|e| !e.is_empty())
                .unwrap_or(false);
            if !has_extension {
                path.set_extension(FALLBACK_EXTENSION);
            }
            path
        }
    };

    if is_same_file(source, &path) {
        return Err(WatermarkError::invalid(
            "output",
            format!("'{}' would overwrite the source image", path.display()),
        ));
    }

    let format = OutputFormat::from_path(&path)?;
    Ok((path, format))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Encode `image` to `path`.
///
/// On failure a file created by this call is removed. A file that existed
/// before the call is left alone.
pub fn write_image(
    image: &RgbaImage,
    path: &Path,
    format: OutputFormat,
) -> Result<(), WatermarkError> {
    let existed = path.exists();
    let result = if format.supports_alpha() {
        image.save_with_format(path, format.image_format())
    } else {
        DynamicImage::ImageRgba8(image.clone())
            .into_rgb8()
            .save_with_format(path, format.image_format())
    };

    result.map_err(|e| {
        if !existed && path.exists() {
            if let Err(remove_err) = std::fs::remove_file(path) {
                warn!(path = %path.display(), error = %remove_err, "Failed to remove partial output");
            }
        }
        WatermarkError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })
}
