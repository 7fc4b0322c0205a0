// Watermarker end-to-end tests
// Real PNG/JPEG files on disk; text is drawn with a block "font" so the
// results do not depend on the fonts installed on the host

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tidymark::watermark::{
    Anchor, Imaging, OutputFormat, Placement, ScalePolicy, SystemImaging, TextRenderOptions,
    WatermarkError, WatermarkProcessor, WatermarkSpec,
};

/// Real decoding and encoding; text renders as a solid 6x10 block per
/// character and only the font named "Block" exists.
struct BlockFontImaging {
    inner: SystemImaging,
}

impl Imaging for BlockFontImaging {
    type Font = ();

    fn decode(&self, path: &Path) -> Result<RgbaImage, WatermarkError> {
        self.inner.decode(path)
    }

    fn encode(
        &self,
        image: &RgbaImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), WatermarkError> {
        self.inner.encode(image, path, format)
    }

    fn resolve_font(&self, name: Option<&str>) -> Result<(), WatermarkError> {
        match name {
            None | Some("Block") => Ok(()),
            Some(other) => Err(WatermarkError::FontNotFound {
                name: other.to_string(),
            }),
        }
    }

    fn render_text(
        &self,
        _font: &(),
        options: &TextRenderOptions,
    ) -> Result<RgbaImage, WatermarkError> {
        let c = options.color;
        Ok(RgbaImage::from_pixel(
            options.text.chars().count() as u32 * 6,
            10,
            Rgba([c.r, c.g, c.b, 255]),
        ))
    }
}

fn processor() -> WatermarkProcessor<BlockFontImaging> {
    WatermarkProcessor::new(BlockFontImaging {
        inner: SystemImaging::system(),
    })
}

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

fn write_png(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).expect("Failed to write test image");
    path
}

fn watermark_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_watermark"))
}

#[test]
fn test_zero_opacity_output_identical_to_source() {
    let dir = TempDir::new().unwrap();
    let source_image = gradient(80, 60);
    let source = write_png(dir.path(), "photo.png", &source_image);

    let spec = WatermarkSpec::text("CONFIDENTIAL").with_opacity(0.0);
    let outcome = processor().process(&source, &spec, None).unwrap();

    assert_eq!(outcome.output, dir.path().join("photo_watermarked.png"));
    let written = image::open(&outcome.output).unwrap().to_rgba8();
    assert_eq!(written, source_image);
}

#[test]
fn test_full_opacity_overlay_pixels_in_region() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(120, 90));
    let logo_image = RgbaImage::from_fn(16, 12, |x, y| Rgba([250, (x * 10) as u8, (y * 20) as u8, 255]));
    let logo = write_png(dir.path(), "logo.png", &logo_image);
    let output = dir.path().join("out.png");

    let spec = WatermarkSpec::image(&logo)
        .with_scale(ScalePolicy::Original)
        .with_opacity(1.0)
        .with_placement(Placement::Offset { x: 30, y: 40 });
    processor().process(&source, &spec, Some(output.as_path())).unwrap();

    let written = image::open(&output).unwrap().to_rgba8();
    for y in 0..12 {
        for x in 0..16 {
            assert_eq!(written.get_pixel(30 + x, 40 + y), logo_image.get_pixel(x, y));
        }
    }
    assert_eq!(written.get_pixel(29, 40), gradient(120, 90).get_pixel(29, 40));
}

#[test]
fn test_source_file_is_never_modified() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(40, 40));
    let before = fs::read(&source).unwrap();

    let spec = WatermarkSpec::text("hi")
        .with_opacity(1.0)
        .with_placement(Placement::Anchor(Anchor::Center));
    processor().process(&source, &spec, None).unwrap();

    assert_eq!(fs::read(&source).unwrap(), before);
}

#[test]
fn test_output_over_source_is_rejected() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(10, 10));

    let err = processor()
        .process(&source, &WatermarkSpec::text("x"), Some(source.as_path()))
        .unwrap_err();

    assert!(matches!(err, WatermarkError::InvalidParameter { .. }));
}

#[test]
fn test_invalid_opacity_creates_no_output() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(20, 20));

    let err = processor()
        .process(&source, &WatermarkSpec::text("x").with_opacity(1.5), None)
        .unwrap_err();

    assert!(matches!(err, WatermarkError::InvalidParameter { .. }));
    assert!(!dir.path().join("photo_watermarked.png").exists());
}

#[test]
fn test_unknown_font_creates_no_output() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(20, 20));

    let err = processor()
        .process(&source, &WatermarkSpec::text("x").with_font("Gothic Wide"), None)
        .unwrap_err();

    assert!(matches!(err, WatermarkError::FontNotFound { .. }));
    assert!(!dir.path().join("photo_watermarked.png").exists());
}

#[test]
fn test_jpeg_output_and_png_fallback_extension() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(32, 32));

    let outcome = processor()
        .process(&source, &WatermarkSpec::text("a"), Some(dir.path().join("out.jpg").as_path()))
        .unwrap();
    assert_eq!(outcome.format, OutputFormat::Jpeg);
    assert_eq!(image::open(&outcome.output).unwrap().color(), image::ColorType::Rgb8);

    let outcome = processor()
        .process(&source, &WatermarkSpec::text("a"), Some(dir.path().join("plain").as_path()))
        .unwrap();
    assert_eq!(outcome.output, dir.path().join("plain.png"));
    assert!(outcome.output.is_file());
}

#[test]
fn test_corrupt_source_is_decode_error() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("broken.png");
    fs::write(&source, b"\x89PNG but not really").unwrap();

    let err = processor()
        .process(&source, &WatermarkSpec::text("x"), None)
        .unwrap_err();

    assert_eq!(err.exit_code(), 4);
    assert!(!dir.path().join("broken_watermarked.png").exists());
}

#[test]
fn test_cli_missing_source_exits_with_path_code() {
    let dir = TempDir::new().unwrap();

    let status = watermark_bin()
        .arg(dir.path().join("nope.png"))
        .args(["--text", "x"])
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(3));
}

#[test]
fn test_cli_invalid_opacity_exits_six_without_output() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(10, 10));

    let status = watermark_bin()
        .arg(&source)
        .args(["--text", "x", "--opacity", "1.5"])
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(6));
    assert!(!dir.path().join("photo_watermarked.png").exists());
}

#[test]
fn test_cli_unknown_font_exits_five_without_output() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(10, 10));

    let status = watermark_bin()
        .arg(&source)
        .args(["--text", "x", "--font", "Nonexistent Font Qzx"])
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(5));
    assert!(!dir.path().join("photo_watermarked.png").exists());
}

#[test]
fn test_cli_webp_output_exits_seven() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(10, 10));

    let status = watermark_bin()
        .arg(&source)
        .args(["--text", "x", "-o"])
        .arg(dir.path().join("out.webp"))
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(7));
}

#[test]
fn test_cli_image_overlay_writes_output() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(100, 50));
    let logo = write_png(dir.path(), "logo.png", &RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255])));

    let output = watermark_bin()
        .arg(&source)
        .arg("--image")
        .arg(&logo)
        .args(["--position", "tile", "--opacity", "0.3"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let written = image::open(dir.path().join("photo_watermarked.png")).unwrap();
    assert_eq!((written.width(), written.height()), (100, 50));
}

#[test]
fn test_cli_missing_payload_is_usage_error() {
    let status = watermark_bin().arg("photo.png").status().unwrap();
    assert_eq!(status.code(), Some(2));
}

#[test]
fn test_cli_original_size_keeps_overlay_pixels() {
    let dir = TempDir::new().unwrap();
    let source_image = gradient(100, 50);
    let source = write_png(dir.path(), "photo.png", &source_image);
    let logo_image = RgbaImage::from_fn(12, 8, |x, y| Rgba([240, (x * 20) as u8, (y * 30) as u8, 255]));
    let logo = write_png(dir.path(), "logo.png", &logo_image);

    let output = watermark_bin()
        .arg(&source)
        .arg("--image")
        .arg(&logo)
        .args(["--original-size", "--opacity", "1", "--position", "top-left", "--margin", "0"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let written = image::open(dir.path().join("photo_watermarked.png"))
        .unwrap()
        .to_rgba8();
    for y in 0..8 {
        for x in 0..12 {
            assert_eq!(written.get_pixel(x, y), logo_image.get_pixel(x, y));
        }
    }
    // Unscaled, so nothing beyond 12x8 is touched
    assert_eq!(written.get_pixel(12, 0), source_image.get_pixel(12, 0));
    assert_eq!(written.get_pixel(0, 8), source_image.get_pixel(0, 8));
}

#[test]
fn test_cli_huge_overlay_width_exits_six_without_output() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(10, 10));
    let logo = write_png(dir.path(), "logo.png", &gradient(4, 4));

    let status = watermark_bin()
        .arg(&source)
        .arg("--image")
        .arg(&logo)
        .args(["--width", "4000000000"])
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(6));
    assert!(!dir.path().join("photo_watermarked.png").exists());
}

#[test]
fn test_cli_huge_font_size_exits_six_without_output() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", &gradient(10, 10));

    let status = watermark_bin()
        .arg(&source)
        .args(["--text", "x", "--font-size", "1000000000"])
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(6));
    assert!(!dir.path().join("photo_watermarked.png").exists());
}
