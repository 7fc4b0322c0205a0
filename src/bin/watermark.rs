use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tidymark::logging::{init_subscriber, LogFormat, LoggingOptions};
use tidymark::watermark::{
    parse_color, ScalePolicy, SystemImaging, WatermarkError, WatermarkOutcome,
    WatermarkProcessor, WatermarkSpec, DEFAULT_FONT_SIZE, DEFAULT_MARGIN, DEFAULT_OPACITY,
};

/// Overlay a text or image watermark onto a picture
#[derive(Parser, Debug)]
#[command(name = "watermark")]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("payload").required(true).args(["text", "image"])))]
struct Args {
    /// Image to watermark (left untouched)
    source: PathBuf,

    /// Text to draw
    #[arg(long)]
    text: Option<String>,

    /// Image to overlay
    #[arg(long)]
    image: Option<PathBuf>,

    /// Font name or path to a font file (text only)
    #[arg(long)]
    font: Option<String>,

    /// Font size in pixels (text only)
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: f32,

    /// Text colour: #RGB, #RRGGBB, white, black, red or gray
    #[arg(long, default_value = "white")]
    color: String,

    /// 0.0 (invisible) to 1.0 (opaque)
    #[arg(long, default_value_t = DEFAULT_OPACITY, allow_negative_numbers = true)]
    opacity: f32,

    /// top-left, top-right, bottom-left, bottom-right, center, tile or X,Y
    #[arg(long, default_value = "bottom-right", allow_hyphen_values = true)]
    position: String,

    /// Distance from the edges for anchored positions, in pixels
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    margin: u32,

    /// Overlay width as a fraction of the source width (image only)
    #[arg(long, conflicts_with_all = ["width", "height"], allow_negative_numbers = true)]
    scale: Option<f32>,

    /// Overlay width in pixels (image only)
    #[arg(long)]
    width: Option<u32>,

    /// Overlay height in pixels (image only)
    #[arg(long)]
    height: Option<u32>,

    /// Keep the overlay at its own pixel size (image only)
    #[arg(long, conflicts_with_all = ["scale", "width", "height"])]
    original_size: bool,

    /// Output file; the extension picks the format
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `tidymark=trace`
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = setup_logging(&args) {
        eprintln!("watermark: {:#}", e);
        return ExitCode::from(1);
    }

    match run(&args) {
        Ok(outcome) => {
            println!("Watermarked image written to {}", outcome.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Watermark failed");
            eprintln!("watermark: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn setup_logging(args: &Args) -> anyhow::Result<()> {
    init_subscriber(&LoggingOptions {
        level: args.log_level.clone(),
        format: args.log_format,
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn run(args: &Args) -> Result<WatermarkOutcome, WatermarkError> {
    let spec = build_spec(args)?;
    let processor = WatermarkProcessor::new(SystemImaging::system());
    processor.process(&args.source, &spec, args.output.as_deref())
}

/// Translate command-line flags into a watermark spec.
fn build_spec(args: &Args) -> Result<WatermarkSpec, WatermarkError> {
    let spec = match (&args.text, &args.image) {
        (Some(text), _) => {
            let spec = WatermarkSpec::text(text.as_str())
                .with_font_size(args.font_size)
                .with_color(parse_color(&args.color)?);
            match &args.font {
                Some(font) => spec.with_font(font.as_str()),
                None => spec,
            }
        }
        (None, Some(image)) => {
            let scale = match (args.scale, args.width, args.height) {
                _ if args.original_size => ScalePolicy::Original,
                (Some(fraction), _, _) => ScalePolicy::RelativeToSource(fraction),
                (None, None, None) => ScalePolicy::default(),
                (None, width, height) => ScalePolicy::Exact { width, height },
            };
            WatermarkSpec::image(image.clone()).with_scale(scale)
        }
        (None, None) => {
            return Err(WatermarkError::invalid(
                "text",
                "either --text or --image is required",
            ))
        }
    };

    Ok(spec
        .with_opacity(args.opacity)
        .with_placement(args.position.parse()?)
        .with_margin(args.margin))
}
