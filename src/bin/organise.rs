use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tidymark::logging::{init_subscriber, LogFormat, LoggingOptions};
use tidymark::organiser::{CollisionPolicy, OrganiseOptions, Organiser, OrganiserConfig};

/// Sort the files of a directory into category folders by extension
#[derive(Parser, Debug)]
#[command(name = "organise")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory to organise (defaults to the current directory)
    directory: Option<PathBuf>,

    /// What to do when the destination file already exists
    #[arg(long, value_enum)]
    on_collision: Option<CollisionPolicy>,

    /// Show what would be moved without touching anything
    #[arg(long)]
    dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// YAML file with extra extension mappings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `tidymark=trace`
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Organise failed");
            eprintln!("organise: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    init_subscriber(&LoggingOptions {
        level: args.log_level.clone(),
        format: args.log_format,
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = match &args.config {
        Some(path) => OrganiserConfig::from_file(path)?,
        None => OrganiserConfig::default(),
    };

    let directory = match &args.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };

    let options = OrganiseOptions {
        collision_policy: args
            .on_collision
            .or(config.on_collision)
            .unwrap_or_default(),
        dry_run: args.dry_run,
    };

    tracing::debug!(
        directory = %directory.display(),
        policy = ?options.collision_policy,
        dry_run = options.dry_run,
        config = ?args.config,
        "Starting organise"
    );

    let report = Organiser::new(config.extension_map(), options).organise(&directory)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    Ok(())
}
