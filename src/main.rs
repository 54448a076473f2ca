//! imgscii: convert an image from a local file or a URL into ASCII art.

use std::time::Duration;

use clap::Parser;

use imgscii::ascii::{self, RenderOptions};
use imgscii::cli::{handle_config_action, Args, Command};
use imgscii::config::Config;
use imgscii::sink;
use imgscii::source::{self, Fetcher, ImageSource};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match args.command {
        Some(Command::Config { action }) => handle_config_action(action),
        None => {
            if let Err(e) = run(args).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Load config file
    // If --config is specified, require the file to exist
    // Otherwise, fall back to defaults if the default config is not found
    let cfg = Config::load(args.config.as_deref())?;

    // Merge settings: CLI args > config file > built-in defaults
    let width = args
        .width
        .or(cfg.render.width)
        .unwrap_or(ascii::DEFAULT_WIDTH);
    let aspect_correction = cfg
        .render
        .aspect_correction
        .unwrap_or(ascii::DEFAULT_ASPECT_CORRECTION);
    let timeout = cfg
        .http
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(source::DEFAULT_TIMEOUT);

    let raw = match args.image_source {
        Some(raw) => raw,
        // Unreachable through clap (the positional is required without a
        // subcommand), but keep the run fallible instead of panicking.
        None => return Err("an image source is required".into()),
    };

    let image_source = ImageSource::parse(&raw);
    log::debug!("resolved image source: {}", image_source);

    let fetcher = Fetcher::with_timeout(timeout)?;
    let image = fetcher.load(&image_source).await?;

    let art = ascii::convert(
        &image,
        &RenderOptions {
            width,
            aspect_correction,
        },
    );

    sink::emit(&art, args.output.as_deref())?;

    if let Some(path) = args.output {
        eprintln!("Saved ASCII art to '{}'", path.display());
    }

    Ok(())
}
