//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, validators, and subcommand
//! handlers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::default_path as get_config_path;

/// Parse and validate width (must be a positive integer).
pub fn parse_width(s: &str) -> Result<u32, String> {
    let width: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid width", s))?;
    if width == 0 {
        return Err("Width must be greater than 0".to_string());
    }
    Ok(width)
}

/// Convert an image from a local file or URL into ASCII art
#[derive(Parser, Debug)]
#[command(name = "imgscii")]
#[command(version, about = "Convert an image to ASCII art", long_about = None)]
#[command(after_help = "EXAMPLES:
    # From a local file
    imgscii pictures/ferris.jpg --width 80

    # From a URL, saving a copy to a file
    imgscii https://example.com/ferris.png --width 100 --output art.txt
")]
#[command(subcommand_negates_reqs = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path or URL of the input image
    #[arg(required = true)]
    pub image_source: Option<String>,

    /// Output width in characters
    #[arg(long, short, value_parser = parse_width)]
    pub width: Option<u32>,

    /// Also write the ASCII art to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

// ==================== Subcommand Handlers ====================

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction) {
    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Width: {}", crate::ascii::DEFAULT_WIDTH);
            println!(
                "  Aspect correction: {}",
                crate::ascii::DEFAULT_ASPECT_CORRECTION
            );
            println!(
                "  Fetch timeout: {}s",
                crate::source::DEFAULT_TIMEOUT.as_secs()
            );
            println!();

            let config_path = get_config_path();
            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            let config_path = get_config_path();

            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'imgscii config show' to view current settings.");
                std::process::exit(1);
            }

            if let Some(parent) = config_path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    std::process::exit(1);
                }
            }

            let default_config = r#"# imgscii configuration

[render]
# Output width in characters when --width is not given
width = 100
# Compensation for tall monospaced glyphs; lower values squash the art
aspect_correction = 0.55

[http]
# Remote fetch timeout in seconds
timeout_secs = 30
"#;

            if let Err(e) = std::fs::write(&config_path, default_config) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}
