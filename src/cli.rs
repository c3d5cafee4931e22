//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::chart::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Flightboard - bar chart dashboard generator for airline operations APIs
///
/// Fetches statistics from the operations REST API, aggregates them in
/// memory, and renders bar charts plus a Markdown summary page.
///
/// Examples:
///   flightboard --api-url http://localhost:8000
///   flightboard --api-url http://localhost:8000 --out-dir charts --format svg
///   flightboard --verbose --timeout 10
///   flightboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the operations API
    ///
    /// Can also be set via FLIGHTBOARD_API_URL env var or .flightboard.toml.
    /// Defaults to http://localhost:8000.
    #[arg(short, long, value_name = "URL", env = "FLIGHTBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Directory rendered charts and the summary page are written to
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Output format for charts (png, svg)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Chart width in pixels
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Chart height in pixels
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Request timeout in seconds
    ///
    /// How long to wait for each API response. Default: from config or 30s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .flightboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip writing the Markdown summary page
    #[arg(long)]
    pub no_summary: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .flightboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate API URL format if provided
        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Validate chart dimensions if provided
        if self.width == Some(0) {
            return Err("Chart width must be at least 1 pixel".to_string());
        }
        if self.height == Some(0) {
            return Err("Chart height must be at least 1 pixel".to_string());
        }

        // Validate timeout if provided
        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
