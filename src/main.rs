//! Flightboard - airline operations dashboard generator
//!
//! A CLI tool that fetches statistics from an airline operations REST API,
//! aggregates them in memory, and renders bar charts plus a Markdown
//! summary page.
//!
//! Exit codes:
//!   0 - Success (all charts rendered)
//!   1 - One or more pipelines failed
//!   2 - Startup error (bad arguments or configuration)

mod analysis;
mod api;
mod chart;
mod cli;
mod config;
mod dashboard;
mod models;
mod report;

use anyhow::{Context, Result};
use api::ApiClient;
use chart::SurfaceMap;
use chrono::Utc;
use cli::Args;
use config::Config;
use models::{DashboardRun, PipelineRun, RenderedChart, RunMetadata};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Flightboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the dashboard
    match run_dashboard(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Handle --init-config: generate a default .flightboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".flightboard.toml");

    if path.exists() {
        eprintln!("⚠️  .flightboard.toml already exists. Remove it first or edit it manually.");
        std::process::exit(2);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .flightboard.toml")?;

    println!("✅ Created .flightboard.toml with default settings.");
    println!("   Edit it to customize the API URL, output directory, and chart style.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete dashboard workflow. Returns exit code (0 or 1).
async fn run_dashboard(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Config file values get the same range checks as the CLI flags
    config.validate().map_err(anyhow::Error::msg)?;

    let style = config.chart_style()?;

    // Step 1: Prepare the output directory and surfaces
    let out_dir = PathBuf::from(&config.output.dir);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    let surfaces = SurfaceMap::standard(&out_dir, config.output.format);

    let client = ApiClient::new(&config.api.base_url, config.api.timeout_seconds);

    println!("📡 Operations API: {}", client.base_url());
    println!(
        "   Output: {} ({}, {}x{})",
        out_dir.display(),
        config.output.format.extension(),
        style.width,
        style.height
    );
    println!("   Timeout: {}s", config.api.timeout_seconds);

    // Step 2: Run both pipelines
    println!("\n📊 Generating dashboard charts...\n");

    let show_progress = !args.quiet;

    // Both run to completion regardless of the other's outcome; neither
    // waits on the other's progress.
    let (passengers, income) = futures::future::join(
        dashboard::passengers_per_airline_pipeline(&client, &surfaces, &style, show_progress),
        dashboard::income_per_flight_pipeline(&client, &surfaces, &style, show_progress),
    )
    .await;

    let pipelines = vec![
        pipeline_run(dashboard::PASSENGERS_PIPELINE, passengers),
        pipeline_run(dashboard::INCOME_PIPELINE, income),
    ];

    let duration = start_time.elapsed().as_secs_f64();
    let run = DashboardRun {
        metadata: RunMetadata {
            api_base_url: client.base_url().to_string(),
            generated_at: Utc::now(),
            duration_seconds: duration,
        },
        pipelines,
    };

    // Step 3: Write the summary page
    if config.output.summary {
        let summary_path = out_dir.join("dashboard.md");
        report::write_summary(&run, &summary_path)
            .with_context(|| format!("Failed to write summary to {}", summary_path.display()))?;
        info!("Summary written to {}", summary_path.display());
    }

    // Print summary
    println!("\n📊 Dashboard Summary:");
    println!("   Charts rendered: {}", run.charts_rendered());
    for pipeline in &run.pipelines {
        if pipeline.successful {
            println!("   ✅ {}: {} chart(s)", pipeline.name, pipeline.charts.len());
        } else {
            println!(
                "   ❌ {}: {}",
                pipeline.name,
                pipeline.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!("   Duration: {:.1}s", duration);

    if run.is_success() {
        println!(
            "\n✅ Dashboard complete! Charts saved to: {}",
            out_dir.display()
        );
        Ok(0)
    } else {
        eprintln!(
            "\n⛔ {} pipeline(s) failed. See log output above.",
            run.failed_pipelines().len()
        );
        Ok(1)
    }
}

/// Convert a pipeline result into its run record, logging failures loudly.
fn pipeline_run(name: &str, result: Result<Vec<RenderedChart>>) -> PipelineRun {
    match result {
        Ok(charts) => PipelineRun::completed(name, charts),
        Err(e) => {
            error!("Pipeline '{}' failed: {:#}", name, e);
            PipelineRun::failed(name, format!("{:#}", e))
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .flightboard.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
