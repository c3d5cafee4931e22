//! Passengers-per-airline pipeline.
//!
//! One fetch of today's per-airline passenger totals, grouped by airline
//! name and rendered into the passengers surface.

use crate::analysis::{group_by, KeySelector};
use crate::api::ApiClient;
use crate::chart::{render_bar_chart, surface, BarChartStyle, SurfaceMap};
use crate::dashboard::progress_spinner;
use crate::models::{AirlinePassengers, RenderedChart};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Fetches today's passenger totals and renders the passengers chart.
pub async fn passengers_per_airline_pipeline(
    client: &ApiClient,
    surfaces: &SurfaceMap,
    style: &BarChartStyle,
    show_progress: bool,
) -> Result<Vec<RenderedChart>> {
    let spinner = progress_spinner(show_progress, "Fetching passengers per airline...");

    let rows = client
        .passengers_per_airline_today()
        .await
        .context("Fetching passengers per airline failed")?;
    info!("Fetched {} passenger rows", rows.len());

    // Rows arrive aggregated server-side, one per airline; grouping by name
    // keeps the output correct even if that ever changes.
    let grouping = group_by(&rows, &airline_selector())?;
    debug!("Grouped into {} airlines", grouping.len());

    let chart = render_bar_chart(
        surfaces.resolve(surface::PASSENGERS_PER_AIRLINE)?,
        &grouping,
        |r| r.passengers as f64,
        style,
    )?;

    if let Some(pb) = spinner {
        pb.finish_with_message(format!("Rendered {}", chart.path.display()));
    }
    info!(
        "Passengers chart rendered to {} ({} airlines)",
        chart.path.display(),
        chart.values.len()
    );

    Ok(vec![chart])
}

fn airline_selector() -> KeySelector<AirlinePassengers> {
    KeySelector::field("airline_name", |r: &AirlinePassengers| {
        r.airline_name.clone()
    })
}
