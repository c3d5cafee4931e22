//! Dashboard pipelines.
//!
//! Each pipeline is one independent fetch, aggregate, render task. The
//! entry point launches both and joins them; one failing never stops the
//! other, and neither waits on the other's progress.

pub mod income;
pub mod passengers;

pub use income::income_per_flight_pipeline;
pub use passengers::passengers_per_airline_pipeline;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Pipeline display name used in logs and the summary page.
pub const PASSENGERS_PIPELINE: &str = "passengers per airline";

/// Pipeline display name used in logs and the summary page.
pub const INCOME_PIPELINE: &str = "income per flight";

/// Create a progress spinner when progress display is enabled.
pub(crate) fn progress_spinner(show_progress: bool, message: &str) -> Option<ProgressBar> {
    if !show_progress {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}
