//! Bar chart rendering.
//!
//! Charts are rendered into named surfaces: each surface id maps to an
//! output file, and a render call that names an unregistered id fails
//! before anything is written.

pub mod renderer;
pub mod surface;

pub use renderer::{render_bar_chart, BarChartStyle};
pub use surface::{Surface, SurfaceMap};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Errors that can occur while rendering a chart.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("No surface registered under id '{0}'")]
    UnknownSurface(String),

    #[error("Failed to draw chart for surface '{surface}': {reason}")]
    Draw { surface: String, reason: String },

    #[error("Failed to encode chart for surface '{surface}': {source}")]
    Encode {
        surface: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write chart to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output format of rendered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum OutputFormat {
    /// PNG raster image (default)
    #[serde(rename = "png")]
    #[default]
    Png,
    /// SVG vector image
    #[serde(rename = "svg")]
    Svg,
}

impl OutputFormat {
    /// File extension used for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}
