//! Named drawing surfaces.
//!
//! The dashboard renders into a fixed set of surfaces registered up front,
//! one output file per surface id. Pipelines refer to surfaces by id only;
//! where the file lands is decided here.

use crate::chart::{ChartError, OutputFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Surface id of the passengers-per-airline chart.
pub const PASSENGERS_PER_AIRLINE: &str = "passengers-per-airline-today";

/// Surface id of the income-per-airline chart.
pub const INCOME_PER_AIRLINE: &str = "income-per-airline";

/// Surface id of the income-per-airport chart.
pub const INCOME_PER_AIRPORT: &str = "income-per-airport";

/// Surface id of the income-per-city chart.
pub const INCOME_PER_CITY: &str = "income-per-city";

/// Surface id of the income-per-country chart.
pub const INCOME_PER_COUNTRY: &str = "income-per-country";

/// A registered drawing surface.
#[derive(Debug, Clone)]
pub struct Surface {
    id: String,
    title: String,
    path: PathBuf,
}

impl Surface {
    /// Id the surface was registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Title drawn above the chart.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// File the chart is written to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Registry of the surfaces a run may render into.
///
/// Rendering into an id that was never registered is an error; nothing is
/// written for that call.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMap {
    surfaces: HashMap<String, Surface>,
}

impl SurfaceMap {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a surface; the chart rendered into `id` is written to `path`.
    pub fn register(&mut self, id: &str, title: &str, path: PathBuf) {
        self.surfaces.insert(
            id.to_string(),
            Surface {
                id: id.to_string(),
                title: title.to_string(),
                path,
            },
        );
    }

    /// The five dashboard surfaces, laid out as `<out_dir>/<id>.<ext>`.
    pub fn standard(out_dir: &Path, format: OutputFormat) -> Self {
        let titles = [
            (PASSENGERS_PER_AIRLINE, "Passengers per Airline (Today)"),
            (INCOME_PER_AIRLINE, "Income per Airline"),
            (INCOME_PER_AIRPORT, "Income per Airport"),
            (INCOME_PER_CITY, "Income per City"),
            (INCOME_PER_COUNTRY, "Income per Country"),
        ];

        let mut map = Self::new();
        for (id, title) in titles {
            let path = out_dir.join(format!("{}.{}", id, format.extension()));
            map.register(id, title, path);
        }
        map
    }

    /// Resolves a surface id registered earlier.
    pub fn resolve(&self, id: &str) -> Result<&Surface, ChartError> {
        self.surfaces
            .get(id)
            .ok_or_else(|| ChartError::UnknownSurface(id.to_string()))
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether no surface is registered at all.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
