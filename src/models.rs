//! Data models for the dashboard generator.
//!
//! This module contains the typed records returned by the operations API
//! together with the structures describing the outcome of a dashboard run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Identifier of an airport, as assigned by the operations API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirportId(pub i64);

impl fmt::Display for AirportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of `/passengers-per-airline-today/`.
///
/// The endpoint aggregates bookings server-side, so each airline normally
/// appears exactly once; the pipeline still groups by name and sums, which
/// stays correct if that ever changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlinePassengers {
    /// Display name of the airline.
    pub airline_name: String,
    /// Passengers booked on the airline's flights departing today.
    pub passengers: u64,
}

/// One row of `/income-per-flight/`.
///
/// Income is computed server-side as sold seats times base price. Fields the
/// API includes beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightIncome {
    /// Airline operating the flight.
    pub airline: String,
    /// Airport the flight departs from.
    pub origin_airport: AirportId,
    /// Income of the flight.
    pub income: f64,
    /// Flight code, when the API includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_code: Option<String>,
}

/// One row of `/api/airports/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// Identifier referenced by `FlightIncome::origin_airport`.
    pub id: AirportId,
    /// Airport name, when the API includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// City the airport serves.
    pub city: String,
    /// Country the airport is located in.
    pub country: String,
}

/// Lookup table from airport id to airport, built once per run.
#[derive(Debug, Clone, Default)]
pub struct AirportIndex {
    by_id: HashMap<AirportId, Airport>,
}

impl AirportIndex {
    /// Builds the index from the airports endpoint rows.
    ///
    /// If the API ever returned duplicate ids, the last row would win.
    pub fn from_airports(airports: Vec<Airport>) -> Self {
        let mut by_id = HashMap::with_capacity(airports.len());
        for airport in airports {
            by_id.insert(airport.id, airport);
        }
        Self { by_id }
    }

    /// Looks up an airport by id.
    pub fn get(&self, id: AirportId) -> Option<&Airport> {
        self.by_id.get(&id)
    }

    /// Number of indexed airports.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the index holds no airports at all.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// A chart produced by the renderer, as recorded for the summary page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedChart {
    /// Surface id the chart was rendered into.
    pub surface: String,
    /// Path of the written file.
    pub path: PathBuf,
    /// Chart title.
    pub title: String,
    /// Labels in render order, each with its summed value.
    pub values: Vec<(String, f64)>,
    /// Width of the rendered chart in pixels.
    pub width: u32,
    /// Height of the rendered chart in pixels.
    pub height: u32,
}

impl RenderedChart {
    /// Total of all bar values in the chart.
    pub fn total(&self) -> f64 {
        self.values.iter().map(|(_, v)| v).sum()
    }
}

/// Outcome of one dashboard pipeline (a fetch, aggregate, render task).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Human-readable pipeline name.
    pub name: String,
    /// Charts the pipeline rendered, in render order.
    pub charts: Vec<RenderedChart>,
    /// Whether the pipeline completed all of its renders.
    pub successful: bool,
    /// Error message if the pipeline aborted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineRun {
    /// Creates a run record for a pipeline that rendered all its charts.
    pub fn completed(name: &str, charts: Vec<RenderedChart>) -> Self {
        Self {
            name: name.to_string(),
            charts,
            successful: true,
            error: None,
        }
    }

    /// Creates a run record for a pipeline that aborted.
    pub fn failed(name: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            charts: Vec::new(),
            successful: false,
            error: Some(error),
        }
    }
}

/// Metadata about a dashboard run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Base URL of the operations API.
    pub api_base_url: String,
    /// Date and time the dashboard was generated.
    pub generated_at: DateTime<Utc>,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete outcome of a dashboard run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRun {
    /// Metadata about the run.
    pub metadata: RunMetadata,
    /// Per-pipeline outcomes, in launch order.
    pub pipelines: Vec<PipelineRun>,
}

impl DashboardRun {
    /// Total number of charts rendered across all pipelines.
    pub fn charts_rendered(&self) -> usize {
        self.pipelines.iter().map(|p| p.charts.len()).sum()
    }

    /// Pipelines that aborted before completing their renders.
    pub fn failed_pipelines(&self) -> Vec<&PipelineRun> {
        self.pipelines.iter().filter(|p| !p.successful).collect()
    }

    /// Whether every pipeline completed.
    pub fn is_success(&self) -> bool {
        self.pipelines.iter().all(|p| p.successful)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_id_display() {
        assert_eq!(AirportId(42).to_string(), "42");
    }

    #[test]
    fn test_airline_passengers_from_json() {
        let rows: Vec<AirlinePassengers> =
            serde_json::from_str(r#"[{"airline_name": "Sky High", "passengers": 75}]"#)
                .expect("valid payload");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].airline_name, "Sky High");
        assert_eq!(rows[0].passengers, 75);
    }

    #[test]
    fn test_flight_income_ignores_extra_fields() {
        let row: FlightIncome = serde_json::from_str(
            r#"{"airline": "Sky High", "origin_airport": 1, "income": 1500.0,
                "departure_time": "2024-05-01T10:00:00Z"}"#,
        )
        .expect("valid payload");
        assert_eq!(row.origin_airport, AirportId(1));
        assert_eq!(row.income, 1500.0);
        assert_eq!(row.flight_code, None);
    }

    #[test]
    fn test_flight_income_rejects_non_numeric_income() {
        let result: Result<FlightIncome, _> = serde_json::from_str(
            r#"{"airline": "Sky High", "origin_airport": 1, "income": "lots"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_airport_index_lookup() {
        let index = AirportIndex::from_airports(vec![
            Airport {
                id: AirportId(1),
                name: Some("JFK".to_string()),
                city: "NYC".to_string(),
                country: "USA".to_string(),
            },
            Airport {
                id: AirportId(2),
                name: None,
                city: "LA".to_string(),
                country: "USA".to_string(),
            },
        ]);

        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
        assert_eq!(index.get(AirportId(1)).map(|a| a.city.as_str()), Some("NYC"));
        assert_eq!(index.get(AirportId(3)), None);
    }

    #[test]
    fn test_pipeline_run_constructors() {
        let ok = PipelineRun::completed("passengers", Vec::new());
        assert!(ok.successful);
        assert_eq!(ok.error, None);

        let bad = PipelineRun::failed("income", "connection refused".to_string());
        assert!(!bad.successful);
        assert_eq!(bad.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_dashboard_run_counts() {
        let chart = RenderedChart {
            surface: "income-per-airline".to_string(),
            path: PathBuf::from("out/income-per-airline.png"),
            title: "Income per Airline".to_string(),
            values: vec![("Sky High".to_string(), 100.0), ("Oceanic".to_string(), 50.0)],
            width: 800,
            height: 600,
        };
        assert_eq!(chart.total(), 150.0);

        let run = DashboardRun {
            metadata: RunMetadata {
                api_base_url: "http://localhost:8000".to_string(),
                generated_at: Utc::now(),
                duration_seconds: 0.2,
            },
            pipelines: vec![
                PipelineRun::completed("income", vec![chart]),
                PipelineRun::failed("passengers", "timeout".to_string()),
            ],
        };

        assert_eq!(run.charts_rendered(), 1);
        assert_eq!(run.failed_pipelines().len(), 1);
        assert!(!run.is_success());
    }
}
