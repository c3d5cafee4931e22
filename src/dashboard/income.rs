//! Income-per-flight pipeline.
//!
//! Fetches flight incomes and airports concurrently, joins them, and renders
//! four charts over the same rows: income by airline, by origin airport, by
//! city, and by country. City and country are derived through the airport
//! index; a flight referencing an unknown airport aborts the pipeline before
//! any of its charts is written.

use crate::analysis::{group_by, Grouping, KeySelector};
use crate::api::ApiClient;
use crate::chart::{render_bar_chart, surface, BarChartStyle, SurfaceMap};
use crate::dashboard::progress_spinner;
use crate::models::{AirportIndex, FlightIncome, RenderedChart};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fetches income and airport data and renders the four income charts.
pub async fn income_per_flight_pipeline(
    client: &ApiClient,
    surfaces: &SurfaceMap,
    style: &BarChartStyle,
    show_progress: bool,
) -> Result<Vec<RenderedChart>> {
    let spinner = progress_spinner(show_progress, "Fetching income and airports...");

    // Both responses are needed before any aggregation; fetch them together
    // and fail the pipeline on the first error.
    let (flights, airports) = tokio::try_join!(client.income_per_flight(), client.airports())
        .context("Fetching income data failed")?;
    info!(
        "Fetched {} flight income rows and {} airports",
        flights.len(),
        airports.len()
    );

    let index = Arc::new(AirportIndex::from_airports(airports));
    if index.is_empty() && !flights.is_empty() {
        warn!("Airports endpoint returned no rows; city and country lookups will fail");
    }

    // Every grouping must succeed before the first chart is written
    let groupings = income_groupings(&flights, &index)?;

    let mut charts = Vec::with_capacity(groupings.len());
    for (surface_id, grouping) in &groupings {
        let chart = render_bar_chart(surfaces.resolve(surface_id)?, grouping, |f| f.income, style)?;
        info!("Income chart rendered to {}", chart.path.display());
        charts.push(chart);
    }

    if let Some(pb) = spinner {
        pb.finish_with_message(format!("Rendered {} income charts", charts.len()));
    }

    Ok(charts)
}

/// Produces the four income groupings, paired with their target surfaces.
///
/// Fails on the first selector whose key derivation fails; callers see
/// either all four groupings or none.
fn income_groupings(
    flights: &[FlightIncome],
    index: &Arc<AirportIndex>,
) -> Result<Vec<(&'static str, Grouping<FlightIncome>)>> {
    let selectors = [
        (surface::INCOME_PER_AIRLINE, airline_selector()),
        (surface::INCOME_PER_AIRPORT, airport_selector()),
        (surface::INCOME_PER_CITY, city_selector(index)),
        (surface::INCOME_PER_COUNTRY, country_selector(index)),
    ];

    let mut groupings = Vec::with_capacity(selectors.len());
    for (surface_id, selector) in selectors {
        let grouping = group_by(flights, &selector)
            .with_context(|| format!("Grouping flights by {} failed", selector.name()))?;
        debug!(
            "Grouped {} flights into {} {} groups",
            flights.len(),
            grouping.len(),
            selector.name()
        );
        groupings.push((surface_id, grouping));
    }

    Ok(groupings)
}

fn airline_selector() -> KeySelector<FlightIncome> {
    KeySelector::field("airline", |f: &FlightIncome| f.airline.clone())
}

/// Labels are the raw airport ids, as the API reports them.
fn airport_selector() -> KeySelector<FlightIncome> {
    KeySelector::field("origin_airport", |f: &FlightIncome| {
        f.origin_airport.to_string()
    })
}

fn city_selector(index: &Arc<AirportIndex>) -> KeySelector<FlightIncome> {
    let index = Arc::clone(index);
    KeySelector::derive("city", move |f: &FlightIncome| {
        index
            .get(f.origin_airport)
            .map(|a| a.city.clone())
            .ok_or_else(|| format!("unknown airport id {}", f.origin_airport))
    })
}

fn country_selector(index: &Arc<AirportIndex>) -> KeySelector<FlightIncome> {
    let index = Arc::clone(index);
    KeySelector::derive("country", move |f: &FlightIncome| {
        index
            .get(f.origin_airport)
            .map(|a| a.country.clone())
            .ok_or_else(|| format!("unknown airport id {}", f.origin_airport))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sum_by;
    use crate::models::{Airport, AirportId};

    fn airport(id: i64, city: &str, country: &str) -> Airport {
        Airport {
            id: AirportId(id),
            name: None,
            city: city.to_string(),
            country: country.to_string(),
        }
    }

    fn flight(airline: &str, origin: i64, income: f64) -> FlightIncome {
        FlightIncome {
            airline: airline.to_string(),
            origin_airport: AirportId(origin),
            income,
            flight_code: None,
        }
    }

    fn sample_index() -> Arc<AirportIndex> {
        Arc::new(AirportIndex::from_airports(vec![
            airport(1, "NYC", "USA"),
            airport(2, "LA", "USA"),
        ]))
    }

    #[test]
    fn test_city_grouping_sums_income_per_city() {
        let flights = vec![
            flight("Sky High", 1, 100.0),
            flight("Oceanic", 2, 50.0),
            flight("Sky High", 1, 25.0),
        ];

        let grouping = group_by(&flights, &city_selector(&sample_index())).unwrap();

        assert_eq!(grouping.keys(), &["NYC", "LA"]);
        assert_eq!(sum_by(grouping.group("NYC").unwrap(), |f| f.income), 125.0);
        assert_eq!(sum_by(grouping.group("LA").unwrap(), |f| f.income), 50.0);
    }

    #[test]
    fn test_country_grouping_merges_cities() {
        let flights = vec![flight("Sky High", 1, 100.0), flight("Oceanic", 2, 50.0)];

        let grouping = group_by(&flights, &country_selector(&sample_index())).unwrap();

        assert_eq!(grouping.keys(), &["USA"]);
        assert_eq!(sum_by(grouping.group("USA").unwrap(), |f| f.income), 150.0);
    }

    #[test]
    fn test_unknown_airport_fails_derived_grouping() {
        let flights = vec![flight("Sky High", 1, 100.0), flight("Ghost Air", 9, 50.0)];

        let err = group_by(&flights, &city_selector(&sample_index())).unwrap_err();
        assert!(err.to_string().contains("unknown airport id 9"));
    }

    #[test]
    fn test_income_groupings_cover_all_four_surfaces_in_order() {
        let flights = vec![flight("Sky High", 1, 100.0), flight("Oceanic", 2, 50.0)];

        let groupings = income_groupings(&flights, &sample_index()).unwrap();

        let surfaces: Vec<&str> = groupings.iter().map(|(id, _)| *id).collect();
        assert_eq!(
            surfaces,
            vec![
                surface::INCOME_PER_AIRLINE,
                surface::INCOME_PER_AIRPORT,
                surface::INCOME_PER_CITY,
                surface::INCOME_PER_COUNTRY,
            ]
        );
    }

    #[test]
    fn test_income_groupings_all_or_nothing_on_unknown_airport() {
        let flights = vec![flight("Sky High", 1, 100.0), flight("Ghost Air", 9, 50.0)];

        let err = income_groupings(&flights, &sample_index()).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("Grouping flights by city failed"));
        assert!(chain.contains("unknown airport id 9"));
    }

    #[test]
    fn test_airport_labels_are_raw_ids() {
        let flights = vec![flight("Sky High", 2, 100.0), flight("Oceanic", 1, 50.0)];

        let grouping = group_by(&flights, &airport_selector()).unwrap();
        assert_eq!(grouping.keys(), &["2", "1"]);
    }
}
