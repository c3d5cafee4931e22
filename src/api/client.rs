//! HTTP client for the operations API.
//!
//! One client is built per run and shared by both pipelines; it carries the
//! base URL and the request timeout. Responses are decoded straight into the
//! typed records from `models`.

use crate::api::{ApiError, AIRPORTS, INCOME_PER_FLIGHT, PASSENGERS_PER_AIRLINE_TODAY};
use crate::models::{AirlinePassengers, Airport, FlightIncome};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Client for the airline operations REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    timeout_seconds: u64,
    http_client: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the API at `base_url`.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_seconds,
            http_client,
        }
    }

    /// Base URL the client talks to (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Today's booked passengers per airline.
    pub async fn passengers_per_airline_today(&self) -> Result<Vec<AirlinePassengers>, ApiError> {
        self.get_json(PASSENGERS_PER_AIRLINE_TODAY).await
    }

    /// Income of every flight.
    pub async fn income_per_flight(&self) -> Result<Vec<FlightIncome>, ApiError> {
        self.get_json(INCOME_PER_FLIGHT).await
    }

    /// All airports known to the API.
    pub async fn airports(&self) -> Result<Vec<Airport>, ApiError> {
        self.get_json(AIRPORTS).await
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a GET request and decodes the JSON array body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint_url(path);
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    url: url.clone(),
                    seconds: self.timeout_seconds,
                }
            } else if e.is_connect() {
                ApiError::Connect { url: url.clone() }
            } else {
                ApiError::Request {
                    url: url.clone(),
                    source: e,
                }
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { url, status, body });
        }

        let rows = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| ApiError::Decode { url, source: e })?;

        Ok(rows)
    }
}
