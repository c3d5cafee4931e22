//! Operations API access.
//!
//! The dashboard consumes three read-only JSON endpoints of the airline
//! operations API; this module holds their paths, the error type, and the
//! client that fetches them.

pub mod client;

pub use client::ApiClient;

/// Path of the passengers-per-airline endpoint (today's departures).
pub const PASSENGERS_PER_AIRLINE_TODAY: &str = "/passengers-per-airline-today/";

/// Path of the per-flight income endpoint.
pub const INCOME_PER_FLIGHT: &str = "/income-per-flight/";

/// Path of the airports listing endpoint.
pub const AIRPORTS: &str = "/api/airports/";

/// Errors that can occur while talking to the operations API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Cannot connect to the operations API at {url}")]
    Connect { url: String },

    #[error("Request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("API error {status} from {url}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
