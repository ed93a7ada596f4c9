use reqwest::StatusCode;
use thiserror::Error;

/// Failures while turning a search query into a place.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Geocoding request failed")]
    Network(#[from] reqwest::Error),

    #[error("Geocoding service responded with status {0}")]
    Http(StatusCode),

    #[error("No place matches '{0}'")]
    NoResults(String),

    #[error("Address has no city, town or region name")]
    NoCityLabel,

    #[error("Address has no country code")]
    NoCountryCode,

    #[error("Malformed geocoding response: {0}")]
    MalformedResponse(String),
}

/// Failures while retrieving a weather snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Weather request failed")]
    Network(#[from] reqwest::Error),

    #[error("Weather service responded with status {0}")]
    Http(StatusCode),

    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),
}

/// A day index that does not select a full 24-hour slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Day index {index} is out of range ({available_hours} hourly entries available)")]
pub struct BoundsError {
    pub index: i64,
    pub available_hours: usize,
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Bounds(#[from] BoundsError),

    #[error("No forecast has been loaded yet")]
    NotReady,
}

/// Shorten a response body for log output.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
