use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{ResolveError, truncate_body},
    model::Coordinates,
    provider::{Address, GeocodeCandidate},
};

use super::Geocoder;

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Forward geocoding through the OpenStreetMap Nominatim search API.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    url: String,
}

impl NominatimGeocoder {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }
}

#[derive(Debug, Deserialize)]
struct NmPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    address: NmAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NmAddress {
    city: Option<String>,
    town: Option<String>,
    state: Option<String>,
    region: Option<String>,
    country_code: Option<String>,
}

impl NmPlace {
    fn into_candidate(self) -> Result<GeocodeCandidate, ResolveError> {
        let latitude = parse_coordinate("lat", &self.lat)?;
        let longitude = parse_coordinate("lon", &self.lon)?;

        Ok(GeocodeCandidate {
            coordinates: Coordinates { latitude, longitude },
            address: Address {
                city: self.address.city,
                town: self.address.town,
                state: self.address.state,
                region: self.address.region,
                country_code: self.address.country_code,
            },
        })
    }
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, ResolveError> {
    raw.trim().parse::<f64>().map_err(|_| {
        ResolveError::MalformedResponse(format!("'{field}' is not a number: {raw:?}"))
    })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ResolveError> {
        tracing::debug!(query, "Geocoding");

        let res = self
            .http
            .get(&self.url)
            .query(&[("q", query), ("format", "jsonv2"), ("addressdetails", "1")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "Geocoding request failed");
            return Err(ResolveError::Http(status));
        }

        let parsed: Vec<NmPlace> = serde_json::from_str(&body)
            .map_err(|e| ResolveError::MalformedResponse(e.to_string()))?;

        let mut places = parsed.into_iter();
        let Some(first) = places.next() else {
            return Ok(Vec::new());
        };

        // Only the top hit is used downstream; unusable alternatives are skipped.
        let mut candidates = vec![first.into_candidate()?];
        for (rank, place) in places.enumerate() {
            match place.into_candidate() {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => tracing::debug!(rank = rank + 1, error = %e, "Skipping geocoding result"),
            }
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer) -> NominatimGeocoder {
        NominatimGeocoder::new(Client::new(), format!("{}/search", server.uri()))
    }

    #[tokio::test]
    async fn search_parses_candidates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Berlin, Germany"))
            .and(query_param("format", "jsonv2"))
            .and(query_param("addressdetails", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "lat": "52.5170365",
                    "lon": "13.3888599",
                    "display_name": "Berlin, Deutschland",
                    "address": { "city": "Berlin", "state": "Berlin", "country_code": "de" }
                },
                {
                    "lat": "39.7",
                    "lon": "-75.0",
                    "address": { "town": "Berlin", "country_code": "us" }
                }
            ])))
            .mount(&server)
            .await;

        let candidates = geocoder(&server).search("Berlin, Germany").await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert!((candidates[0].coordinates.latitude - 52.5170365).abs() < 1e-9);
        assert!((candidates[0].coordinates.longitude - 13.3888599).abs() < 1e-9);
        assert_eq!(candidates[0].address.city.as_deref(), Some("Berlin"));
        assert_eq!(candidates[0].address.country_code.as_deref(), Some("de"));
        assert_eq!(candidates[1].address.town.as_deref(), Some("Berlin"));
    }

    #[tokio::test]
    async fn search_returns_empty_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let candidates = geocoder(&server).search("Atlantis").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = geocoder(&server).search("Berlin").await.unwrap_err();
        assert!(matches!(err, ResolveError::Http(StatusCode::SERVICE_UNAVAILABLE)));
    }

    #[tokio::test]
    async fn bad_coordinates_are_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": "north", "lon": "13.4", "address": { "city": "Berlin" } }
            ])))
            .mount(&server)
            .await;

        let err = geocoder(&server).search("Berlin").await.unwrap_err();
        assert!(matches!(err, ResolveError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn broken_alternative_result_is_skipped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "lat": "52.52",
                    "lon": "13.41",
                    "address": { "city": "Berlin", "country_code": "de" }
                },
                { "lat": "", "lon": "9.99", "address": { "city": "Berlin" } },
                {
                    "lat": "39.7",
                    "lon": "-75.0",
                    "address": { "town": "Berlin", "country_code": "us" }
                }
            ])))
            .mount(&server)
            .await;

        let candidates = geocoder(&server).search("Berlin").await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].address.city.as_deref(), Some("Berlin"));
        assert_eq!(candidates[1].address.country_code.as_deref(), Some("us"));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = geocoder(&server).search("Berlin").await.unwrap_err();
        assert!(matches!(err, ResolveError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        let geocoder = NominatimGeocoder::new(Client::new(), "http://127.0.0.1:1/search");
        let err = geocoder.search("Berlin").await.unwrap_err();
        assert!(matches!(err, ResolveError::Network(_)));
    }
}
