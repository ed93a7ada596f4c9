use crate::{
    Config,
    error::{FetchError, ResolveError},
    model::{Coordinates, WeatherSnapshot},
    provider::{nominatim::NominatimGeocoder, open_meteo::OpenMeteoClient},
    units::UnitSet,
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod nominatim;
pub mod open_meteo;

/// Structured address fields of a geocoding candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub state: Option<String>,
    pub region: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub coordinates: Coordinates,
    pub address: Address,
}

/// Free-text place search.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Candidates in the order the service ranks them.
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ResolveError>;
}

/// Current, daily and hourly weather for a point.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(
        &self,
        coordinates: Coordinates,
        units: UnitSet,
    ) -> Result<WeatherSnapshot, FetchError>;
}

/// HTTP client shared by both backends.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")
}

/// Construct the geocoding and weather backends described by the config.
pub fn backends_from_config(
    config: &Config,
) -> anyhow::Result<(Arc<dyn Geocoder>, Arc<dyn WeatherSource>)> {
    let http = http_client(config)?;

    let geocoder: Arc<dyn Geocoder> =
        Arc::new(NominatimGeocoder::new(http.clone(), config.endpoints.geocoding.clone()));
    let weather: Arc<dyn WeatherSource> = Arc::new(
        OpenMeteoClient::new(http, config.endpoints.weather.clone())
            .with_timezone(config.timezone.clone()),
    );

    Ok((geocoder, weather))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backends_from_default_config() {
        let cfg = Config::default();
        assert!(backends_from_config(&cfg).is_ok());
    }

    #[test]
    fn http_client_accepts_custom_agent_and_timeout() {
        let cfg = Config {
            user_agent: "dashboard-test/1.0".to_string(),
            timeout_secs: 1,
            ..Config::default()
        };
        assert!(http_client(&cfg).is_ok());
    }
}
