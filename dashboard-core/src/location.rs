//! Free-text search → resolved place.

use std::sync::Arc;

use crate::{
    error::ResolveError,
    model::{Place, ResolvedLocation},
    provider::{Address, Geocoder},
};

pub const DEFAULT_LOCATION: &str = "Berlin, Germany";

#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    default_query: String,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, default_query: impl Into<String>) -> Self {
        Self {
            geocoder,
            default_query: default_query.into(),
        }
    }

    /// The query actually sent: trimmed input, or the default location when blank.
    pub fn effective_query<'a>(&'a self, query: &'a str) -> &'a str {
        let trimmed = query.trim();
        if trimmed.is_empty() { self.default_query.trim() } else { trimmed }
    }

    pub async fn resolve(&self, query: &str) -> Result<ResolvedLocation, ResolveError> {
        let query = self.effective_query(query);

        let first = self
            .geocoder
            .search(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::NoResults(query.to_string()))?;

        let place = place_from_address(&first.address)?;
        tracing::info!(query, place = %place.label(), "Resolved location");

        Ok(ResolvedLocation {
            coordinates: first.coordinates,
            place,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// City label falls back city → town → state → region.
pub fn place_from_address(address: &Address) -> Result<Place, ResolveError> {
    let city = non_blank(&address.city)
        .or_else(|| non_blank(&address.town))
        .or_else(|| non_blank(&address.state))
        .or_else(|| non_blank(&address.region))
        .ok_or(ResolveError::NoCityLabel)?;

    let country = non_blank(&address.country_code).ok_or(ResolveError::NoCountryCode)?;

    Ok(Place {
        display_city: city.to_string(),
        country_code: country.to_uppercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;
    use crate::provider::GeocodeCandidate;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct FakeGeocoder {
        candidates: Vec<GeocodeCandidate>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ResolveError> {
            self.queries.lock().push(query.to_string());
            Ok(self.candidates.clone())
        }
    }

    fn candidate(lat: f64, address: Address) -> GeocodeCandidate {
        GeocodeCandidate {
            coordinates: Coordinates { latitude: lat, longitude: 13.4 },
            address,
        }
    }

    fn berlin() -> Address {
        Address {
            city: Some("Berlin".into()),
            state: Some("Berlin".into()),
            country_code: Some("de".into()),
            ..Address::default()
        }
    }

    #[tokio::test]
    async fn resolves_first_candidate() {
        let geocoder = Arc::new(FakeGeocoder {
            candidates: vec![
                candidate(52.5, berlin()),
                candidate(39.7, Address {
                    town: Some("Berlin".into()),
                    country_code: Some("us".into()),
                    ..Address::default()
                }),
            ],
            ..FakeGeocoder::default()
        });
        let resolver = LocationResolver::new(geocoder.clone(), DEFAULT_LOCATION);

        let resolved = resolver.resolve("Berlin, Germany").await.unwrap();

        assert_eq!(resolved.place, Place {
            display_city: "Berlin".into(),
            country_code: "DE".into()
        });
        assert_eq!(resolved.coordinates.latitude, 52.5);
        assert_eq!(geocoder.queries.lock().as_slice(), ["Berlin, Germany"]);
    }

    #[tokio::test]
    async fn blank_query_uses_default_location() {
        let geocoder = Arc::new(FakeGeocoder {
            candidates: vec![candidate(48.1, Address {
                city: Some("München".into()),
                country_code: Some("de".into()),
                ..Address::default()
            })],
            ..FakeGeocoder::default()
        });
        let resolver = LocationResolver::new(geocoder.clone(), "Munich, Germany");

        resolver.resolve("   ").await.unwrap();
        resolver.resolve("  Paris ").await.unwrap();

        assert_eq!(geocoder.queries.lock().as_slice(), ["Munich, Germany", "Paris"]);
    }

    #[tokio::test]
    async fn empty_candidate_list_is_no_results() {
        let resolver = LocationResolver::new(Arc::new(FakeGeocoder::default()), DEFAULT_LOCATION);
        let err = resolver.resolve("Atlantis").await.unwrap_err();
        assert!(matches!(err, ResolveError::NoResults(q) if q == "Atlantis"));
    }

    #[test]
    fn label_falls_back_to_town_then_state_then_region() {
        let town = Address {
            town: Some("Zermatt".into()),
            state: Some("Valais".into()),
            country_code: Some("ch".into()),
            ..Address::default()
        };
        assert_eq!(place_from_address(&town).unwrap().display_city, "Zermatt");

        let state = Address {
            city: Some("  ".into()),
            state: Some("Bavaria".into()),
            country_code: Some("de".into()),
            ..Address::default()
        };
        assert_eq!(place_from_address(&state).unwrap().display_city, "Bavaria");

        let region = Address {
            region: Some("Lapland".into()),
            country_code: Some("fi".into()),
            ..Address::default()
        };
        let place = place_from_address(&region).unwrap();
        assert_eq!(place.display_city, "Lapland");
        assert_eq!(place.country_code, "FI");
    }

    #[test]
    fn missing_labels_are_errors() {
        let no_city = Address {
            country_code: Some("de".into()),
            ..Address::default()
        };
        assert!(matches!(place_from_address(&no_city), Err(ResolveError::NoCityLabel)));

        let no_country = Address {
            city: Some("Berlin".into()),
            ..Address::default()
        };
        assert!(matches!(place_from_address(&no_country), Err(ResolveError::NoCountryCode)));
    }
}
