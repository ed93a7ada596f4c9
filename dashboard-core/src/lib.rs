//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Weather code classification and unit preferences
//! - Location resolution and weather fetching behind provider traits
//! - Projection of forecasts onto an abstract view surface
//! - The dashboard controller that owns session state
//! - Configuration handling
//!
//! It is used by `dashboard-cli`, but any host that implements [`ViewSurface`]
//! can drive a [`DashboardController`].

pub mod condition;
pub mod config;
pub mod controller;
pub mod error;
pub mod location;
pub mod model;
pub mod projector;
pub mod provider;
pub mod units;
pub mod view;

pub use condition::WeatherCategory;
pub use config::{Config, Endpoints};
pub use controller::{DashboardController, DashboardState, Outcome, Session};
pub use error::{BoundsError, DashboardError, FetchError, ResolveError};
pub use location::LocationResolver;
pub use model::{Coordinates, Place, ResolvedLocation, WeatherSnapshot};
pub use provider::{Geocoder, WeatherSource};
pub use units::{UnitPreference, UnitSet};
pub use view::{MemorySurface, Region, ViewSurface};

/// Build a controller wired to the backends named in `config`.
pub fn controller_from_config<V: ViewSurface>(
    config: &Config,
    surface: V,
) -> anyhow::Result<DashboardController<V>> {
    let (geocoder, weather) = provider::backends_from_config(config)?;
    let resolver = LocationResolver::new(geocoder, config.default_location.clone());
    Ok(DashboardController::new(resolver, weather, config.units, surface))
}
