//! Session state and the search → fetch → render pipeline.
//!
//! Network actions (search, unit change) each take a fresh generation under
//! the session lock. Results are applied only while that generation is still
//! the latest one; anything older is dropped.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    error::DashboardError,
    location::LocationResolver,
    model::{ResolvedLocation, WeatherSnapshot},
    projector::{self, DashboardView},
    provider::WeatherSource,
    units::UnitPreference,
    view::ViewSurface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Idle,
    ResolvingLocation,
    FetchingWeather,
    Ready,
    Error,
}

/// What became of a network action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Results were applied to the session and the surface.
    Applied,
    /// A newer action started first; results were discarded.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Units of the snapshot on screen.
    pub units: UnitPreference,
    pub last_query: String,
    pub location: Option<ResolvedLocation>,
    pub snapshot: Option<WeatherSnapshot>,
    pub selected_day: usize,
}

#[derive(Debug)]
struct Inner<V> {
    state: DashboardState,
    generation: u64,
    /// Preference the next fetch uses; reaches `session.units` on apply.
    units: UnitPreference,
    /// A search owns the current generation.
    searching: bool,
    session: Session,
    surface: V,
}

impl<V> Inner<V> {
    fn begin(&mut self, state: DashboardState) -> u64 {
        self.generation += 1;
        self.state = state;
        self.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[derive(Debug)]
pub struct DashboardController<V> {
    resolver: LocationResolver,
    weather: Arc<dyn WeatherSource>,
    inner: Mutex<Inner<V>>,
}

impl<V: ViewSurface> DashboardController<V> {
    pub fn new(
        resolver: LocationResolver,
        weather: Arc<dyn WeatherSource>,
        units: UnitPreference,
        surface: V,
    ) -> Self {
        Self {
            resolver,
            weather,
            inner: Mutex::new(Inner {
                state: DashboardState::Idle,
                generation: 0,
                units,
                searching: false,
                session: Session {
                    units,
                    last_query: String::new(),
                    location: None,
                    snapshot: None,
                    selected_day: 0,
                },
                surface,
            }),
        }
    }

    pub fn state(&self) -> DashboardState {
        self.inner.lock().state
    }

    pub fn session(&self) -> Session {
        self.inner.lock().session.clone()
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.inner.lock().surface)
    }

    /// Initial load for the default location.
    pub async fn load_default(&self) -> Result<Outcome, DashboardError> {
        self.search("").await
    }

    /// Resolve `query` (blank means the default location), fetch and render.
    pub async fn search(&self, query: &str) -> Result<Outcome, DashboardError> {
        let generation = {
            let mut inner = self.inner.lock();
            inner.session.last_query = query.to_string();
            inner.searching = true;
            inner.begin(DashboardState::ResolvingLocation)
        };

        let resolved = self.resolver.resolve(query).await;

        let (location, units) = {
            let mut inner = self.inner.lock();
            if !inner.is_current(generation) {
                tracing::debug!(generation, "Dropping superseded geocoding result");
                return Ok(Outcome::Superseded);
            }
            match resolved {
                Ok(location) => {
                    inner.state = DashboardState::FetchingWeather;
                    (location, inner.units)
                }
                Err(e) => {
                    inner.state = DashboardState::Error;
                    inner.searching = false;
                    tracing::warn!(error = %e, query, "Location lookup failed");
                    return Err(e.into());
                }
            }
        };

        self.fetch_and_apply(generation, location, units).await
    }

    /// Switch unit system and refetch for the current coordinates.
    ///
    /// While a search is still running, or before anything was resolved, the
    /// last query is searched again in the new units instead.
    pub async fn change_units(&self, units: UnitPreference) -> Result<Outcome, DashboardError> {
        let pending = {
            let mut inner = self.inner.lock();
            inner.units = units;
            match inner.session.location.clone() {
                Some(location) if !inner.searching => {
                    let generation = inner.begin(DashboardState::FetchingWeather);
                    Ok((generation, location))
                }
                _ => Err(inner.session.last_query.clone()),
            }
        };

        match pending {
            Ok((generation, location)) => self.fetch_and_apply(generation, location, units).await,
            Err(last_query) => self.search(&last_query).await,
        }
    }

    /// Show the hours of another day from the loaded snapshot.
    pub fn select_day(&self, day_index: i64) -> Result<(), DashboardError> {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;

        let snapshot = inner.session.snapshot.as_ref().ok_or(DashboardError::NotReady)?;
        let hours = match projector::project_hourly(snapshot, day_index) {
            Ok(hours) => hours,
            Err(e) => {
                tracing::warn!(error = %e, "Day selection rejected");
                return Err(e.into());
            }
        };

        projector::render_hourly(&mut inner.surface, &hours);
        inner.session.selected_day = day_index as usize;
        Ok(())
    }

    async fn fetch_and_apply(
        &self,
        generation: u64,
        location: ResolvedLocation,
        units: UnitPreference,
    ) -> Result<Outcome, DashboardError> {
        let fetched = self.weather.fetch(location.coordinates, units.resolve()).await;

        let mut inner = self.inner.lock();
        if !inner.is_current(generation) {
            tracing::debug!(generation, "Dropping superseded forecast");
            return Ok(Outcome::Superseded);
        }
        inner.searching = false;

        let snapshot = match fetched {
            Ok(snapshot) => snapshot,
            Err(e) => {
                inner.state = DashboardState::Error;
                tracing::warn!(
                    error = %e,
                    place = %location.place.label(),
                    "Forecast fetch failed"
                );
                return Err(e.into());
            }
        };

        let view = match DashboardView::project(&location.place, &snapshot, 0) {
            Ok(view) => view,
            Err(e) => {
                inner.state = DashboardState::Error;
                tracing::warn!(error = %e, "Forecast could not be projected");
                return Err(e.into());
            }
        };

        let inner = &mut *inner;
        view.render(&mut inner.surface);
        tracing::info!(place = %location.place.label(), %units, "Dashboard updated");

        inner.session.location = Some(location);
        inner.session.snapshot = Some(snapshot);
        inner.session.units = units;
        inner.session.selected_day = 0;
        inner.state = DashboardState::Ready;

        Ok(Outcome::Applied)
    }
}
