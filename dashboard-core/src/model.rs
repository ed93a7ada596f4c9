use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Number of days covered by the daily forecast and the day selector.
pub const FORECAST_DAYS: usize = 7;

pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Human-facing name of a resolved location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub display_city: String,
    /// Two-letter code, upper-cased.
    pub country_code: String,
}

impl Place {
    pub fn label(&self) -> String {
        format!("{}, {}", self.display_city, self.country_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    pub place: Place,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Local time at the place.
    pub observed_at: NaiveDateTime,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: f64,
    pub wind_speed: f64,
    /// Unit label exactly as reported by the backend, e.g. "km/h" or "mp/h".
    pub wind_unit: String,
    pub precipitation: f64,
    pub precipitation_unit: String,
    pub weather_code: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub temp_max: f64,
    pub temp_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: NaiveDateTime,
    pub weather_code: i32,
    pub temperature: f64,
}

/// Everything one weather query returns. Replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub daily: Vec<DailyEntry>,
    pub hourly: Vec<HourlyEntry>,
}

impl WeatherSnapshot {
    /// Number of whole days the hourly series covers.
    pub fn hourly_days(&self) -> usize {
        self.hourly.len() / HOURS_PER_DAY
    }
}
