use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{FetchError, truncate_body},
    model::{
        Coordinates, CurrentConditions, DailyEntry, FORECAST_DAYS, HOURS_PER_DAY, HourlyEntry,
        WeatherSnapshot,
    },
    units::UnitSet,
};

use super::WeatherSource;

pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";
const CURRENT_FIELDS: &str = concat!(
    "temperature_2m,relative_humidity_2m,apparent_temperature,",
    "weather_code,precipitation,wind_speed_10m"
);

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Forecast client for the Open-Meteo API.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    url: String,
    timezone: String,
}

impl OpenMeteoClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            timezone: "auto".to_string(),
        }
    }

    /// Timezone the service reports timestamps in. "auto" means the place's own.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentUnits {
    wind_speed_10m: String,
    precipitation: String,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    weather_code: Option<i32>,
    precipitation: Option<f64>,
    wind_speed_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current_units: OmCurrentUnits,
    current: OmCurrent,
    daily: OmDaily,
    hourly: OmHourly,
}

fn malformed(msg: impl Into<String>) -> FetchError {
    FetchError::MalformedResponse(msg.into())
}

fn required<T: Copy>(value: Option<T>, field: &str) -> Result<T, FetchError> {
    value.ok_or_else(|| malformed(format!("'{field}' is null")))
}

fn at<T: Copy>(values: &[Option<T>], i: usize, field: &str) -> Result<T, FetchError> {
    values
        .get(i)
        .copied()
        .flatten()
        .ok_or_else(|| malformed(format!("'{field}[{i}]' is missing or null")))
}

fn parse_time(raw: &str) -> Result<NaiveDateTime, FetchError> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .map_err(|_| malformed(format!("invalid timestamp {raw:?}")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| malformed(format!("invalid date {raw:?}")))
}

fn check_lengths(section: &str, expected_min: usize, lengths: &[usize]) -> Result<(), FetchError> {
    let first = lengths.first().copied().unwrap_or(0);
    if lengths.iter().any(|&len| len != first) {
        return Err(malformed(format!("{section} arrays differ in length: {lengths:?}")));
    }
    if first < expected_min {
        return Err(malformed(format!(
            "{section} has {first} entries, expected at least {expected_min}"
        )));
    }
    Ok(())
}

impl OmResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, FetchError> {
        let current = CurrentConditions {
            observed_at: parse_time(&self.current.time)?,
            temperature: required(self.current.temperature_2m, "current.temperature_2m")?,
            feels_like: required(
                self.current.apparent_temperature,
                "current.apparent_temperature",
            )?,
            humidity_pct: required(
                self.current.relative_humidity_2m,
                "current.relative_humidity_2m",
            )?,
            wind_speed: required(self.current.wind_speed_10m, "current.wind_speed_10m")?,
            wind_unit: self.current_units.wind_speed_10m,
            precipitation: required(self.current.precipitation, "current.precipitation")?,
            precipitation_unit: self.current_units.precipitation,
            weather_code: required(self.current.weather_code, "current.weather_code")?,
        };

        let d = &self.daily;
        check_lengths(
            "daily",
            FORECAST_DAYS,
            &[
                d.time.len(),
                d.weather_code.len(),
                d.temperature_2m_max.len(),
                d.temperature_2m_min.len(),
            ],
        )?;
        let daily = d
            .time
            .iter()
            .enumerate()
            .map(|(i, date)| {
                Ok(DailyEntry {
                    date: parse_date(date)?,
                    weather_code: at(&d.weather_code, i, "daily.weather_code")?,
                    temp_max: at(&d.temperature_2m_max, i, "daily.temperature_2m_max")?,
                    temp_min: at(&d.temperature_2m_min, i, "daily.temperature_2m_min")?,
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        let h = &self.hourly;
        check_lengths(
            "hourly",
            FORECAST_DAYS * HOURS_PER_DAY,
            &[h.time.len(), h.temperature_2m.len(), h.weather_code.len()],
        )?;
        let hourly = h
            .time
            .iter()
            .enumerate()
            .map(|(i, time)| {
                Ok(HourlyEntry {
                    time: parse_time(time)?,
                    weather_code: at(&h.weather_code, i, "hourly.weather_code")?,
                    temperature: at(&h.temperature_2m, i, "hourly.temperature_2m")?,
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(WeatherSnapshot { current, daily, hourly })
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch(
        &self,
        coordinates: Coordinates,
        units: UnitSet,
    ) -> Result<WeatherSnapshot, FetchError> {
        tracing::debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            ?units,
            "Fetching forecast"
        );

        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();
        let forecast_days = FORECAST_DAYS.to_string();

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("daily", DAILY_FIELDS),
                ("hourly", HOURLY_FIELDS),
                ("current", CURRENT_FIELDS),
                ("wind_speed_unit", units.wind.as_query()),
                ("temperature_unit", units.temperature.as_query()),
                ("precipitation_unit", units.precipitation.as_query()),
                ("forecast_days", forecast_days.as_str()),
                ("timezone", self.timezone.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "Forecast request failed");
            return Err(FetchError::Http(status));
        }

        let parsed: OmResponse =
            serde_json::from_str(&body).map_err(|e| malformed(e.to_string()))?;

        parsed.into_snapshot()
    }
}
