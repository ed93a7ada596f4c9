//! Turns a weather snapshot into what each dashboard region shows.
//!
//! The `project_*` functions are pure; `DashboardView::render` writes a full
//! set of projections into a [`ViewSurface`].

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    condition::WeatherCategory,
    error::BoundsError,
    model::{DailyEntry, FORECAST_DAYS, HOURS_PER_DAY, HourlyEntry, Place, WeatherSnapshot},
    view::{Region, ViewSurface},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub location: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity_pct: f64,
    pub wind: String,
    pub precipitation: String,
    pub category: WeatherCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyView {
    pub date: NaiveDate,
    pub weekday: String,
    pub category: WeatherCategory,
    pub temp_max: i64,
    pub temp_min: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyView {
    pub time: NaiveDateTime,
    pub hour_label: String,
    pub category: WeatherCategory,
    pub temperature: i64,
}

/// Rounds halves towards positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Display form of a unit label reported by the weather service.
pub fn normalize_unit_label(raw: &str) -> String {
    raw.replace("mp/h", "mph").replace("inch", "in")
}

fn format_measure(value: f64, raw_unit: &str) -> String {
    format!("{value} {}", normalize_unit_label(raw_unit))
}

pub fn project_header(place: &Place, date: NaiveDate) -> HeaderView {
    HeaderView {
        location: place.label(),
        date: date.format("%A, %b %-d, %Y").to_string(),
    }
}

pub fn project_current(snapshot: &WeatherSnapshot) -> CurrentView {
    let current = &snapshot.current;
    CurrentView {
        temperature: round_half_up(current.temperature),
        feels_like: round_half_up(current.feels_like),
        humidity_pct: current.humidity_pct,
        wind: format_measure(current.wind_speed, &current.wind_unit),
        precipitation: format_measure(current.precipitation, &current.precipitation_unit),
        category: WeatherCategory::classify(current.weather_code),
    }
}

impl From<&DailyEntry> for DailyView {
    fn from(entry: &DailyEntry) -> Self {
        DailyView {
            date: entry.date,
            weekday: entry.date.format("%a").to_string(),
            category: WeatherCategory::classify(entry.weather_code),
            temp_max: round_half_up(entry.temp_max),
            temp_min: round_half_up(entry.temp_min),
        }
    }
}

impl From<&HourlyEntry> for HourlyView {
    fn from(entry: &HourlyEntry) -> Self {
        HourlyView {
            time: entry.time,
            hour_label: entry.time.format("%-I %p").to_string(),
            category: WeatherCategory::classify(entry.weather_code),
            temperature: round_half_up(entry.temperature),
        }
    }
}

/// Up to seven daily summaries, labelled from each entry's own date.
pub fn project_daily(snapshot: &WeatherSnapshot) -> Vec<DailyView> {
    snapshot.daily.iter().take(FORECAST_DAYS).map(DailyView::from).collect()
}

/// Full weekday names for the day selector.
pub fn project_day_options(snapshot: &WeatherSnapshot) -> Vec<String> {
    snapshot
        .daily
        .iter()
        .take(FORECAST_DAYS)
        .map(|entry| entry.date.format("%A").to_string())
        .collect()
}

/// The 24 hours of day `day_index` (0 = today).
pub fn project_hourly(
    snapshot: &WeatherSnapshot,
    day_index: i64,
) -> Result<Vec<HourlyView>, BoundsError> {
    let out_of_range = BoundsError {
        index: day_index,
        available_hours: snapshot.hourly.len(),
    };

    let day = usize::try_from(day_index)
        .ok()
        .filter(|&day| day < FORECAST_DAYS)
        .ok_or(out_of_range)?;
    let start = day * HOURS_PER_DAY;

    let slice = snapshot
        .hourly
        .get(start..start + HOURS_PER_DAY)
        .ok_or(out_of_range)?;

    Ok(slice.iter().map(HourlyView::from).collect())
}

pub fn render_header(surface: &mut dyn ViewSurface, header: &HeaderView) {
    surface.set_text(Region::CityCountry, &header.location);
    surface.set_text(Region::CurrentDate, &header.date);
}

pub fn render_current(surface: &mut dyn ViewSurface, current: &CurrentView) {
    surface.set_text(Region::CurrentTemperature, &format!("{}°", current.temperature));
    surface.set_icon(Region::CurrentIcon, current.category);
    surface.set_text(Region::FeelsLike, &format!("{}°", current.feels_like));
    surface.set_text(Region::Humidity, &format!("{}%", current.humidity_pct));
    surface.set_text(Region::Wind, &current.wind);
    surface.set_text(Region::Precipitation, &current.precipitation);
}

pub fn render_daily(surface: &mut dyn ViewSurface, days: &[DailyView]) {
    for (slot, day) in days.iter().enumerate() {
        surface.set_text(Region::DailyDay(slot), &day.weekday);
        surface.set_icon(Region::DailyIcon(slot), day.category);
        surface.set_text(Region::DailyHigh(slot), &format!("{}°", day.temp_max));
        surface.set_text(Region::DailyLow(slot), &format!("{}°", day.temp_min));
    }
}

pub fn render_day_options(surface: &mut dyn ViewSurface, options: &[String]) {
    for (slot, name) in options.iter().enumerate() {
        surface.set_text(Region::DayOption(slot), name);
    }
}

pub fn render_hourly(surface: &mut dyn ViewSurface, hours: &[HourlyView]) {
    for (slot, hour) in hours.iter().enumerate() {
        surface.set_icon(Region::HourlyIcon(slot), hour.category);
        surface.set_text(Region::HourlyTime(slot), &hour.hour_label);
        surface.set_text(Region::HourlyTemp(slot), &format!("{}°", hour.temperature));
    }
}

/// Every projection for one place and snapshot, computed up front so a
/// failure leaves the surface untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub header: HeaderView,
    pub current: CurrentView,
    pub daily: Vec<DailyView>,
    pub day_options: Vec<String>,
    pub hourly: Vec<HourlyView>,
}

impl DashboardView {
    pub fn project(
        place: &Place,
        snapshot: &WeatherSnapshot,
        day_index: i64,
    ) -> Result<Self, BoundsError> {
        Ok(Self {
            header: project_header(place, snapshot.current.observed_at.date()),
            current: project_current(snapshot),
            daily: project_daily(snapshot),
            day_options: project_day_options(snapshot),
            hourly: project_hourly(snapshot, day_index)?,
        })
    }

    pub fn render(&self, surface: &mut dyn ViewSurface) {
        render_header(surface, &self.header);
        render_current(surface, &self.current);
        render_daily(surface, &self.daily);
        render_day_options(surface, &self.day_options);
        render_hourly(surface, &self.hourly);
    }
}
