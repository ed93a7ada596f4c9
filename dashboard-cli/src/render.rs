//! Plain-text layout of the dashboard surface.

use dashboard_core::{MemorySurface, Region, model::{FORECAST_DAYS, HOURS_PER_DAY}};

const MISSING: &str = "--";

fn text(surface: &MemorySurface, region: Region) -> &str {
    surface.text(region).unwrap_or(MISSING)
}

fn icon(surface: &MemorySurface, region: Region) -> &'static str {
    surface.icon(region).map(|c| c.label()).unwrap_or(MISSING)
}

pub fn dashboard(surface: &MemorySurface) -> String {
    if surface.is_empty() {
        return format!("{MISSING}\n");
    }

    let mut lines = vec![
        text(surface, Region::CityCountry).to_string(),
        text(surface, Region::CurrentDate).to_string(),
        String::new(),
        format!(
            "  {}  {}",
            text(surface, Region::CurrentTemperature),
            icon(surface, Region::CurrentIcon)
        ),
        format!(
            "  Feels like {}   Humidity {}   Wind {}   Precipitation {}",
            text(surface, Region::FeelsLike),
            text(surface, Region::Humidity),
            text(surface, Region::Wind),
            text(surface, Region::Precipitation),
        ),
        String::new(),
        "Daily forecast".to_string(),
    ];

    for slot in 0..FORECAST_DAYS {
        lines.push(format!(
            "  {:4} {:14} {:>5} / {:>5}",
            text(surface, Region::DailyDay(slot)),
            icon(surface, Region::DailyIcon(slot)),
            text(surface, Region::DailyHigh(slot)),
            text(surface, Region::DailyLow(slot)),
        ));
    }

    lines.push(String::new());
    lines.push("Hourly forecast".to_string());

    for slot in 0..HOURS_PER_DAY {
        lines.push(format!(
            "  {:6} {:14} {:>5}",
            text(surface, Region::HourlyTime(slot)),
            icon(surface, Region::HourlyIcon(slot)),
            text(surface, Region::HourlyTemp(slot)),
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
