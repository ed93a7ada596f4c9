//! Region-addressed output target for the dashboard.

use std::collections::BTreeMap;

use crate::condition::WeatherCategory;

/// Addressable parts of the dashboard layout. Slot indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    CityCountry,
    CurrentDate,
    CurrentTemperature,
    CurrentIcon,
    FeelsLike,
    Humidity,
    Wind,
    Precipitation,
    DailyDay(usize),
    DailyIcon(usize),
    DailyHigh(usize),
    DailyLow(usize),
    DayOption(usize),
    HourlyIcon(usize),
    HourlyTime(usize),
    HourlyTemp(usize),
}

/// Something the dashboard can be drawn on.
///
/// Every call replaces whatever the region showed before.
pub trait ViewSurface {
    fn set_text(&mut self, region: Region, text: &str);

    fn set_icon(&mut self, region: Region, category: WeatherCategory);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Icon(WeatherCategory),
}

/// Keeps region content in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    regions: BTreeMap<Region, Content>,
    writes: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, region: Region) -> Option<&Content> {
        self.regions.get(&region)
    }

    pub fn text(&self, region: Region) -> Option<&str> {
        match self.regions.get(&region) {
            Some(Content::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn icon(&self, region: Region) -> Option<WeatherCategory> {
        match self.regions.get(&region) {
            Some(Content::Icon(category)) => Some(*category),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total number of region updates received.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ViewSurface for MemorySurface {
    fn set_text(&mut self, region: Region, text: &str) {
        self.writes += 1;
        self.regions.insert(region, Content::Text(text.to_string()));
    }

    fn set_icon(&mut self, region: Region, category: WeatherCategory) {
        self.writes += 1;
        self.regions.insert(region, Content::Icon(category));
    }
}
