use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Unit system selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "metric",
            UnitPreference::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitPreference] {
        &[UnitPreference::Metric, UnitPreference::Imperial]
    }

    /// Concrete units sent with a weather query.
    pub fn resolve(self) -> UnitSet {
        match self {
            UnitPreference::Metric => UnitSet {
                temperature: TemperatureUnit::Celsius,
                wind: WindUnit::Kmh,
                precipitation: PrecipitationUnit::Mm,
            },
            UnitPreference::Imperial => UnitSet {
                temperature: TemperatureUnit::Fahrenheit,
                wind: WindUnit::Mph,
                precipitation: PrecipitationUnit::Inch,
            },
        }
    }
}

impl fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitPreference {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "c" => Ok(UnitPreference::Metric),
            "imperial" | "f" => Ok(UnitPreference::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindUnit {
    Kmh,
    Mph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrecipitationUnit {
    Mm,
    Inch,
}

impl TemperatureUnit {
    pub fn as_query(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }
}

impl WindUnit {
    pub fn as_query(self) -> &'static str {
        match self {
            WindUnit::Kmh => "kmh",
            WindUnit::Mph => "mph",
        }
    }
}

impl PrecipitationUnit {
    pub fn as_query(self) -> &'static str {
        match self {
            PrecipitationUnit::Mm => "mm",
            PrecipitationUnit::Inch => "inch",
        }
    }
}

/// The three measurement units a weather query is made in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitSet {
    pub temperature: TemperatureUnit,
    pub wind: WindUnit,
    pub precipitation: PrecipitationUnit,
}
