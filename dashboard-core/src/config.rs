use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    location::DEFAULT_LOCATION,
    provider::{nominatim::NOMINATIM_SEARCH_URL, open_meteo::OPEN_METEO_FORECAST_URL},
    units::UnitPreference,
};

/// Service base URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub weather: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: NOMINATIM_SEARCH_URL.to_string(),
            weather: OPEN_METEO_FORECAST_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk. Every field is optional in the file.
///
/// Example TOML:
/// default_location = "Lisbon, Portugal"
/// units = "imperial"
///
/// [endpoints]
/// weather = "https://api.open-meteo.com/v1/forecast"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Searched when the query is blank.
    pub default_location: String,
    pub units: UnitPreference,
    pub endpoints: Endpoints,
    /// Timezone for forecast timestamps; "auto" uses the place's own.
    pub timezone: String,
    pub timeout_secs: u64,
    /// Nominatim rejects requests without an identifying user agent.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_location: DEFAULT_LOCATION.to_string(),
            units: UnitPreference::default(),
            endpoints: Endpoints::default(),
            timezone: "auto".to_string(),
            timeout_secs: 10,
            user_agent: concat!("weather-dashboard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set the default location; blank input restores the built-in default.
    pub fn set_default_location(&mut self, location: &str) {
        let trimmed = location.trim();
        self.default_location = if trimmed.is_empty() {
            DEFAULT_LOCATION.to_string()
        } else {
            trimmed.to_string()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml("").expect("empty config must parse");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.default_location, "Berlin, Germany");
        assert_eq!(cfg.units, UnitPreference::Metric);
        assert_eq!(cfg.endpoints.weather, OPEN_METEO_FORECAST_URL);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::from_toml(
            r#"
            units = "imperial"

            [endpoints]
            geocoding = "http://localhost:8080/search"
            "#,
        )
        .expect("partial config must parse");

        assert_eq!(cfg.units, UnitPreference::Imperial);
        assert_eq!(cfg.endpoints.geocoding, "http://localhost:8080/search");
        assert_eq!(cfg.endpoints.weather, OPEN_METEO_FORECAST_URL);
        assert_eq!(cfg.timeout_secs, 10);
    }

    #[test]
    fn unknown_unit_system_is_rejected() {
        let err = Config::from_toml(r#"units = "kelvin""#).unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.set_default_location("  Lisbon, Portugal ");
        cfg.units = UnitPreference::Imperial;

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back = Config::from_toml(&text).expect("parse");
        assert_eq!(back, cfg);
        assert_eq!(back.default_location, "Lisbon, Portugal");
    }

    #[test]
    fn blank_default_location_restores_builtin() {
        let mut cfg = Config::default();
        cfg.set_default_location("Oslo");
        cfg.set_default_location("   ");
        assert_eq!(cfg.default_location, DEFAULT_LOCATION);
    }
}
