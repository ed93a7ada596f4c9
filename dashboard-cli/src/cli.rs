use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{Config, DashboardController, MemorySurface, UnitPreference};

use crate::{prompt, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about = "Weather dashboard in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

fn parse_units(value: &str) -> anyhow::Result<UnitPreference> {
    UnitPreference::try_from(value)
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit the default location and unit system.
    Configure,

    /// Show the dashboard once for a place.
    Show {
        /// Place to search for; the configured default when omitted.
        query: Option<String>,

        /// Unit system (metric or imperial); the configured one when omitted.
        #[arg(long, value_parser = parse_units)]
        units: Option<UnitPreference>,

        /// Day for the hourly forecast, 0 = today.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        day: i64,
    },

    /// Keep the dashboard open and react to searches, unit and day changes.
    Interactive {
        /// First place to show; the configured default when omitted.
        query: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => {
                prompt::configure(&mut config)?;
                config.save()?;
                let path = Config::config_file_path()?;
                tracing::info!(
                    path = %path.display(),
                    units = %config.units,
                    "Configuration saved"
                );
                println!("Saved configuration to {}", path.display());
            }
            Command::Show { query, units, day } => {
                tracing::debug!(?query, ?units, day, "Showing dashboard");
                if let Some(units) = units {
                    config.units = units;
                }
                let controller = build_controller(&config)?;

                controller
                    .search(query.as_deref().unwrap_or_default())
                    .await
                    .context("Could not load the forecast")?;
                if day != 0 {
                    controller.select_day(day)?;
                }

                controller.with_surface(|surface| print!("{}", render::dashboard(surface)));
            }
            Command::Interactive { query } => {
                let controller = build_controller(&config)?;
                prompt::interactive(&controller, query.as_deref().unwrap_or_default()).await?;
            }
        }

        Ok(())
    }
}

fn build_controller(config: &Config) -> anyhow::Result<DashboardController<MemorySurface>> {
    dashboard_core::controller_from_config(config, MemorySurface::new())
}
