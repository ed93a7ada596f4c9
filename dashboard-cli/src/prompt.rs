use std::fmt;

use dashboard_core::{
    Config, DashboardController, DashboardError, MemorySurface, Outcome, Region, UnitPreference,
    model::FORECAST_DAYS,
};
use inquire::{InquireError, Select, Text};

use crate::render;

/// Ask for the default location and unit system.
pub fn configure(config: &mut Config) -> anyhow::Result<()> {
    let location = Text::new("Default location:")
        .with_default(&config.default_location)
        .with_help_message("Searched when no place is given")
        .prompt()?;
    config.set_default_location(&location);

    let choices = UnitPreference::all().to_vec();
    let cursor = choices.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Unit system:", choices)
        .with_starting_cursor(cursor)
        .prompt()?;

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Units,
    Day,
    Quit,
}

impl Action {
    const ALL: [Action; 4] = [Action::Search, Action::Units, Action::Day, Action::Quit];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search for a place",
            Action::Units => "Change units",
            Action::Day => "Pick the day for the hourly forecast",
            Action::Quit => "Quit",
        })
    }
}

fn report(result: Result<Outcome, DashboardError>) {
    match result {
        Ok(Outcome::Applied) => {}
        Ok(Outcome::Superseded) => tracing::debug!("Action superseded by a newer one"),
        Err(e) => eprintln!("Error: {e}"),
    }
}

fn day_options(controller: &DashboardController<MemorySurface>) -> Vec<String> {
    controller.with_surface(|surface| {
        (0..FORECAST_DAYS)
            .filter_map(|slot| surface.text(Region::DayOption(slot)).map(str::to_string))
            .collect()
    })
}

/// Esc and Ctrl-C end the session instead of failing it.
fn cancelled<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Prompt loop over the dashboard until the user quits.
pub async fn interactive(
    controller: &DashboardController<MemorySurface>,
    query: &str,
) -> anyhow::Result<()> {
    report(controller.search(query).await);

    loop {
        controller.with_surface(|surface| print!("{}", render::dashboard(surface)));

        let Some(action) = cancelled(Select::new("Action:", Action::ALL.to_vec()).prompt())? else {
            break;
        };

        match action {
            Action::Search => {
                if let Some(query) = cancelled(Text::new("Place:").prompt())? {
                    report(controller.search(&query).await);
                }
            }
            Action::Units => {
                let choices = UnitPreference::all().to_vec();
                if let Some(units) = cancelled(Select::new("Unit system:", choices).prompt())? {
                    report(controller.change_units(units).await);
                }
            }
            Action::Day => {
                let options = day_options(controller);
                if options.is_empty() {
                    eprintln!("No forecast loaded yet.");
                    continue;
                }
                let cursor = controller.session().selected_day.min(options.len() - 1);
                let picked = Select::new("Day:", options).with_starting_cursor(cursor).raw_prompt();
                if let Some(option) = cancelled(picked)? {
                    match controller.select_day(option.index as i64) {
                        Ok(()) => tracing::debug!(day = option.index, "Selected day"),
                        Err(e) => eprintln!("Error: {e}"),
                    }
                }
            }
            Action::Quit => break,
        }
    }

    Ok(())
}
