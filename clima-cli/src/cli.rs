use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clima_core::{
    AppHandle, Config, DisplayUnit, IpLocationProvider, LocationProvider, StaticLocationProvider,
    Status, WeatherApp, WeatherLookupService, provider::openweather::DEFAULT_BASE_URL,
    provider_from_config,
};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use std::{fmt, process::ExitCode, sync::Arc};
use tokio::task::JoinHandle;

use crate::output::print_screen;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Current weather for where you are, or for any city")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Look the weather up once and print it.
    Show {
        /// City name; skips location lookup.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Interactive screen: toggle units, change city, re-locate.
    Run {
        #[command(flatten)]
        location: LocationArgs,
    },
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Latitude to use instead of IP geolocation.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude to use instead of IP geolocation.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Start in Celsius instead of Fahrenheit.
    #[arg(long)]
    celsius: bool,
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, location } => show(city, &location).await,
            Command::Run { location } => interactive(&location).await,
        }
    }
}

fn configure() -> Result<ExitCode> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let base_url = Text::new("Weather endpoint:")
        .with_default(config.base_url())
        .prompt()
        .context("Failed to read weather endpoint")?;

    config.set_api_key(api_key.trim().to_string());
    config.base_url = (base_url.trim() != DEFAULT_BASE_URL).then(|| base_url.trim().to_string());

    let path = config.save()?;
    tracing::info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(ExitCode::SUCCESS)
}

fn start_app(location: &LocationArgs) -> Result<(AppHandle, JoinHandle<()>)> {
    let config = Config::load()?;
    let weather = provider_from_config(&config)?;

    let provider: Box<dyn LocationProvider> = match (location.lat, location.lon) {
        (Some(lat), Some(lon)) => {
            tracing::debug!(lat, lon, "using coordinates from the command line");
            Box::new(StaticLocationProvider::new(lat, lon))
        }
        _ => Box::new(
            IpLocationProvider::new(config.location_url())
                .context("Failed to build HTTP client for IP geolocation")?,
        ),
    };

    let unit = if location.celsius {
        DisplayUnit::Celsius
    } else {
        DisplayUnit::default()
    };

    let (app, handle) =
        WeatherApp::new(WeatherLookupService::with_unit(unit), provider, Arc::new(weather));

    Ok((handle, tokio::spawn(app.run())))
}

async fn stop_app(handle: AppHandle, task: JoinHandle<()>) -> Result<()> {
    handle.shutdown()?;
    task.await.context("Weather app task panicked")
}

async fn show(city: Option<String>, location: &LocationArgs) -> Result<ExitCode> {
    let (mut handle, task) = start_app(location)?;

    match city {
        Some(city) => handle.submit_city(city)?,
        None => handle.use_location()?,
    }
    let screen = handle.next_settled().await?;
    stop_app(handle, task).await?;

    print_screen(&screen);

    Ok(if matches!(screen.status, Status::Failed(_)) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    SwitchTo(DisplayUnit),
    ChangeCity,
    UseLocation,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SwitchTo(unit) => write!(f, "Switch to °{}", unit.initial()),
            Action::ChangeCity => f.write_str("Change city"),
            Action::UseLocation => f.write_str("Use my location"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

async fn interactive(location: &LocationArgs) -> Result<ExitCode> {
    let (mut handle, task) = start_app(location)?;

    handle.use_location()?;
    let mut screen = handle.next_settled().await?;

    loop {
        print_screen(&screen);

        screen = match prompt_action(screen.unit.toggled()).await? {
            Action::SwitchTo(_) => {
                handle.toggle_unit()?;
                handle.next_screen().await?
            }
            Action::ChangeCity => match prompt_city().await? {
                Some(city) => {
                    handle.submit_city(city)?;
                    handle.next_settled().await?
                }
                None => screen,
            },
            Action::UseLocation => {
                handle.use_location()?;
                handle.next_settled().await?
            }
            Action::Quit => break,
        };
    }

    stop_app(handle, task).await?;
    Ok(ExitCode::SUCCESS)
}

async fn prompt_action(other_unit: DisplayUnit) -> Result<Action> {
    let options = vec![
        Action::SwitchTo(other_unit),
        Action::ChangeCity,
        Action::UseLocation,
        Action::Quit,
    ];

    let answer = tokio::task::spawn_blocking(move || Select::new("What next?", options).prompt())
        .await
        .context("Prompt task panicked")?;

    match answer {
        Ok(action) => Ok(action),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Ok(Action::Quit)
        }
        Err(e) => Err(e).context("Failed to read menu choice"),
    }
}

/// The city entry screen. `None` when the user backs out or enters nothing.
async fn prompt_city() -> Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(|| Text::new("City name:").prompt_skippable())
        .await
        .context("Prompt task panicked")?;

    match answer {
        Ok(city) => Ok(city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())),
        Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Failed to read city name"),
    }
}
