//! The weather lookup state machine.
//!
//! [`WeatherLookupService`] owns the last reading, the display unit and the
//! on-screen values. It never performs I/O: each [`Event`] goes in, the
//! [`Command`]s the runtime has to carry out come back.

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::{
    display::{Display, Screen, Status, render},
    error::{FailureKind, WeatherError},
    location::LocationFix,
    model::{DisplayUnit, WeatherQuery, WeatherReading},
    parse::parse_reading,
};

/// Identifies one issued fetch.
pub type FetchId = u64;

/// Everything that can happen to the app, in queue order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user wants weather for where they are.
    LocationRequested,
    /// A batch of fixes from the location provider, oldest first.
    LocationUpdated(Vec<LocationFix>),
    LocationFailed(String),
    /// A city name from the city entry screen.
    CitySubmitted(String),
    UnitToggled,
    FetchCompleted {
        id: FetchId,
        result: Result<Value, WeatherError>,
    },
    /// Stop the runtime loop. The service itself ignores it.
    Shutdown,
}

/// Side effects requested by the service.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RequestLocationPermission,
    StartLocationUpdates,
    StopLocationUpdates,
    Fetch { id: FetchId, query: WeatherQuery },
}

#[derive(Debug, Default)]
pub struct WeatherLookupService {
    reading: Option<WeatherReading>,
    unit: DisplayUnit,
    display: Display,
    status: Status,
    updated_at: Option<DateTime<Local>>,
    acquiring: bool,
    permission_requested: bool,
    last_fetch: FetchId,
    in_flight: Option<FetchId>,
}

impl WeatherLookupService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(unit: DisplayUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    pub fn reading(&self) -> Option<&WeatherReading> {
        self.reading.as_ref()
    }

    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_acquiring(&self) -> bool {
        self.acquiring
    }

    pub fn screen(&self) -> Screen {
        Screen {
            display: self.display.clone(),
            unit: self.unit,
            status: self.status,
            updated_at: self.updated_at,
        }
    }

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::LocationRequested => self.start_acquisition(),
            Event::LocationUpdated(fixes) => self.location_updated(&fixes),
            Event::LocationFailed(reason) => self.location_failed(&reason),
            Event::CitySubmitted(city) => self.city_submitted(city),
            Event::UnitToggled => {
                self.toggle_unit();
                Vec::new()
            }
            Event::FetchCompleted { id, result } => {
                self.fetch_completed(id, result);
                Vec::new()
            }
            Event::Shutdown => Vec::new(),
        }
    }

    fn start_acquisition(&mut self) -> Vec<Command> {
        if self.acquiring {
            tracing::debug!("location acquisition already running");
            return Vec::new();
        }

        self.acquiring = true;
        self.status = Status::Locating;

        let mut commands = Vec::with_capacity(2);
        if !self.permission_requested {
            self.permission_requested = true;
            commands.push(Command::RequestLocationPermission);
        }
        commands.push(Command::StartLocationUpdates);
        commands
    }

    // Single shot: the first usable fix ends acquisition.
    fn location_updated(&mut self, fixes: &[LocationFix]) -> Vec<Command> {
        if !self.acquiring {
            tracing::trace!("ignoring location update after acquisition ended");
            return Vec::new();
        }

        let Some(fix) = fixes.last() else {
            return Vec::new();
        };

        if !fix.is_valid() {
            tracing::debug!(accuracy = fix.horizontal_accuracy, "discarding inaccurate fix");
            return Vec::new();
        }

        self.acquiring = false;
        tracing::info!(lat = fix.latitude, lon = fix.longitude, "location acquired");

        vec![
            Command::StopLocationUpdates,
            self.fetch(WeatherQuery::Coordinates {
                lat: fix.latitude,
                lon: fix.longitude,
            }),
        ]
    }

    fn location_failed(&mut self, reason: &str) -> Vec<Command> {
        if !self.acquiring {
            tracing::trace!(reason, "ignoring location failure after acquisition ended");
            return Vec::new();
        }

        tracing::warn!(reason, "location unavailable");
        self.acquiring = false;
        self.fail(FailureKind::LocationUnavailable);

        vec![Command::StopLocationUpdates]
    }

    fn city_submitted(&mut self, city: String) -> Vec<Command> {
        tracing::info!(city = %city, "city entered");

        let mut commands = Vec::with_capacity(2);
        // Manual entry replaces whatever the location provider was doing.
        if self.acquiring {
            self.acquiring = false;
            commands.push(Command::StopLocationUpdates);
        }
        commands.push(self.fetch(WeatherQuery::City(city)));
        commands
    }

    fn toggle_unit(&mut self) {
        self.unit = self.unit.toggled();
        tracing::debug!(unit = ?self.unit, "display unit toggled");

        if let Some(reading) = &self.reading {
            self.display = render(reading, self.unit);
        }
    }

    fn fetch(&mut self, query: WeatherQuery) -> Command {
        self.last_fetch += 1;
        self.in_flight = Some(self.last_fetch);
        self.status = Status::Fetching;

        Command::Fetch {
            id: self.last_fetch,
            query,
        }
    }

    fn fetch_completed(&mut self, id: FetchId, result: Result<Value, WeatherError>) {
        if self.in_flight != Some(id) {
            tracing::debug!(id, latest = self.last_fetch, "dropping superseded weather response");
            return;
        }
        self.in_flight = None;

        match result.and_then(|payload| parse_reading(&payload)) {
            Ok(reading) => {
                tracing::info!(
                    city = %reading.city,
                    kelvin = reading.temperature_kelvin(),
                    condition = reading.condition_code(),
                    "weather updated"
                );
                self.display = render(&reading, self.unit);
                self.reading = Some(reading);
                self.status = Status::Ready;
                self.updated_at = Some(Local::now());
            }
            // Whether the parser or the provider found no temperature, the reading goes.
            Err(WeatherError::DataUnavailable) => {
                tracing::warn!("{}", WeatherError::DataUnavailable);
                self.reading = None;
                self.display = Display::weather_unavailable();
                self.status = Status::Failed(FailureKind::DataUnavailable);
            }
            Err(err) => {
                tracing::error!("weather fetch failed: {err}");
                self.fail(err.kind());
            }
        }
    }

    // Only the city label changes; temperature and icon keep their last values.
    fn fail(&mut self, kind: FailureKind) {
        self.display.city = kind.display_text().to_string();
        self.status = Status::Failed(kind);
    }
}
