use chrono::{DateTime, Local};

use crate::{
    error::FailureKind,
    icon::DUNNO,
    model::{DisplayUnit, WeatherReading},
};

/// The three on-screen values: city label, temperature label, icon.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Display {
    pub city: String,
    pub temperature: String,
    pub icon: String,
}

impl Display {
    /// Placeholder shown when a payload carried no temperature.
    pub fn weather_unavailable() -> Self {
        Self {
            city: FailureKind::DataUnavailable.display_text().to_string(),
            temperature: String::new(),
            icon: DUNNO.to_string(),
        }
    }
}

/// Render a reading in the given unit. No side effects.
pub fn render(reading: &WeatherReading, unit: DisplayUnit) -> Display {
    Display {
        city: reading.city.clone(),
        temperature: format!("{}°", reading.temperature_in(unit)),
        icon: reading.icon_name().to_string(),
    }
}

/// Where the current lookup cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Locating,
    Fetching,
    Ready,
    Failed(FailureKind),
}

impl Status {
    pub fn is_settled(&self) -> bool {
        matches!(self, Status::Ready | Status::Failed(_))
    }
}

/// Everything a front end needs to draw the single screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Screen {
    pub display: Display,
    pub unit: DisplayUnit,
    pub status: Status,
    pub updated_at: Option<DateTime<Local>>,
}

impl Screen {
    pub fn button_label(&self) -> &'static str {
        self.unit.button_label()
    }
}
