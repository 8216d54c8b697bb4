pub const LOCATION_UNAVAILABLE: &str = "Location Unavailable";
pub const NO_CONNECTION: &str = "No Connection";
pub const WEATHER_UNAVAILABLE: &str = "Weather Unavailable";

/// The three ways a lookup cycle can end badly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    LocationUnavailable,
    ConnectionFailed,
    DataUnavailable,
}

impl FailureKind {
    /// Static text shown in place of the city name.
    pub fn display_text(&self) -> &'static str {
        match self {
            FailureKind::LocationUnavailable => LOCATION_UNAVAILABLE,
            FailureKind::ConnectionFailed => NO_CONNECTION,
            FailureKind::DataUnavailable => WEATHER_UNAVAILABLE,
        }
    }
}

/// Errors surfaced by the location provider, the weather provider and the parser.
///
/// None of them is retried; each one ends the current request cycle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeatherError {
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("payload has no temperature field")]
    DataUnavailable,
}

impl WeatherError {
    pub fn kind(&self) -> FailureKind {
        match self {
            WeatherError::LocationUnavailable(_) => FailureKind::LocationUnavailable,
            WeatherError::ConnectionFailed(_) => FailureKind::ConnectionFailed,
            WeatherError::DataUnavailable => FailureKind::DataUnavailable,
        }
    }

    pub fn display_text(&self) -> &'static str {
        self.kind().display_text()
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::ConnectionFailed(err.to_string())
    }
}
