//! Core library for the `clima` weather lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The location and weather provider seams, with their HTTP implementations
//! - The reading model, response parser and presentation rendering
//! - The lookup state machine and the event loop that drives it
//!
//! It is used by `clima-cli`, but any front end that can draw a [`Screen`]
//! and send [`Event`]s can drive it.

pub mod config;
pub mod display;
pub mod error;
pub mod icon;
pub mod location;
pub mod model;
pub mod parse;
pub mod provider;
pub mod runtime;
pub mod service;

pub use config::Config;
pub use display::{Display, Screen, Status, render};
pub use error::{FailureKind, WeatherError};
pub use location::{
    IpLocationProvider, LocationFix, LocationProvider, LocationSink, StaticLocationProvider,
};
pub use model::{DisplayUnit, WeatherQuery, WeatherReading};
pub use parse::parse_reading;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use runtime::{AppClosed, AppHandle, WeatherApp};
pub use service::{Command, Event, FetchId, WeatherLookupService};
