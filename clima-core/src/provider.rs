use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{Config, WeatherQuery, error::WeatherError, provider::openweather::OpenWeatherProvider};

pub mod openweather;

/// Performs the weather GET and hands back whatever JSON came back.
///
/// Implementations must not interpret the payload; a non-2xx response
/// with a JSON body is still `Ok`.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, query: &WeatherQuery) -> Result<Value, WeatherError>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key()?;

    OpenWeatherProvider::new(api_key.to_owned(), config.base_url().to_owned())
}
