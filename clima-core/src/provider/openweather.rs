use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::{error::WeatherError, model::WeatherQuery};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn get_weather(&self, query: &WeatherQuery) -> Result<Value, WeatherError> {
        tracing::debug!(%query, url = %self.base_url, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&query.params(&self.api_key))
            .send()
            .await
            .inspect_err(|e| tracing::error!("OpenWeather request failed: {e}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .inspect_err(|e| tracing::error!("Failed to read OpenWeather response body: {e}"))?;

        // The payload decides what is shown, not the status line.
        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "OpenWeather returned non-success status");
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("OpenWeather response is not JSON: {e}");
            WeatherError::ConnectionFailed(format!(
                "response is not JSON ({e}): {}",
                truncate_body(&body)
            ))
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
