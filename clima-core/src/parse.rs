//! Response parsing for the `data/2.5/weather` payload.
//!
//! Parsing is lenient: only `main.temp` is required. A payload without it,
//! malformed or not, yields [`WeatherError::DataUnavailable`].

use serde_json::Value;

use crate::{error::WeatherError, model::WeatherReading};

/// Build a reading from a decoded JSON payload.
pub fn parse_reading(json: &Value) -> Result<WeatherReading, WeatherError> {
    let temp = json
        .pointer("/main/temp")
        .and_then(Value::as_f64)
        .ok_or(WeatherError::DataUnavailable)?;

    let city = json.get("name").and_then(Value::as_str).unwrap_or_default();

    let condition = json
        .pointer("/weather/0/id")
        .map(int_value)
        .unwrap_or_default();

    Ok(WeatherReading::new(city, temp, condition))
}

// Numbers truncate, numeric strings parse, everything else is zero.
fn int_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}
