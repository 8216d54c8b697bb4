//! Condition code to icon identifier lookup.
//!
//! Codes follow the OpenWeatherMap condition groups:
//! <https://openweathermap.org/weather-conditions>

/// Icon shown when nothing better is known.
pub const DUNNO: &str = "dunno";

/// Map a provider condition code to a local icon identifier.
///
/// Unmatched codes (negative, or past 1000) fall back to [`DUNNO`].
pub fn icon_for_condition(code: i64) -> &'static str {
    match code {
        0..=300 => "tstorm1",
        301..=500 => "light_rain",
        501..=600 => "shower3",
        601..=700 => "snow4",
        701..=771 => "fog",
        772..=799 => "tstorm3",
        800 => "sunny",
        801..=804 => "cloudy2",
        // The storm range claims 903 as well.
        900..=903 | 905..=1000 => "tstorm3",
        904 => "sunny",
        _ => DUNNO,
    }
}
