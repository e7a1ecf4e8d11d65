use serde::{Deserialize, Serialize};
use std::fmt;

/// Display icon bucket for a WeatherAPI.com condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconId {
    Clear,
    PartlyCloudy,
    Cloudy,
    Foggy,
    Rain,
    HeavyRain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl IconId {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconId::Clear => "clear",
            IconId::PartlyCloudy => "partlyCloudy",
            IconId::Cloudy => "cloudy",
            IconId::Foggy => "foggy",
            IconId::Rain => "rain",
            IconId::HeavyRain => "heavyRain",
            IconId::Snow => "snow",
            IconId::Thunderstorm => "thunderstorm",
            IconId::Unknown => "unknown",
        }
    }

    /// Suggested SF Symbols asset for the bucket.
    pub fn symbol_name(&self) -> &'static str {
        match self {
            IconId::Clear => "sun.max.fill",
            IconId::PartlyCloudy => "cloud.fill",
            IconId::Cloudy => "smoke.fill",
            IconId::Foggy => "cloud.fog.fill",
            IconId::Rain => "cloud.drizzle.fill",
            IconId::HeavyRain => "cloud.heavyrain.fill",
            IconId::Snow => "cloud.snow.fill",
            IconId::Thunderstorm => "cloud.bolt.rain.fill",
            IconId::Unknown => "cloud.sun.rain.fill",
        }
    }

    pub const fn all() -> &'static [IconId] {
        &[
            IconId::Clear,
            IconId::PartlyCloudy,
            IconId::Cloudy,
            IconId::Foggy,
            IconId::Rain,
            IconId::HeavyRain,
            IconId::Snow,
            IconId::Thunderstorm,
            IconId::Unknown,
        ]
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a provider condition code to its icon bucket.
///
/// Total over `i64`: codes outside the table (including future ones) map to
/// [`IconId::Unknown`].
/// See: https://www.weatherapi.com/docs/weather_conditions.json
pub fn classify(code: i64) -> IconId {
    match code {
        1000 => IconId::Clear,
        1003 | 1006 => IconId::PartlyCloudy,
        1009 => IconId::Cloudy,
        1030 | 1135 | 1147 => IconId::Foggy,
        1063 | 1150..=1189 => IconId::Rain,
        1192..=1201 => IconId::HeavyRain,
        1210..=1216 => IconId::Snow,
        1273..=1276 => IconId::Thunderstorm,
        _ => IconId::Unknown,
    }
}
