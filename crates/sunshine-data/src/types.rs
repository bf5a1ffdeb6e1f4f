use serde::{Deserialize, Serialize};

use crate::date;

/// One cached day of weather.
///
/// `date` is the start of the UTC day in milliseconds and is the unique key
/// per day; callers normalize before constructing a record (see
/// [`crate::date::normalize_date`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Normalized date in milliseconds (midnight UTC)
    pub date: i64,
    /// Condition code as returned by the weather API, identifies the icon
    pub weather_id: i64,
    /// Minimum temperature for the day, °C
    pub min_temp: f64,
    /// Maximum temperature for the day, °C
    pub max_temp: f64,
    /// Humidity as a percentage
    pub humidity: f64,
    /// Pressure as stored by the API (percentage-like unit)
    pub pressure: f64,
    /// Wind speed in mph
    pub wind_speed: f64,
    /// Wind direction as a compass heading
    pub degrees: i64,
}

impl WeatherRecord {
    /// Whether the record's date sits on a UTC day boundary.
    pub fn has_normalized_date(&self) -> bool {
        date::is_normalized(self.date)
    }

    /// Condition category for this record's `weather_id`.
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_owm_code(self.weather_id)
    }
}

/// Weather condition categories mapped from OpenWeatherMap condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    Clouds,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
    Storm,
}

impl WeatherCondition {
    /// Convert an OpenWeatherMap condition code to a WeatherCondition
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_owm_code(code: i64) -> Self {
        match code {
            200..=232 => Self::Thunderstorm,
            300..=321 => Self::Drizzle,
            500..=531 => Self::Rain,
            600..=622 => Self::Snow,
            701..=761 => Self::Fog,
            762 | 771 | 781 | 900..=902 | 905 | 958..=962 => Self::Storm,
            800 => Self::Clear,
            801..=804 | 951..=957 => Self::Clouds,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Storm => "Storm",
        }
    }

    /// Get icon name for the condition
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Fog => "fog",
            Self::Drizzle => "light_rain",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Thunderstorm => "storm",
            Self::Storm => "storm",
        }
    }
}

/// Weather data layer errors
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Invalid content authority {authority:?}: {reason}")]
    InvalidAuthority { authority: String, reason: String },
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owm_code_thunderstorm() {
        assert_eq!(
            WeatherCondition::from_owm_code(200),
            WeatherCondition::Thunderstorm
        );
        assert_eq!(
            WeatherCondition::from_owm_code(232),
            WeatherCondition::Thunderstorm
        );
    }

    #[test]
    fn test_owm_code_drizzle() {
        assert_eq!(WeatherCondition::from_owm_code(300), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::from_owm_code(321), WeatherCondition::Drizzle);
    }

    #[test]
    fn test_owm_code_rain() {
        assert_eq!(WeatherCondition::from_owm_code(500), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_owm_code(531), WeatherCondition::Rain);
    }

    #[test]
    fn test_owm_code_snow() {
        assert_eq!(WeatherCondition::from_owm_code(600), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_owm_code(622), WeatherCondition::Snow);
    }

    #[test]
    fn test_owm_code_fog() {
        assert_eq!(WeatherCondition::from_owm_code(701), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_owm_code(741), WeatherCondition::Fog);
    }

    #[test]
    fn test_owm_code_clear() {
        assert_eq!(WeatherCondition::from_owm_code(800), WeatherCondition::Clear);
    }

    #[test]
    fn test_owm_code_clouds() {
        assert_eq!(WeatherCondition::from_owm_code(801), WeatherCondition::Clouds);
        assert_eq!(WeatherCondition::from_owm_code(804), WeatherCondition::Clouds);
    }

    #[test]
    fn test_owm_code_storm() {
        assert_eq!(WeatherCondition::from_owm_code(781), WeatherCondition::Storm);
        assert_eq!(WeatherCondition::from_owm_code(900), WeatherCondition::Storm);
    }

    #[test]
    fn test_owm_code_unknown_defaults_to_clear() {
        assert_eq!(WeatherCondition::from_owm_code(0), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_owm_code(-1), WeatherCondition::Clear);
    }

    #[test]
    fn test_condition_description() {
        assert_eq!(WeatherCondition::Rain.description(), "Rain");
        assert_eq!(WeatherCondition::Thunderstorm.description(), "Thunderstorm");
    }

    #[test]
    fn test_condition_icon_name() {
        assert_eq!(WeatherCondition::Clear.icon_name(), "clear");
        assert_eq!(WeatherCondition::Drizzle.icon_name(), "light_rain");
    }

    #[test]
    fn test_record_condition_lookup() {
        let record = WeatherRecord {
            date: 1_579_046_400_000,
            weather_id: 500,
            min_temp: 5.0,
            max_temp: 12.0,
            humidity: 80.0,
            pressure: 1020.0,
            wind_speed: 4.5,
            degrees: 270,
        };
        assert_eq!(record.condition(), WeatherCondition::Rain);
        assert!(record.has_normalized_date());
    }
}
