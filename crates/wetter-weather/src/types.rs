use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic position reported by a location provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: None,
        }
    }
}

/// Outcome of asking the platform for location access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Weather condition categories mapped from OpenWeatherMap condition ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert an OpenWeatherMap condition id to a category
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_owm_code(code: i32) -> Self {
        match code {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            502..=504 | 522 | 531 => Self::HeavyRain,
            511 => Self::Sleet, // Freezing rain
            500..=599 => Self::Rain,
            611..=616 => Self::Sleet,
            600..=699 => Self::Snow,
            700..=799 => Self::Fog, // Mist, haze, dust and friends
            800 => Self::Clear,
            801 | 802 => Self::PartlyCloudy,
            803 | 804 => Self::Cloudy,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

/// Condition code/label pair as reported by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub code: i32,
    pub label: String,
    pub description: String,
}

impl Condition {
    pub fn category(&self) -> WeatherCondition {
        WeatherCondition::from_owm_code(self.code)
    }
}

/// Current conditions for one place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: Option<Condition>,
    pub fetched_at: DateTime<Utc>,
}

impl CurrentConditions {
    /// "Name, Country", skipping empty parts
    pub fn display_name(&self) -> String {
        join_display(&[Some(self.name.as_str()), self.country.as_deref()])
    }
}

/// Join the non-empty parts of a place description with ", "
pub(crate) fn join_display(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

const LOCATION_FALLBACK_MESSAGE: &str = "Could not determine location.";

/// Location service errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    /// Provider failure; the message is kept verbatim
    #[error("{0}")]
    Provider(String),
    #[error("Location request cancelled")]
    Cancelled,
    #[error("Could not determine location")]
    Undetermined,
}

impl LocationError {
    /// Whether this is the transient "location unknown" condition worth retrying
    pub fn is_transient(&self) -> bool {
        crate::location::is_transient_location_unknown(self)
    }

    /// Message for display. Provider messages are shown as-is; the generic
    /// fallback only covers failures that carry no detail.
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            LocationError::PermissionDenied => "Location permission required.".into(),
            LocationError::ServiceUnavailable => "Location services are unavailable.".into(),
            LocationError::Timeout => {
                "Finding your location took too long. Please try again.".into()
            }
            LocationError::Cancelled => "Location request cancelled.".into(),
            LocationError::Provider(msg) if !msg.trim().is_empty() => msg.clone().into(),
            LocationError::Provider(_) | LocationError::Undetermined => {
                LOCATION_FALLBACK_MESSAGE.into()
            }
        }
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Please enter a location")]
    EmptyQuery,
    #[error("Location not found: {0}")]
    NotFound(String),
    #[error("Request failed: {status}")]
    RequestFailed { status: u16 },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No weather API key configured")]
    MissingApiKey,
}

impl WeatherError {
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            WeatherError::EmptyQuery => "Please enter a location.".into(),
            WeatherError::NotFound(_) => "Location not found.".into(),
            WeatherError::RequestFailed { status: 401 } => {
                "Weather API key is invalid (401). Check settings.".into()
            }
            WeatherError::RequestFailed { status } => {
                format!("Weather request failed: {}", status).into()
            }
            WeatherError::Network(_) => "Unable to connect. Check your internet connection.".into(),
            WeatherError::Parse(_) => "Received an unexpected response. Please try again.".into(),
            WeatherError::MissingApiKey => "No weather API key configured. Check settings.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owm_code_thunderstorm() {
        assert_eq!(WeatherCondition::from_owm_code(200), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_owm_code(232), WeatherCondition::Thunderstorm);
    }

    #[test]
    fn test_owm_code_drizzle() {
        assert_eq!(WeatherCondition::from_owm_code(300), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::from_owm_code(321), WeatherCondition::Drizzle);
    }

    #[test]
    fn test_owm_code_rain_variants() {
        assert_eq!(WeatherCondition::from_owm_code(500), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_owm_code(521), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_owm_code(502), WeatherCondition::HeavyRain);
        assert_eq!(WeatherCondition::from_owm_code(531), WeatherCondition::HeavyRain);
        assert_eq!(WeatherCondition::from_owm_code(511), WeatherCondition::Sleet);
    }

    #[test]
    fn test_owm_code_snow_and_sleet() {
        assert_eq!(WeatherCondition::from_owm_code(600), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_owm_code(622), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_owm_code(611), WeatherCondition::Sleet);
        assert_eq!(WeatherCondition::from_owm_code(616), WeatherCondition::Sleet);
    }

    #[test]
    fn test_owm_code_clouds() {
        assert_eq!(WeatherCondition::from_owm_code(800), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_owm_code(801), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_owm_code(802), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_owm_code(803), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_owm_code(804), WeatherCondition::Cloudy);
    }

    #[test]
    fn test_owm_code_atmosphere() {
        assert_eq!(WeatherCondition::from_owm_code(701), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_owm_code(781), WeatherCondition::Fog);
    }

    #[test]
    fn test_owm_code_unknown_defaults_to_clear() {
        assert_eq!(WeatherCondition::from_owm_code(999), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_owm_code(-1), WeatherCondition::Clear);
    }

    #[test]
    fn test_display_name_skips_missing_country() {
        let mut conditions = CurrentConditions {
            name: "Munich".to_string(),
            country: Some("DE".to_string()),
            temperature: 20.0,
            feels_like: 19.5,
            temp_min: 18.0,
            temp_max: 24.0,
            humidity: 50,
            wind_speed: 3.2,
            condition: None,
            fetched_at: Utc::now(),
        };
        assert_eq!(conditions.display_name(), "Munich, DE");

        conditions.country = None;
        assert_eq!(conditions.display_name(), "Munich");

        conditions.country = Some(String::new());
        assert_eq!(conditions.display_name(), "Munich");
    }

    #[test]
    fn test_provider_error_keeps_message() {
        let err = LocationError::Provider("kCLErrorLocationUnknown".into());
        assert_eq!(err.to_string(), "kCLErrorLocationUnknown");
        assert!(err.is_transient());
        assert!(!LocationError::PermissionDenied.is_transient());
    }

    #[test]
    fn test_location_user_messages() {
        assert_eq!(
            LocationError::PermissionDenied.user_message(),
            "Location permission required."
        );
        assert_eq!(
            LocationError::Undetermined.user_message(),
            "Could not determine location."
        );
    }

    #[test]
    fn test_provider_user_message_keeps_detail() {
        assert_eq!(
            LocationError::Provider("Location services are disabled".into()).user_message(),
            "Location services are disabled"
        );
        assert_eq!(
            LocationError::Provider("  ".into()).user_message(),
            "Could not determine location."
        );
    }

    #[test]
    fn test_weather_user_messages() {
        assert_eq!(WeatherError::NotFound("x".into()).user_message(), "Location not found.");
        assert!(WeatherError::RequestFailed { status: 401 }
            .user_message()
            .contains("API key"));
        assert_eq!(
            WeatherError::RequestFailed { status: 503 }.user_message(),
            "Weather request failed: 503"
        );
    }
}
