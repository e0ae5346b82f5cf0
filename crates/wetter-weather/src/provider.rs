//! OpenWeatherMap current-conditions client.
//!
//! One GET per lookup, no retry and no caching.

use crate::types::{Condition, CurrentConditions, Position, WeatherError};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use wetter_core::WeatherConfig;

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    main: OwmMain,
    wind: Option<OwmWind>,
    sys: Option<OwmSys>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    id: i32,
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: Option<String>,
}

impl From<OwmResponse> for CurrentConditions {
    fn from(body: OwmResponse) -> Self {
        let condition = body.weather.into_iter().next().map(|w| Condition {
            code: w.id,
            label: w.main,
            description: w.description,
        });

        Self {
            name: body.name,
            country: body.sys.and_then(|s| s.country),
            temperature: body.main.temp,
            feels_like: body.main.feels_like,
            temp_min: body.main.temp_min,
            temp_max: body.main.temp_max,
            humidity: body.main.humidity,
            wind_speed: body.wind.map_or(0.0, |w| w.speed),
            condition,
            fetched_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
    units: String,
}

impl WeatherProvider {
    /// A blank or missing `api_key` is reported by the first lookup, not here,
    /// so the saved-list and theme operations keep working without one.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        units: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            units: units.into(),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::new(
            config.base_url.as_str(),
            config.api_key.as_deref(),
            config.units.as_str(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Current conditions for a place name. A 404 means the place is unknown.
    pub async fn fetch_by_name(&self, name: &str) -> Result<CurrentConditions, WeatherError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }

        match self.fetch(&[("q", name.to_string())]).await {
            Err(WeatherError::RequestFailed { status }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(WeatherError::NotFound(name.to_string()))
            }
            other => other,
        }
    }

    /// Current conditions at a position
    pub async fn fetch_by_coords(&self, position: &Position) -> Result<CurrentConditions, WeatherError> {
        self.fetch(&[
            ("lat", position.latitude.to_string()),
            ("lon", position.longitude.to_string()),
        ])
        .await
    }

    async fn fetch(&self, query: &[(&str, String)]) -> Result<CurrentConditions, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = format!("{}/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("units", self.units.as_str()), ("appid", api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Weather request returned status {}", status);
            return Err(WeatherError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body: OwmResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        tracing::info!("Fetched weather for {}", body.name);
        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_without_api_key_fails_before_request() {
        let config = WeatherConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: Some("   ".to_string()),
            ..WeatherConfig::default()
        };
        let provider = WeatherProvider::from_config(&config).unwrap();
        assert!(provider.api_key.is_none());
        assert!(matches!(
            provider.fetch_by_name("Berlin").await,
            Err(WeatherError::MissingApiKey)
        ));
        assert!(matches!(
            provider.fetch_by_coords(&Position::new(1.0, 2.0)).await,
            Err(WeatherError::MissingApiKey)
        ));
    }

    #[test]
    fn test_from_config_keeps_trimmed_key() {
        let config = WeatherConfig {
            api_key: Some(" abc ".to_string()),
            ..WeatherConfig::default()
        };
        let provider = WeatherProvider::from_config(&config).unwrap();
        assert_eq!(provider.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let provider =
            WeatherProvider::new("http://localhost:1", Some("   "), "metric", Duration::from_secs(1))
                .unwrap();
        assert_eq!(provider.api_key, None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let provider =
            WeatherProvider::new("http://localhost:1/", Some("key"), "metric", Duration::from_secs(1))
                .unwrap();
        assert_eq!(provider.base_url, "http://localhost:1");
    }

    #[tokio::test]
    async fn test_blank_name_makes_no_request() {
        let provider =
            WeatherProvider::new("http://127.0.0.1:9", Some("key"), "metric", Duration::from_secs(1))
                .unwrap();
        assert!(matches!(
            provider.fetch_by_name("  ").await,
            Err(WeatherError::EmptyQuery)
        ));
    }

    #[test]
    fn test_response_mapping() {
        let body: OwmResponse = serde_json::from_value(serde_json::json!({
            "name": "Munich",
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
            "main": { "temp": 20.0, "feels_like": 19.0, "temp_min": 18.0, "temp_max": 24.0, "humidity": 50 },
            "sys": { "country": "DE" }
        }))
        .unwrap();

        let conditions = CurrentConditions::from(body);
        assert_eq!(conditions.display_name(), "Munich, DE");
        assert_eq!(conditions.wind_speed, 0.0);
        let condition = conditions.condition.unwrap();
        assert_eq!(condition.code, 800);
        assert_eq!(condition.label, "Clear");
    }
}
