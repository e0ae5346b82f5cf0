//! Integration tests for WeatherProvider and NominatimGeocoder using wiremock.

use std::time::Duration;

use wetter_weather::{NominatimGeocoder, Position, ReverseGeocoder, WeatherError, WeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn munich_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Munich",
        "weather": [{ "id": 801, "main": "Clouds", "description": "few clouds", "icon": "02d" }],
        "main": { "temp": 21.4, "feels_like": 20.9, "temp_min": 18.0, "temp_max": 24.0, "humidity": 48 },
        "wind": { "speed": 3.6 },
        "sys": { "country": "DE" }
    })
}

fn provider(server: &MockServer) -> WeatherProvider {
    WeatherProvider::new(server.uri(), Some("test-key"), "metric", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_by_name_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Munich"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(munich_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let conditions = provider(&mock_server).fetch_by_name("  Munich ").await.unwrap();

    assert_eq!(conditions.name, "Munich");
    assert_eq!(conditions.country.as_deref(), Some("DE"));
    assert_eq!(conditions.humidity, 48);
    assert_eq!(conditions.wind_speed, 3.6);
    assert_eq!(conditions.condition.unwrap().description, "few clouds");
}

#[tokio::test]
async fn test_fetch_by_name_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server).fetch_by_name("Atlantis").await.unwrap_err();

    assert!(matches!(err, WeatherError::NotFound(ref name) if name == "Atlantis"));
    assert_eq!(err.user_message(), "Location not found.");
}

#[tokio::test]
async fn test_fetch_by_name_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server).fetch_by_name("Berlin").await.unwrap_err();

    assert!(matches!(err, WeatherError::RequestFailed { status: 503 }));
    assert_eq!(err.user_message(), "Weather request failed: 503");
}

#[tokio::test]
async fn test_fetch_by_coords_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "48.137"))
        .and(query_param("lon", "11.575"))
        .respond_with(ResponseTemplate::new(200).set_body_json(munich_body()))
        .mount(&mock_server)
        .await;

    let conditions = provider(&mock_server)
        .fetch_by_coords(&Position::new(48.137, 11.575))
        .await
        .unwrap();

    assert_eq!(conditions.display_name(), "Munich, DE");
}

#[tokio::test]
async fn test_fetch_by_coords_404_is_plain_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server)
        .fetch_by_coords(&Position::new(0.0, 0.0))
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::RequestFailed { status: 404 }));
}

#[tokio::test]
async fn test_fetch_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server).fetch_by_name("Berlin").await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn test_reverse_geocode_prefers_city() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "48.137"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "München, Bayern, Deutschland",
            "address": {
                "city": "München",
                "county": "Oberbayern",
                "state": "Bayern",
                "country": "Deutschland"
            }
        })))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(format!("{}/reverse", mock_server.uri())).unwrap();
    let place = geocoder
        .reverse_geocode(&Position::new(48.137, 11.575))
        .await
        .unwrap();

    assert_eq!(place.display_name(), "München, Deutschland");
}

#[tokio::test]
async fn test_reverse_geocode_falls_back_to_town() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": { "town": "Baden", "country": "Schweiz" }
        })))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(format!("{}/reverse", mock_server.uri())).unwrap();
    let place = geocoder
        .reverse_geocode(&Position::new(47.47, 8.30))
        .await
        .unwrap();

    assert_eq!(place.city.as_deref(), Some("Baden"));
}

#[tokio::test]
async fn test_reverse_geocode_failure_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(format!("{}/reverse", mock_server.uri())).unwrap();
    assert!(geocoder
        .reverse_geocode(&Position::new(0.0, 0.0))
        .await
        .is_none());
}
