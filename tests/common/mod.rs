#![allow(dead_code)]

use std::{path::Path, time::Duration};

use skyline_weather::{config::AppConfig, data::client::RetryPolicy, domain::weather::Location};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const FORECAST_PATH: &str = "/v1/forecast";
pub const GEOCODE_PATH: &str = "/v1/search";
pub const CHAT_PATH: &str = "/v1beta/models/test-model:generateContent";

/// Millisecond delays so retry tests stay fast.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        base_delay_ms: 1,
        max_delay_ms: 5,
    }
}

pub fn config_for(server: &MockServer, state_dir: &Path) -> AppConfig {
    AppConfig {
        forecast_url: format!("{}{FORECAST_PATH}", server.uri()),
        geocode_url: format!("{}{GEOCODE_PATH}", server.uri()),
        chat_url: format!("{}/v1beta", server.uri()),
        chat_model: "test-model".to_string(),
        chat_api_key: Some("test-key".to_string()),
        retry: fast_retry(),
        search_debounce: Duration::from_millis(5),
        state_dir: Some(state_dir.to_path_buf()),
        ..AppConfig::default()
    }
}

pub fn london() -> Location {
    Location {
        id: 2_643_743,
        name: "London".to_string(),
        latitude: 51.50853,
        longitude: -0.12574,
        country: Some("United Kingdom".to_string()),
        country_code: Some("GB".to_string()),
        admin1: Some("England".to_string()),
        timezone: Some("Europe/London".to_string()),
        population: Some(8_961_989),
    }
}

pub fn geocode_payload() -> serde_json::Value {
    serde_json::json!({
        "results": [
            {
                "id": 6_058_560,
                "name": "London",
                "latitude": 42.98339,
                "longitude": -81.23304,
                "country": "Canada",
                "country_code": "CA",
                "admin1": "Ontario",
                "timezone": "America/Toronto",
                "population": 346_765
            },
            {
                "id": 2_643_743,
                "name": "London",
                "latitude": 51.50853,
                "longitude": -0.12574,
                "country": "United Kingdom",
                "country_code": "GB",
                "admin1": "England",
                "timezone": "Europe/London",
                "population": 8_961_989
            },
            {
                "id": 2_643_734,
                "name": "Londonderry County Borough",
                "latitude": 54.99721,
                "longitude": -7.30917,
                "country": "United Kingdom",
                "country_code": "GB",
                "admin1": "Northern Ireland",
                "population": 83_652
            }
        ],
        "generationtime_ms": 0.9
    })
}

pub fn springfield_payload() -> serde_json::Value {
    serde_json::json!({
        "results": [
            {
                "id": 4_250_542,
                "name": "Springfield",
                "latitude": 39.80172,
                "longitude": -89.64371,
                "country": "United States",
                "country_code": "US",
                "admin1": "Illinois",
                "population": 116_565
            },
            {
                "id": 4_409_896,
                "name": "Springfield",
                "latitude": 37.21533,
                "longitude": -93.29824,
                "country": "United States",
                "country_code": "US",
                "admin1": "Missouri",
                "population": 166_810
            },
            {
                "id": 4_951_788,
                "name": "Springfield",
                "latitude": 42.10148,
                "longitude": -72.58981,
                "country": "United States",
                "country_code": "US",
                "admin1": "Massachusetts",
                "population": 155_929
            }
        ]
    })
}

/// Seven days from 2024-06-01 at UTC+0, shaped like the forecast endpoint's response.
pub fn forecast_payload(current_temperature: f64) -> serde_json::Value {
    let days: Vec<String> = (1..=7).map(|day| format!("2024-06-{day:02}")).collect();
    let hours: Vec<String> = (0..168)
        .map(|hour| format!("2024-06-{:02}T{:02}:00", 1 + hour / 24, hour % 24))
        .collect();
    let sunrise: Vec<String> = days.iter().map(|d| format!("{d}T05:30")).collect();
    let sunset: Vec<String> = days.iter().map(|d| format!("{d}T20:45")).collect();

    serde_json::json!({
        "latitude": 51.5,
        "longitude": -0.12,
        "timezone": "GMT",
        "timezone_abbreviation": "GMT",
        "utc_offset_seconds": 0,
        "current_units": {
            "temperature_2m": "°C",
            "wind_speed_10m": "km/h",
            "precipitation": "mm"
        },
        "current": {
            "time": "2024-06-01T12:00",
            "temperature_2m": current_temperature,
            "relative_humidity_2m": 62,
            "apparent_temperature": 17.6,
            "is_day": 1,
            "precipitation": 0.0,
            "weather_code": 2,
            "wind_speed_10m": 12.6,
            "wind_direction_10m": 225,
            "wind_gusts_10m": 24.1,
            "uv_index": 4.2,
            "pressure_msl": 1012.0,
            "cloud_cover": 40,
            "visibility": 24140.0
        },
        "hourly": {
            "time": hours,
            "temperature_2m": vec![15.0; 168],
            "weather_code": vec![3; 168],
            "precipitation_probability": vec![10; 168],
            "is_day": vec![1; 168]
        },
        "daily": {
            "time": days,
            "weather_code": [2, 61, 3, 0, 80, 95, 1],
            "temperature_2m_max": [21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 27.0],
            "temperature_2m_min": [12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0],
            "apparent_temperature_max": [20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0],
            "precipitation_sum": [0.0, 4.2, 0.5, 0.0, 6.1, 12.0, 0.0],
            "precipitation_probability_max": [10, 20, 35, 5, 60, 80, 15],
            "relative_humidity_2m_mean": [60, 70, 65, 55, 75, 85, 58],
            "wind_speed_10m_max": [18.0, 22.0, 15.0, 10.0, 28.0, 35.0, 12.0],
            "wind_direction_10m_dominant": [225, 270, 180, 90, 315, 0, 45],
            "wind_gusts_10m_max": [30.0, 38.0, 25.0, 18.0, 45.0, 60.0, 20.0],
            "uv_index_max": [5.0, 3.0, 4.0, 7.0, 2.0, 1.0, 6.0],
            "pressure_msl_mean": [1012.0, 1008.0, 1010.0, 1018.0, 1004.0, 998.0, 1015.0],
            "cloud_cover_mean": [40, 85, 70, 10, 90, 95, 20],
            "sunrise": sunrise,
            "sunset": sunset,
            "daylight_duration": vec![54_900.0; 7]
        }
    })
}

pub async fn mount_forecast(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_geocode(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn requests_to(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}
