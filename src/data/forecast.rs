use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::client::{ApiError, RetryPolicy, build_http_client, send_json};
use crate::domain::weather::{ForecastSnapshot, Location, Units};

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const FORECAST_DAYS: u8 = 7;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,precipitation,weather_code,wind_speed_10m,wind_direction_10m,wind_gusts_10m,uv_index,pressure_msl,cloud_cover,visibility";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code,precipitation_probability,is_day";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,apparent_temperature_max,precipitation_sum,precipitation_probability_max,relative_humidity_2m_mean,wind_speed_10m_max,wind_direction_10m_dominant,wind_gusts_10m_max,uv_index_max,pressure_msl_mean,cloud_cover_mean,sunrise,sunset,daylight_duration";

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ForecastClient {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: build_http_client(Duration::from_secs(10)),
            base_url: base_url.into(),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    pub async fn fetch(
        &self,
        location: &Location,
        units: Units,
        days: u8,
    ) -> Result<ForecastSnapshot, ApiError> {
        let params = forecast_params(location, units, days);
        let snapshot: ForecastSnapshot =
            send_json(self.retry, || self.client.get(&self.base_url).query(&params)).await?;
        debug!(
            location = %location.name,
            days = snapshot.day_count(),
            "forecast loaded"
        );
        Ok(snapshot)
    }
}

fn forecast_params(location: &Location, units: Units, days: u8) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("current", CURRENT_FIELDS.to_string()),
        ("hourly", HOURLY_FIELDS.to_string()),
        ("daily", DAILY_FIELDS.to_string()),
        ("temperature_unit", units.temperature.as_query().to_string()),
        ("wind_speed_unit", units.wind_speed.as_query().to_string()),
        ("precipitation_unit", units.precipitation.as_query().to_string()),
        ("timezone", "auto".to_string()),
        ("forecast_days", days.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::london_location;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn params_carry_units_and_horizon() {
        let params = forecast_params(&london_location(), Units::imperial(), FORECAST_DAYS);
        assert_eq!(param(&params, "temperature_unit"), Some("fahrenheit"));
        assert_eq!(param(&params, "wind_speed_unit"), Some("mph"));
        assert_eq!(param(&params, "precipitation_unit"), Some("inch"));
        assert_eq!(param(&params, "forecast_days"), Some("7"));
        assert_eq!(param(&params, "timezone"), Some("auto"));
        assert_eq!(param(&params, "latitude"), Some("51.50853"));
    }

    #[test]
    fn daily_fields_cover_projection_columns() {
        for column in [
            "temperature_2m_max",
            "relative_humidity_2m_mean",
            "wind_speed_10m_max",
            "pressure_msl_mean",
            "cloud_cover_mean",
            "uv_index_max",
            "wind_gusts_10m_max",
            "daylight_duration",
        ] {
            assert!(DAILY_FIELDS.split(',').any(|field| field == column), "{column}");
        }
        assert!(!DAILY_FIELDS.contains("visibility"));
    }
}
