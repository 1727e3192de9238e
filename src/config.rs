use std::{path::PathBuf, time::Duration};

use crate::{
    data::{
        chat::{API_KEY_ENV, CHAT_MODEL, CHAT_TIMEOUT, CHAT_URL, ChatClient},
        client::RetryPolicy,
        forecast::{FORECAST_DAYS, FORECAST_URL, ForecastClient},
        geocode::{GEOCODE_URL, GeocodeClient},
    },
    store::StateDir,
};

pub const CONFIG_DIR_ENV: &str = "SKYLINE_CONFIG_DIR";
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Runtime configuration: endpoints, timeouts, and where state lives.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub forecast_url: String,
    pub geocode_url: String,
    pub chat_url: String,
    pub chat_model: String,
    pub chat_api_key: Option<String>,
    pub request_timeout: Duration,
    pub chat_timeout: Duration,
    pub retry: RetryPolicy,
    pub forecast_days: u8,
    pub max_search_results: usize,
    pub search_debounce: Duration,
    pub state_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            forecast_url: FORECAST_URL.to_string(),
            geocode_url: GEOCODE_URL.to_string(),
            chat_url: CHAT_URL.to_string(),
            chat_model: CHAT_MODEL.to_string(),
            chat_api_key: None,
            request_timeout: Duration::from_secs(10),
            chat_timeout: CHAT_TIMEOUT,
            retry: RetryPolicy::default(),
            forecast_days: FORECAST_DAYS,
            max_search_results: MAX_SEARCH_RESULTS,
            search_debounce: SEARCH_DEBOUNCE,
            state_dir: None,
        }
    }
}

impl AppConfig {
    /// Defaults plus whatever the environment provides.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            chat_api_key: std::env::var(API_KEY_ENV).ok(),
            state_dir: default_state_dir(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn state_dir(&self) -> Option<StateDir> {
        self.state_dir.clone().map(StateDir::new)
    }

    #[must_use]
    pub fn forecast_client(&self) -> ForecastClient {
        ForecastClient::with_base_url(&self.forecast_url)
            .with_timeout(self.request_timeout)
            .with_retry(self.retry)
    }

    #[must_use]
    pub fn geocode_client(&self) -> GeocodeClient {
        GeocodeClient::with_base_url(&self.geocode_url)
            .with_timeout(self.request_timeout)
            .with_retry(self.retry)
    }

    #[must_use]
    pub fn chat_client(&self) -> ChatClient {
        ChatClient::with_base_url(&self.chat_url, self.chat_api_key.clone())
            .with_model(&self.chat_model)
            .with_timeout(self.chat_timeout)
    }
}

fn default_state_dir() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(base));
    }
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config").join("skyline"))
}
