use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::resilience::backoff::Backoff;

/// Failure taxonomy shared by every remote call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error. Please check your connection.")]
    Network,
    #[error("Too many requests. Please try again later.")]
    RateLimited,
    #[error("Server error. Please try again later.")]
    Server { status: u16 },
    #[error("{message}")]
    Unknown {
        status: Option<u16>,
        message: String,
    },
    #[error("Unexpected response from the weather service.")]
    Decode,
}

impl ApiError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Network | ApiError::RateLimited | ApiError::Server { .. }
        )
    }

    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            ApiError::RateLimited
        } else if status.is_server_error() {
            ApiError::Server {
                status: status.as_u16(),
            }
        } else {
            ApiError::Unknown {
                status: Some(status.as_u16()),
                message: format!("Request failed with status {status}"),
            }
        }
    }

    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(status);
        }
        if err.is_decode() {
            return ApiError::Decode;
        }
        if err.is_timeout() || err.is_connect() || err.is_request() {
            return ApiError::Network;
        }
        ApiError::Unknown {
            status: None,
            message: "An unexpected error occurred.".to_string(),
        }
    }
}

/// Retry schedule for data fetches: a fixed attempt budget with capped doubling delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.base_delay_ms, self.max_delay_ms)
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "falling back to default http client");
            Client::new()
        })
}

/// Sends a request and decodes JSON, retrying retryable failures per `policy`.
/// `make_request` is called once per attempt.
pub(crate) async fn send_json<T, F>(policy: RetryPolicy, mut make_request: F) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    F: FnMut() -> RequestBuilder,
{
    let mut backoff = policy.backoff();
    let mut attempt = 0;
    loop {
        match send_once(make_request()).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = backoff.next_delay();
                warn!(%err, attempt, delay_ms = delay, "retrying request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            Err(err) => return Err(err),
        }
    }
}

async fn send_once<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|err| ApiError::from_transport(&err))?;
    debug!(url = %response.url(), status = %response.status(), "response received");

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::from_status(status));
    }
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::from_transport(&err))
}
