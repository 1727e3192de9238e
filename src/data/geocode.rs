use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::client::{ApiError, RetryPolicy, build_http_client, send_json};
use crate::domain::weather::Location;

pub const GEOCODE_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Queries shorter than this never reach the network.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl GeocodeClient {
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

    /// Ranked candidates for a free-text place name. An absent or empty result
    /// list is an empty `Vec`, not an error.
    pub async fn search(&self, query: &str, count: usize) -> Result<Vec<Location>, ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let count = count.to_string();
        let payload: GeocodeResponse = send_json(self.retry, || {
            self.client.get(&self.base_url).query(&[
                ("name", query),
                ("count", count.as_str()),
                ("language", "en"),
                ("format", "json"),
            ])
        })
        .await?;

        let results = payload.results.unwrap_or_default();
        debug!(query, results = results.len(), "geocode resolved");
        Ok(rank_locations(results, query))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    id: u64,
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    country_code: Option<String>,
    admin1: Option<String>,
    timezone: Option<String>,
    population: Option<u64>,
}

impl From<GeocodeResult> for Location {
    fn from(entry: GeocodeResult) -> Self {
        Location {
            id: entry.id,
            name: entry.name,
            latitude: entry.latitude,
            longitude: entry.longitude,
            country: entry.country,
            country_code: entry.country_code,
            admin1: entry.admin1,
            timezone: entry.timezone,
            population: entry.population,
        }
    }
}

fn rank_locations(results: Vec<GeocodeResult>, query: &str) -> Vec<Location> {
    let normalized_query = normalize(query);

    let mut scored: Vec<(bool, u64, usize, Location)> = results
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let exact = normalize(&entry.name) == normalized_query;
            let population = entry.population.unwrap_or_default();
            (exact, population, idx, Location::from(entry))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| a.2.cmp(&b.2))
    });

    scored.into_iter().map(|(.., location)| location).collect()
}

/// True when the two best candidates are too close to pick one silently:
/// both match the query the same way and their populations are within 10%.
#[must_use]
pub fn is_ambiguous(query: &str, ranked: &[Location]) -> bool {
    let [top, second, ..] = ranked else {
        return false;
    };
    let query = normalize(query);
    if (normalize(&top.name) == query) != (normalize(&second.name) == query) {
        return false;
    }

    let p1 = top.population.unwrap_or_default().max(1) as f64;
    let p2 = second.population.unwrap_or_default().max(1) as f64;
    let ratio = if p1 >= p2 { p1 / p2 } else { p2 / p1 };
    ratio <= 1.10
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
