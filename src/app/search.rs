//! Keystroke-to-request pipeline for location search.
//!
//! Input settles for a fixed window before a query is dispatched. Each dispatch
//! carries a generation token; a response is applied only when its token is the
//! latest one issued and its query still matches the input, so late replies for
//! superseded queries are dropped regardless of arrival order.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::debug;

use crate::{
    data::{
        cache::ResponseCache,
        client::ApiError,
        geocode::{GeocodeClient, MIN_QUERY_CHARS},
    },
    domain::weather::Location,
    resilience::freshness::{FreshnessPolicy, FreshnessState},
};

pub type SearchToken = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: SearchToken,
    pub query: String,
}

/// Anything that can turn a query into ranked candidates.
pub trait LocationSearch {
    fn search(
        &self,
        query: &str,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Location>, ApiError>> + Send;
}

impl LocationSearch for GeocodeClient {
    fn search(
        &self,
        query: &str,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Location>, ApiError>> + Send {
        GeocodeClient::search(self, query, count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Too short to search; suggestions were cleared.
    Cleared,
    /// A dispatch is due at the deadline unless more input arrives first.
    Scheduled(Instant),
}

/// Pure debounce and generation bookkeeping; time is passed in.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    window: Duration,
    input: String,
    deadline: Option<Instant>,
    latest: SearchToken,
}

impl SearchDebouncer {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            input: String::new(),
            deadline: None,
            latest: 0,
        }
    }

    pub fn input(&mut self, text: &str, now: Instant) -> InputOutcome {
        self.input = text.trim().to_string();
        if self.input.chars().count() < MIN_QUERY_CHARS {
            self.deadline = None;
            // Anything still in flight belongs to older input.
            self.latest += 1;
            return InputOutcome::Cleared;
        }
        let deadline = now + self.window;
        self.deadline = Some(deadline);
        InputOutcome::Scheduled(deadline)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.input
    }

    /// Issues the settled query once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.latest += 1;
        Some(SearchRequest {
            token: self.latest,
            query: self.input.clone(),
        })
    }

    #[must_use]
    pub fn accepts(&self, token: SearchToken, query: &str) -> bool {
        token == self.latest && query == self.input
    }
}

/// Debouncer plus the suggestion list it feeds and a short-lived result cache.
#[derive(Debug)]
pub struct SearchController {
    debouncer: SearchDebouncer,
    suggestions: Vec<Location>,
    in_flight: Option<SearchToken>,
    limit: usize,
    cache: ResponseCache<(String, usize), Vec<Location>>,
}

impl SearchController {
    /// `limit` is the candidate count requested from the geocoder.
    #[must_use]
    pub fn new(window: Duration, limit: usize) -> Self {
        Self {
            debouncer: SearchDebouncer::new(window),
            suggestions: Vec::new(),
            in_flight: None,
            limit,
            cache: ResponseCache::new(FreshnessPolicy::geocode()),
        }
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Applies to queries dispatched from now on.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
    }

    pub fn input(&mut self, text: &str, now: Instant) -> InputOutcome {
        let outcome = self.debouncer.input(text, now);
        if outcome == InputOutcome::Cleared {
            self.suggestions.clear();
            self.in_flight = None;
        }
        outcome
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    #[must_use]
    pub fn suggestions(&self) -> &[Location] {
        &self.suggestions
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.deadline().is_some() || self.in_flight.is_some()
    }

    /// Returns a request that must go to the network. A fresh cached answer is
    /// applied directly and yields `None`.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let request = self.debouncer.poll(now)?;
        let key = (request.query.clone(), self.limit);
        if let Some((cached, FreshnessState::Fresh)) = self.cache.get(&key, Utc::now()) {
            debug!(query = %request.query, "search served from cache");
            self.suggestions = cached;
            return None;
        }
        self.in_flight = Some(request.token);
        Some(request)
    }

    /// Applies a response if it is still current. Failures degrade to no suggestions.
    pub fn resolve(
        &mut self,
        token: SearchToken,
        query: &str,
        result: Result<Vec<Location>, ApiError>,
    ) -> bool {
        if self.in_flight == Some(token) {
            self.in_flight = None;
        }
        if let Ok(locations) = &result {
            self.cache
                .insert((query.to_string(), self.limit), locations.clone(), Utc::now());
        }
        if !self.debouncer.accepts(token, query) {
            debug!(token, query, "discarding superseded search response");
            return false;
        }
        self.suggestions = result.unwrap_or_else(|err| {
            debug!(%err, query, "search failed, showing no suggestions");
            Vec::new()
        });
        true
    }

    /// Runs the pending query to completion against `backend`: waits out the
    /// debounce window, then dispatches at most one request.
    pub async fn settle<S: LocationSearch>(&mut self, backend: &S) -> &[Location] {
        if let Some(deadline) = self.deadline() {
            tokio::time::sleep_until(deadline).await;
        }
        if let Some(request) = self.poll(Instant::now()) {
            let result = backend.search(&request.query, self.limit).await;
            self.resolve(request.token, &request.query, result);
        }
        &self.suggestions
    }
}
