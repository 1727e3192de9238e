use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessState {
    /// Serve as-is.
    Fresh,
    /// Usable, but a refetch should be attempted first.
    Stale,
    /// Past retention; must not be served.
    Expired,
}

/// Age thresholds for a cached response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub stale_after: Duration,
    pub expire_after: Option<Duration>,
}

impl FreshnessPolicy {
    #[must_use]
    pub fn forecast() -> Self {
        Self {
            stale_after: Duration::minutes(5),
            expire_after: Some(Duration::minutes(10)),
        }
    }

    #[must_use]
    pub fn geocode() -> Self {
        Self {
            stale_after: Duration::minutes(1),
            expire_after: Some(Duration::minutes(10)),
        }
    }
}

#[must_use]
pub fn evaluate_freshness(
    fetched_at: DateTime<Utc>,
    now: DateTime<Utc>,
    policy: FreshnessPolicy,
) -> FreshnessState {
    let age = now - fetched_at;

    if policy.expire_after.is_some_and(|limit| age > limit) {
        FreshnessState::Expired
    } else if age > policy.stale_after {
        FreshnessState::Stale
    } else {
        FreshnessState::Fresh
    }
}
