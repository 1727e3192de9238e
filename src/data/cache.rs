use std::hash::Hash;
use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use lru::LruCache;

use crate::resilience::freshness::{FreshnessPolicy, FreshnessState, evaluate_freshness};

const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    fetched_at: DateTime<Utc>,
}

/// Bounded response cache. Entries past their policy's expiry are dropped on lookup.
#[derive(Debug)]
pub struct ResponseCache<K: Hash + Eq, V> {
    entries: LruCache<K, Entry<V>>,
    policy: FreshnessPolicy,
}

impl<K: Hash + Eq, V: Clone> ResponseCache<K, V> {
    #[must_use]
    pub fn new(policy: FreshnessPolicy) -> Self {
        Self::with_capacity(
            policy,
            NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        )
    }

    #[must_use]
    pub fn with_capacity(policy: FreshnessPolicy, capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            policy,
        }
    }

    pub fn get(&mut self, key: &K, now: DateTime<Utc>) -> Option<(V, FreshnessState)> {
        let fetched_at = self.entries.get(key)?.fetched_at;
        match evaluate_freshness(fetched_at, now, self.policy) {
            FreshnessState::Expired => {
                self.entries.pop(key);
                None
            }
            state => self
                .entries
                .peek(key)
                .map(|entry| (entry.value.clone(), state)),
        }
    }

    pub fn insert(&mut self, key: K, value: V, now: DateTime<Utc>) {
        self.entries.put(
            key,
            Entry {
                value,
                fetched_at: now,
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
