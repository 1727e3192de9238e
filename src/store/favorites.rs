use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::weather::Location;

pub const MAX_FAVORITES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub id: String,
    pub location: Location,
    #[serde(default)]
    pub nickname: Option<String>,
    pub order: usize,
    pub added_at: DateTime<Utc>,
}

impl FavoriteLocation {
    #[must_use]
    pub fn label(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.location.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    /// Store was full; nothing changed. The caller decides how to tell the user.
    AtCapacity,
}

/// Bounded, ordered favorites. `order` of the entries is always `0..len`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Favorites {
    #[serde(default)]
    favorites: Vec<FavoriteLocation>,
}

impl Favorites {
    pub fn add(&mut self, location: Location, nickname: Option<String>) -> AddOutcome {
        if self.is_favorite(location.id) {
            return AddOutcome::AlreadyPresent;
        }
        if self.favorites.len() >= MAX_FAVORITES {
            warn!(location = %location.name, "favorites at capacity");
            return AddOutcome::AtCapacity;
        }

        let added_at = Utc::now();
        info!(location = %location.name, "favorite added");
        self.favorites.push(FavoriteLocation {
            id: format!("fav-{}-{}", location.id, added_at.timestamp_millis()),
            order: self.favorites.len(),
            location,
            nickname,
            added_at,
        });
        AddOutcome::Added
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|favorite| favorite.id != id);
        let removed = self.favorites.len() != before;
        if removed {
            self.renumber();
        }
        removed
    }

    /// Nickname validation belongs to the caller; any text is stored as given.
    pub fn update_nickname(&mut self, id: &str, nickname: impl Into<String>) -> bool {
        match self.favorites.iter_mut().find(|favorite| favorite.id == id) {
            Some(favorite) => {
                favorite.nickname = Some(nickname.into());
                true
            }
            None => false,
        }
    }

    /// Moves the entry at `from` to `to`. Out-of-range indices leave the list untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.favorites.len();
        if from >= len || to >= len {
            return false;
        }
        let moved = self.favorites.remove(from);
        self.favorites.insert(to, moved);
        self.renumber();
        true
    }

    #[must_use]
    pub fn is_favorite(&self, location_id: u64) -> bool {
        self.lookup(location_id).is_some()
    }

    #[must_use]
    pub fn lookup(&self, location_id: u64) -> Option<&FavoriteLocation> {
        self.favorites
            .iter()
            .find(|favorite| favorite.location.id == location_id)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FavoriteLocation> {
        self.favorites.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FavoriteLocation> {
        self.favorites.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Restores the invariants on data read from disk: sorted by `order`,
    /// unique by location, bounded, renumbered.
    pub fn normalize(&mut self) {
        self.favorites.sort_by_key(|favorite| favorite.order);
        let mut seen = Vec::with_capacity(self.favorites.len());
        self.favorites.retain(|favorite| {
            if seen.contains(&favorite.location.id) {
                false
            } else {
                seen.push(favorite.location.id);
                true
            }
        });
        self.favorites.truncate(MAX_FAVORITES);
        self.renumber();
    }

    fn renumber(&mut self) {
        for (order, favorite) in self.favorites.iter_mut().enumerate() {
            favorite.order = order;
        }
    }
}
