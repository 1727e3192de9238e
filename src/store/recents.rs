use serde::{Deserialize, Serialize};

use crate::domain::weather::Location;

pub const MAX_RECENTS: usize = 5;

/// Most-recent-first list of viewed locations, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentLocations {
    entries: Vec<Location>,
}

impl RecentLocations {
    pub fn add(&mut self, location: Location) {
        self.entries.retain(|existing| existing.id != location.id);
        self.entries.insert(0, location);
        self.entries.truncate(MAX_RECENTS);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn most_recent(&self) -> Option<&Location> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn normalize(&mut self) {
        let mut seen = Vec::with_capacity(self.entries.len());
        self.entries.retain(|location| {
            if seen.contains(&location.id) {
                false
            } else {
                seen.push(location.id);
                true
            }
        });
        self.entries.truncate(MAX_RECENTS);
    }
}
