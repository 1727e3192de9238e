use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::{Favorites, Preferences, ThemePreference};

const PREFERENCES_FILE: &str = "preferences.json";
const FAVORITES_FILE: &str = "favorites.json";
const THEME_FILE: &str = "theme.json";

/// Root directory holding the three persisted documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn preferences_path(&self) -> PathBuf {
        self.root.join(PREFERENCES_FILE)
    }

    #[must_use]
    pub fn favorites_path(&self) -> PathBuf {
        self.root.join(FAVORITES_FILE)
    }

    #[must_use]
    pub fn theme_path(&self) -> PathBuf {
        self.root.join(THEME_FILE)
    }

    #[must_use]
    pub fn load_preferences(&self) -> Preferences {
        let mut preferences: Preferences = load_or_default(&self.preferences_path());
        preferences.recents.normalize();
        preferences
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> anyhow::Result<()> {
        save_json(&self.preferences_path(), preferences)
    }

    #[must_use]
    pub fn load_favorites(&self) -> Favorites {
        let mut favorites: Favorites = load_or_default(&self.favorites_path());
        favorites.normalize();
        favorites
    }

    pub fn save_favorites(&self, favorites: &Favorites) -> anyhow::Result<()> {
        save_json(&self.favorites_path(), favorites)
    }

    #[must_use]
    pub fn load_theme(&self) -> ThemePreference {
        load_or_default(&self.theme_path())
    }

    pub fn save_theme(&self, theme: &ThemePreference) -> anyhow::Result<()> {
        save_json(&self.theme_path(), theme)
    }
}

/// A missing file or one that fails to parse yields the default value.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "no persisted state, using defaults");
            return T::default();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "ignoring unreadable persisted state");
        T::default()
    })
}

pub fn save_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating state directory failed")?;
    }
    let payload = serde_json::to_string_pretty(value).context("serializing state failed")?;
    fs::write(path, payload).with_context(|| format!("writing {} failed", path.display()))
}
