//! Independent persisted stores. Each one is a plain value with a mutating API and
//! an explicit load/save boundary in [`persist`].

pub mod favorites;
pub mod persist;
pub mod preferences;
pub mod recents;
pub mod theme;

pub use favorites::{AddOutcome, FavoriteLocation, Favorites, MAX_FAVORITES};
pub use persist::StateDir;
pub use preferences::Preferences;
pub use recents::{MAX_RECENTS, RecentLocations};
pub use theme::{Theme, ThemeMode, ThemePreference, system_prefers_dark};
