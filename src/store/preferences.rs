use serde::{Deserialize, Serialize};

use super::RecentLocations;
use crate::domain::weather::Units;

/// Unit choice and recently viewed places, persisted together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub units: Units,
    pub recents: RecentLocations,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::TemperatureUnit;

    #[test]
    fn partial_document_fills_defaults() {
        let preferences: Preferences =
            serde_json::from_str(r#"{"units":{"temperature":"fahrenheit"}}"#).expect("parse");
        assert_eq!(preferences.units.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(preferences.units.wind_speed, Units::metric().wind_speed);
        assert!(preferences.recents.is_empty());
    }
}
