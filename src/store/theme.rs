use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl ThemeMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Auto => "auto",
        }
    }

    /// `Auto` follows the system preference when one is known, else dark.
    #[must_use]
    pub fn resolve(self, system_prefers_dark: Option<bool>) -> Theme {
        match self {
            ThemeMode::Light => Theme::Light,
            ThemeMode::Dark => Theme::Dark,
            ThemeMode::Auto => match system_prefers_dark {
                Some(false) => Theme::Light,
                _ => Theme::Dark,
            },
        }
    }

    /// Flips what is currently shown, pinning the result as an explicit mode.
    #[must_use]
    pub fn toggled(self, system_prefers_dark: Option<bool>) -> ThemeMode {
        match self.resolve(system_prefers_dark) {
            Theme::Dark => ThemeMode::Light,
            Theme::Light => ThemeMode::Dark,
        }
    }
}

/// Terminal background hint from `COLORFGBG` (`fg;bg`, bg 7 or 15 is light).
#[must_use]
pub fn system_prefers_dark() -> Option<bool> {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| parse_colorfgbg(&value))
}

fn parse_colorfgbg(value: &str) -> Option<bool> {
    let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(!matches!(background, 7 | 15))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemePreference {
    pub mode: ThemeMode,
}
