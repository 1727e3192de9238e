#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    config::AppConfig,
    domain::weather::{PrecipitationUnit, TemperatureUnit, WindSpeedUnit},
    store::ThemeMode,
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TemperatureArg {
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum WindArg {
    Kmh,
    Ms,
    Mph,
    Kn,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PrecipitationArg {
    Mm,
    Inch,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
    Auto,
    Toggle,
}

impl From<TemperatureArg> for TemperatureUnit {
    fn from(value: TemperatureArg) -> Self {
        match value {
            TemperatureArg::Celsius => TemperatureUnit::Celsius,
            TemperatureArg::Fahrenheit => TemperatureUnit::Fahrenheit,
        }
    }
}

impl From<WindArg> for WindSpeedUnit {
    fn from(value: WindArg) -> Self {
        match value {
            WindArg::Kmh => WindSpeedUnit::Kmh,
            WindArg::Ms => WindSpeedUnit::Ms,
            WindArg::Mph => WindSpeedUnit::Mph,
            WindArg::Kn => WindSpeedUnit::Kn,
        }
    }
}

impl From<PrecipitationArg> for PrecipitationUnit {
    fn from(value: PrecipitationArg) -> Self {
        match value {
            PrecipitationArg::Mm => PrecipitationUnit::Mm,
            PrecipitationArg::Inch => PrecipitationUnit::Inch,
        }
    }
}

impl ThemeArg {
    /// `None` for `toggle`, which depends on the current mode.
    #[must_use]
    pub fn mode(self) -> Option<ThemeMode> {
        match self {
            ThemeArg::Light => Some(ThemeMode::Light),
            ThemeArg::Dark => Some(ThemeMode::Dark),
            ThemeArg::Auto => Some(ThemeMode::Auto),
            ThemeArg::Toggle => None,
        }
    }
}

#[derive(Debug, Parser, Clone)]
#[command(name = "skyline", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Forecast endpoint override
    #[arg(long, global = true)]
    pub forecast_url: Option<String>,

    /// Geocoding endpoint override
    #[arg(long, global = true)]
    pub geocode_url: Option<String>,

    /// Chat endpoint override
    #[arg(long, global = true)]
    pub chat_url: Option<String>,

    /// Directory for preferences, favorites and theme
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Search for a location by name
    Search {
        query: String,
        /// Maximum candidates
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=20))]
        count: u8,
    },
    /// Show the dashboard for a city (or the most recent location)
    Show(ShowArgs),
    /// Manage favorite locations
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
    /// List or clear recently viewed locations
    Recent {
        #[arg(long)]
        clear: bool,
    },
    /// Show or change units
    Units {
        #[command(subcommand)]
        action: Option<UnitsAction>,
    },
    /// Show or change the theme
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },
    /// Ask the weather assistant
    Chat {
        city: Option<String>,
        /// Send one message and exit instead of reading stdin
        #[arg(long, short)]
        message: Option<String>,
    },
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    pub city: Option<String>,

    /// Candidate to use when the name is ambiguous (1-based)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub pick: Option<u8>,

    /// Forecast day, 0 = today
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=6))]
    pub day: u8,

    /// Hourly rows to print
    #[arg(long, default_value_t = 12)]
    pub hours: usize,
}

#[derive(Debug, Subcommand, Clone)]
pub enum FavoritesAction {
    List,
    Add {
        city: String,
        #[arg(long)]
        nickname: Option<String>,
        /// Candidate to add (1-based)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
        pick: Option<u8>,
    },
    /// Remove by list position (1-based)
    Remove { position: usize },
    Rename { position: usize, nickname: String },
    /// Move an entry between list positions (1-based)
    Move { from: usize, to: usize },
}

#[derive(Debug, Subcommand, Clone)]
pub enum UnitsAction {
    Metric,
    Imperial,
    Toggle,
    Set {
        #[arg(long, value_enum)]
        temperature: Option<TemperatureArg>,
        #[arg(long, value_enum)]
        wind: Option<WindArg>,
        #[arg(long, value_enum)]
        precipitation: Option<PrecipitationArg>,
    },
}

impl Cli {
    /// Environment defaults overlaid with flag overrides.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        let mut config = AppConfig::from_env();
        if let Some(url) = &self.forecast_url {
            config.forecast_url.clone_from(url);
        }
        if let Some(url) = &self.geocode_url {
            config.geocode_url.clone_from(url);
        }
        if let Some(url) = &self.chat_url {
            config.chat_url.clone_from(url);
        }
        if let Some(dir) = &self.config_dir {
            config.state_dir = Some(dir.clone());
        }
        config
    }

    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "skyline_weather=warn",
            1 => "skyline_weather=info",
            _ => "skyline_weather=debug",
        }
    }
}

pub fn validate_nickname(nickname: &str) -> anyhow::Result<&str> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        anyhow::bail!("nickname must not be empty");
    }
    Ok(trimmed)
}
