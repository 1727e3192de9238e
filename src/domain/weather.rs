use std::collections::HashMap;

use serde::{Deserialize, Serialize};

mod conditions;
mod conversions;

pub use conditions::{
    CloudCoverLevel, UvLevel, VisibilityLevel, WeatherCondition, WeatherIcon, cloud_cover_level,
    get_weather_condition, hourly_icon, uv_level, visibility_level,
};
pub use conversions::{
    format_precipitation, format_pressure, format_temperature, format_visibility,
    format_wind_speed, get_wind_direction, hpa_to_inhg, meters_to_km, meters_to_miles,
    parse_date, parse_datetime, round_metric,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kmh,
    Ms,
    Mph,
    Kn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
    Inch,
}

impl TemperatureUnit {
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

impl WindSpeedUnit {
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Kmh => "kmh",
            Self::Ms => "ms",
            Self::Mph => "mph",
            Self::Kn => "kn",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Kmh => "km/h",
            Self::Ms => "m/s",
            Self::Mph => "mph",
            Self::Kn => "kn",
        }
    }
}

impl PrecipitationUnit {
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Mm => "mm",
            Self::Inch => "inch",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mm => "mm",
            Self::Inch => "in",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

/// Unit preference triple sent with every forecast request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Units {
    pub temperature: TemperatureUnit,
    pub wind_speed: WindSpeedUnit,
    pub precipitation: PrecipitationUnit,
}

impl Units {
    #[must_use]
    pub fn metric() -> Self {
        Self {
            temperature: TemperatureUnit::Celsius,
            wind_speed: WindSpeedUnit::Kmh,
            precipitation: PrecipitationUnit::Mm,
        }
    }

    #[must_use]
    pub fn imperial() -> Self {
        Self {
            temperature: TemperatureUnit::Fahrenheit,
            wind_speed: WindSpeedUnit::Mph,
            precipitation: PrecipitationUnit::Inch,
        }
    }

    /// The temperature unit decides which system the triple counts as.
    #[must_use]
    pub fn system(&self) -> UnitSystem {
        match self.temperature {
            TemperatureUnit::Celsius => UnitSystem::Metric,
            TemperatureUnit::Fahrenheit => UnitSystem::Imperial,
        }
    }

    #[must_use]
    pub fn toggled(&self) -> Self {
        match self.system() {
            UnitSystem::Metric => Self::imperial(),
            UnitSystem::Imperial => Self::metric(),
        }
    }

    /// Pressure and visibility have no unit of their own; the precipitation
    /// unit stands in for the metric/imperial choice.
    #[must_use]
    pub fn uses_metric_distances(&self) -> bool {
        self.precipitation == PrecipitationUnit::Mm
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
}

impl Location {
    pub fn display_name(&self) -> String {
        match (&self.admin1, &self.country) {
            (Some(admin), Some(country)) => format!("{}, {}, {}", self.name, admin, country),
            (None, Some(country)) => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }

    /// Second line of a candidate row: region and country, whichever exist.
    pub fn subtitle(&self) -> String {
        [self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Identity of a forecast request. A response only applies while its key is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForecastKey {
    pub location_id: u64,
    pub units: Units,
}

impl ForecastKey {
    #[must_use]
    pub fn new(location: &Location, units: Units) -> Self {
        Self {
            location_id: location.id,
            units,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    pub time: Option<String>,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub is_day: Option<u8>,
    pub precipitation: Option<f64>,
    pub weather_code: Option<u16>,
    pub wind_speed_10m: Option<f64>,
    pub wind_direction_10m: Option<f64>,
    pub wind_gusts_10m: Option<f64>,
    pub uv_index: Option<f64>,
    pub pressure_msl: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub visibility: Option<f64>,
}

/// Hourly struct-of-arrays; every column is aligned by index with `time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub weather_code: Vec<Option<u16>>,
    pub precipitation_probability: Vec<Option<f64>>,
    pub is_day: Vec<Option<u8>>,
}

/// Daily struct-of-arrays; every column is aligned by index with `time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub weather_code: Vec<Option<u16>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub apparent_temperature_max: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub precipitation_probability_max: Vec<Option<f64>>,
    pub relative_humidity_2m_mean: Vec<Option<f64>>,
    pub wind_speed_10m_max: Vec<Option<f64>>,
    pub wind_direction_10m_dominant: Vec<Option<f64>>,
    pub wind_gusts_10m_max: Vec<Option<f64>>,
    pub uv_index_max: Vec<Option<f64>>,
    pub pressure_msl_mean: Vec<Option<f64>>,
    pub cloud_cover_mean: Vec<Option<f64>>,
    pub sunrise: Vec<Option<String>>,
    pub sunset: Vec<Option<String>>,
    pub daylight_duration: Vec<Option<f64>>,
}

impl DailySeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Null-coalescing positional lookup into a daily or hourly column.
#[must_use]
pub fn at<T: Copy>(column: &[Option<T>], idx: usize) -> Option<T> {
    column.get(idx).copied().flatten()
}

/// One forecast response, shaped the way the forecast endpoint returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSnapshot {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub utc_offset_seconds: i32,
    pub current: Option<CurrentConditions>,
    pub current_units: HashMap<String, String>,
    pub hourly: Option<HourlySeries>,
    pub daily: Option<DailySeries>,
}

impl ForecastSnapshot {
    #[must_use]
    pub fn day_count(&self) -> usize {
        self.daily.as_ref().map_or(0, DailySeries::len)
    }

    /// Unit label the API reported for a current-instant field.
    pub fn current_unit<'a>(&'a self, field: &str, fallback: &'a str) -> &'a str {
        self.current_units
            .get(field)
            .map_or(fallback, String::as_str)
    }

    /// Hourly rows whose timestamp falls on the given daily entry's date.
    pub fn hours_for_day(&self, day: usize) -> Vec<HourlyPoint> {
        let (Some(hourly), Some(daily)) = (&self.hourly, &self.daily) else {
            return Vec::new();
        };
        let Some(date) = daily.time.get(day) else {
            return Vec::new();
        };

        hourly
            .time
            .iter()
            .enumerate()
            .filter(|(_, time)| time.starts_with(date.as_str()))
            .filter_map(|(idx, time)| {
                Some(HourlyPoint {
                    time: parse_datetime(time)?,
                    temperature: at(&hourly.temperature_2m, idx),
                    weather_code: at(&hourly.weather_code, idx),
                    precipitation_probability: at(&hourly.precipitation_probability, idx),
                    is_day: at(&hourly.is_day, idx).map(|flag| flag != 0),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyPoint {
    pub time: chrono::NaiveDateTime,
    pub temperature: Option<f64>,
    pub weather_code: Option<u16>,
    pub precipitation_probability: Option<f64>,
    pub is_day: Option<bool>,
}
