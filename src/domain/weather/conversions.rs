use chrono::{NaiveDate, NaiveDateTime};

use super::{TemperatureUnit, Units, WindSpeedUnit};

const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
const HPA_TO_INHG: f64 = 0.02953;
const METERS_PER_MILE: f64 = 1609.34;

/// 8-point compass label. Any finite input maps to a label; 360 wraps to N.
#[must_use]
pub fn get_wind_direction(degrees: f64) -> &'static str {
    let index = (degrees / 45.0).round().rem_euclid(8.0);
    // NaN falls through `as` to 0.
    COMPASS_POINTS[(index as usize) % COMPASS_POINTS.len()]
}

#[must_use]
pub fn round_metric(value: f64) -> i64 {
    value.round() as i64
}

#[must_use]
pub fn format_temperature(value: f64, unit: TemperatureUnit) -> String {
    format!("{}°{}", round_metric(value), unit.symbol())
}

#[must_use]
pub fn format_wind_speed(value: f64, unit: WindSpeedUnit) -> String {
    format!("{} {}", round_metric(value), unit.label())
}

#[must_use]
pub fn format_precipitation(value: f64, unit: super::PrecipitationUnit) -> String {
    format!("{value:.1} {}", unit.label())
}

#[must_use]
pub fn hpa_to_inhg(hpa: f64) -> f64 {
    hpa * HPA_TO_INHG
}

#[must_use]
pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}

#[must_use]
pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

#[must_use]
pub fn format_pressure(hpa: f64, units: &Units) -> String {
    if units.uses_metric_distances() {
        format!("{hpa:.0} hPa")
    } else {
        format!("{:.2} inHg", hpa_to_inhg(hpa))
    }
}

#[must_use]
pub fn format_visibility(meters: f64, units: &Units) -> String {
    if units.uses_metric_distances() {
        format!("{:.1} km", meters_to_km(meters))
    } else {
        format!("{:.1} mi", meters_to_miles(meters))
    }
}

/// Open-Meteo local timestamps, with or without seconds.
#[must_use]
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
