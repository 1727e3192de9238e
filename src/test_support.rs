use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::domain::weather::{
    CurrentConditions, DailySeries, ForecastSnapshot, HourlySeries, Location,
};

pub(crate) fn london_location() -> Location {
    Location {
        id: 2_643_743,
        name: "London".to_string(),
        latitude: 51.50853,
        longitude: -0.12574,
        country: Some("United Kingdom".to_string()),
        country_code: Some("GB".to_string()),
        admin1: Some("England".to_string()),
        timezone: Some("Europe/London".to_string()),
        population: Some(8_961_989),
    }
}

pub(crate) fn paris_location() -> Location {
    Location {
        id: 2_988_507,
        name: "Paris".to_string(),
        latitude: 48.85341,
        longitude: 2.3488,
        country: Some("France".to_string()),
        country_code: Some("FR".to_string()),
        admin1: Some("Île-de-France".to_string()),
        timezone: Some("Europe/Paris".to_string()),
        population: Some(2_138_551),
    }
}

/// Numbered test locations with distinct ids.
pub(crate) fn location(id: u64) -> Location {
    Location {
        id,
        name: format!("Town {id}"),
        latitude: 10.0 + id as f64 * 0.1,
        longitude: 20.0,
        country: Some("Testland".to_string()),
        country_code: Some("TL".to_string()),
        admin1: None,
        timezone: Some("UTC".to_string()),
        population: Some(1_000 * id),
    }
}

/// Seven days starting Saturday 2024-06-01, UTC, with every column populated.
pub(crate) fn sample_snapshot() -> ForecastSnapshot {
    let start = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
    let days: Vec<NaiveDate> = (0..7).map(|i| start + Duration::days(i)).collect();

    let daily = DailySeries {
        time: days.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect(),
        weather_code: vec![Some(2), Some(61), Some(3), Some(0), Some(80), Some(95), Some(1)],
        temperature_2m_max: (0..7).map(|i| Some(21.0 + f64::from(i))).collect(),
        temperature_2m_min: (0..7).map(|i| Some(12.0 + f64::from(i))).collect(),
        apparent_temperature_max: (0..7).map(|i| Some(20.0 + f64::from(i))).collect(),
        precipitation_sum: (0..7).map(|i| Some(0.4 * f64::from(i))).collect(),
        precipitation_probability_max: vec![
            Some(10.0),
            Some(20.0),
            Some(35.0),
            Some(5.0),
            Some(60.0),
            Some(80.0),
            Some(15.0),
        ],
        relative_humidity_2m_mean: (0..7).map(|i| Some(55.0 + f64::from(i))).collect(),
        wind_speed_10m_max: (0..7).map(|i| Some(15.0 + f64::from(i))).collect(),
        wind_direction_10m_dominant: (0..7).map(|i| Some(45.0 * f64::from(i))).collect(),
        wind_gusts_10m_max: (0..7).map(|i| Some(30.0 + f64::from(i))).collect(),
        uv_index_max: (0..7).map(|i| Some(5.0 + 0.5 * f64::from(i))).collect(),
        pressure_msl_mean: (0..7).map(|i| Some(1010.0 + f64::from(i))).collect(),
        cloud_cover_mean: (0..7).map(|i| Some(10.0 * f64::from(i))).collect(),
        sunrise: days
            .iter()
            .map(|d| Some(format!("{}T05:30", d.format("%Y-%m-%d"))))
            .collect(),
        sunset: days
            .iter()
            .map(|d| Some(format!("{}T20:45", d.format("%Y-%m-%d"))))
            .collect(),
        daylight_duration: vec![Some(54_900.0); 7],
    };

    let hours = days
        .iter()
        .flat_map(|d| (0..24).map(move |h| format!("{}T{h:02}:00", d.format("%Y-%m-%d"))))
        .collect::<Vec<_>>();
    let hour_count = hours.len();
    let hourly = HourlySeries {
        time: hours,
        temperature_2m: (0..hour_count).map(|i| Some(10.0 + (i % 24) as f64 / 2.0)).collect(),
        weather_code: vec![Some(1); hour_count],
        precipitation_probability: vec![Some(10.0); hour_count],
        is_day: (0..hour_count)
            .map(|i| Some(u8::from((6..21).contains(&(i % 24)))))
            .collect(),
    };

    let current = CurrentConditions {
        time: Some("2024-06-01T12:00".to_string()),
        temperature_2m: Some(18.4),
        relative_humidity_2m: Some(62.0),
        apparent_temperature: Some(17.6),
        is_day: Some(1),
        precipitation: Some(0.2),
        weather_code: Some(2),
        wind_speed_10m: Some(12.6),
        wind_direction_10m: Some(225.0),
        wind_gusts_10m: Some(24.1),
        uv_index: Some(4.2),
        pressure_msl: Some(1012.0),
        cloud_cover: Some(40.0),
        visibility: Some(24_140.0),
    };

    let current_units = HashMap::from([
        ("temperature_2m".to_string(), "°C".to_string()),
        ("apparent_temperature".to_string(), "°C".to_string()),
        ("wind_speed_10m".to_string(), "km/h".to_string()),
        ("precipitation".to_string(), "mm".to_string()),
    ]);

    ForecastSnapshot {
        latitude: 51.5,
        longitude: -0.125,
        timezone: Some("GMT".to_string()),
        timezone_abbreviation: Some("GMT".to_string()),
        utc_offset_seconds: 0,
        current: Some(current),
        current_units,
        hourly: Some(hourly),
        daily: Some(daily),
    }
}
