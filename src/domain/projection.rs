//! Resolves the metrics shown for a selected forecast day.
//!
//! Day 0 reads the current-instant fields. Any later day reads the matching
//! daily aggregate at the same index, falling back to the current-instant
//! value when the aggregate is missing. Visibility has no daily aggregate and
//! always reads the current instant.

use super::weather::{
    CurrentConditions, DailySeries, ForecastSnapshot, Units, at, cloud_cover_level,
    format_precipitation, format_pressure, format_temperature, format_visibility,
    format_wind_speed, get_wind_direction, round_metric, uv_level, visibility_level,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    FeelsLike,
    Humidity,
    WindSpeed,
    WindDirection,
    Precipitation,
    UvIndex,
    Pressure,
    CloudCover,
    Visibility,
    WindGusts,
}

impl Metric {
    pub const ALL: [Metric; 11] = [
        Metric::Temperature,
        Metric::FeelsLike,
        Metric::Humidity,
        Metric::WindSpeed,
        Metric::WindDirection,
        Metric::Precipitation,
        Metric::UvIndex,
        Metric::Pressure,
        Metric::CloudCover,
        Metric::Visibility,
        Metric::WindGusts,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

type CurrentAccessor = fn(&CurrentConditions) -> Option<f64>;
type DailyAccessor = fn(&DailySeries, usize) -> Option<f64>;

struct MetricSource {
    metric: Metric,
    current: CurrentAccessor,
    daily: Option<DailyAccessor>,
}

const METRIC_SOURCES: [MetricSource; 11] = [
    MetricSource {
        metric: Metric::Temperature,
        current: |c| c.temperature_2m,
        daily: Some(|d, i| at(&d.temperature_2m_max, i)),
    },
    MetricSource {
        metric: Metric::FeelsLike,
        current: |c| c.apparent_temperature,
        daily: Some(|d, i| at(&d.apparent_temperature_max, i)),
    },
    MetricSource {
        metric: Metric::Humidity,
        current: |c| c.relative_humidity_2m,
        daily: Some(|d, i| at(&d.relative_humidity_2m_mean, i)),
    },
    MetricSource {
        metric: Metric::WindSpeed,
        current: |c| c.wind_speed_10m,
        daily: Some(|d, i| at(&d.wind_speed_10m_max, i)),
    },
    MetricSource {
        metric: Metric::WindDirection,
        current: |c| c.wind_direction_10m,
        daily: Some(|d, i| at(&d.wind_direction_10m_dominant, i)),
    },
    MetricSource {
        metric: Metric::Precipitation,
        current: |c| c.precipitation,
        daily: Some(|d, i| at(&d.precipitation_sum, i)),
    },
    MetricSource {
        metric: Metric::UvIndex,
        current: |c| c.uv_index,
        daily: Some(|d, i| at(&d.uv_index_max, i)),
    },
    MetricSource {
        metric: Metric::Pressure,
        current: |c| c.pressure_msl,
        daily: Some(|d, i| at(&d.pressure_msl_mean, i)),
    },
    MetricSource {
        metric: Metric::CloudCover,
        current: |c| c.cloud_cover,
        daily: Some(|d, i| at(&d.cloud_cover_mean, i)),
    },
    MetricSource {
        metric: Metric::Visibility,
        current: |c| c.visibility,
        daily: None,
    },
    MetricSource {
        metric: Metric::WindGusts,
        current: |c| c.wind_gusts_10m,
        daily: Some(|d, i| at(&d.wind_gusts_10m_max, i)),
    },
];

/// Index into the daily arrays; 0 is today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectedDay(usize);

impl SelectedDay {
    pub const TODAY: SelectedDay = SelectedDay(0);

    /// Clamps into `0..day_count`; an empty forecast only admits today.
    #[must_use]
    pub fn clamped(day: usize, day_count: usize) -> Self {
        Self(day.min(day_count.saturating_sub(1)))
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    #[must_use]
    pub fn is_today(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayProjection {
    pub day: SelectedDay,
    /// True when values come from the current instant rather than day aggregates.
    pub uses_current: bool,
    values: [Option<f64>; 11],
}

impl DayProjection {
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values[metric.slot()]
    }

    pub fn available(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .iter()
            .filter_map(|metric| self.get(*metric).map(|value| (*metric, value)))
    }
}

#[must_use]
pub fn project_day(snapshot: &ForecastSnapshot, day: SelectedDay) -> DayProjection {
    let daily = snapshot.daily.as_ref().filter(|_| !day.is_today());
    let current = snapshot.current.as_ref();
    let mut values = [None; 11];

    for source in &METRIC_SOURCES {
        let from_current = current.and_then(source.current);
        let from_daily = daily
            .zip(source.daily)
            .and_then(|(series, accessor)| accessor(series, day.index()));
        values[source.metric.slot()] = from_daily.or(from_current);
    }

    DayProjection {
        day,
        uses_current: daily.is_none(),
        values,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricReading {
    pub metric: Metric,
    pub label: &'static str,
    pub value: String,
    pub detail: Option<&'static str>,
}

fn label_for(metric: Metric, uses_current: bool) -> &'static str {
    match (metric, uses_current) {
        (Metric::Temperature, true) => "Temperature",
        (Metric::Temperature, false) => "High",
        (Metric::FeelsLike, true) => "Feels Like",
        (Metric::FeelsLike, false) => "Max Feels Like",
        (Metric::Humidity, true) => "Humidity",
        (Metric::Humidity, false) => "Avg Humidity",
        (Metric::WindSpeed | Metric::WindDirection, true) => "Wind",
        (Metric::WindSpeed | Metric::WindDirection, false) => "Max Wind",
        (Metric::Precipitation, true) => "Precipitation",
        (Metric::Precipitation, false) => "Total Precip.",
        (Metric::UvIndex, true) => "UV Index",
        (Metric::UvIndex, false) => "Max UV Index",
        (Metric::Pressure, true) => "Pressure",
        (Metric::Pressure, false) => "Avg Pressure",
        (Metric::CloudCover, true) => "Cloud Cover",
        (Metric::CloudCover, false) => "Avg Cloud Cover",
        (Metric::Visibility, _) => "Visibility",
        (Metric::WindGusts, true) => "Wind Gusts",
        (Metric::WindGusts, false) => "Max Wind Gusts",
    }
}

/// Display rows for every available metric; unavailable metrics produce no row.
/// Wind direction is folded into the wind speed row.
#[must_use]
pub fn readings(projection: &DayProjection, units: &Units) -> Vec<MetricReading> {
    let mut rows = Vec::new();
    for (metric, value) in projection.available() {
        let (text, detail) = match metric {
            Metric::Temperature | Metric::FeelsLike => {
                (format_temperature(value, units.temperature), None)
            }
            Metric::Humidity => (format!("{}%", round_metric(value)), None),
            Metric::WindSpeed => {
                let speed = format_wind_speed(value, units.wind_speed);
                let text = match projection.get(Metric::WindDirection) {
                    Some(degrees) => format!("{speed} {}", get_wind_direction(degrees)),
                    None => speed,
                };
                (text, None)
            }
            Metric::WindDirection => continue,
            Metric::Precipitation => (format_precipitation(value, units.precipitation), None),
            Metric::UvIndex => {
                let level = uv_level(value);
                (round_metric(value).to_string(), Some(level.label()))
            }
            Metric::Pressure => (format_pressure(value, units), Some("Sea level")),
            Metric::CloudCover => (
                format!("{}%", round_metric(value)),
                Some(cloud_cover_level(value).label()),
            ),
            Metric::Visibility => (
                format_visibility(value, units),
                Some(visibility_level(value).label()),
            ),
            Metric::WindGusts => (format_wind_speed(value, units.wind_speed), None),
        };
        rows.push(MetricReading {
            metric,
            label: label_for(metric, projection.uses_current),
            value: text,
            detail,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_snapshot;

    #[test]
    fn today_reads_current_instant_fields() {
        let snapshot = sample_snapshot();
        let projection = project_day(&snapshot, SelectedDay::TODAY);

        assert!(projection.uses_current);
        assert_eq!(projection.get(Metric::Temperature), Some(18.4));
        assert_eq!(projection.get(Metric::Humidity), Some(62.0));
        assert_eq!(projection.get(Metric::Visibility), Some(24_140.0));
    }

    #[test]
    fn later_days_read_daily_aggregates_at_same_index() {
        let snapshot = sample_snapshot();
        let daily = snapshot.daily.as_ref().expect("daily");

        for day in 1..daily.len() {
            let projection = project_day(&snapshot, SelectedDay::clamped(day, daily.len()));
            assert!(!projection.uses_current);
            assert_eq!(
                projection.get(Metric::Temperature),
                daily.temperature_2m_max[day]
            );
            assert_eq!(
                projection.get(Metric::WindSpeed),
                daily.wind_speed_10m_max[day]
            );
            assert_eq!(
                projection.get(Metric::Humidity),
                daily.relative_humidity_2m_mean[day]
            );
            assert_eq!(projection.get(Metric::Pressure), daily.pressure_msl_mean[day]);
            assert_eq!(
                projection.get(Metric::CloudCover),
                daily.cloud_cover_mean[day]
            );
            assert_eq!(projection.get(Metric::UvIndex), daily.uv_index_max[day]);
            assert_eq!(
                projection.get(Metric::WindGusts),
                daily.wind_gusts_10m_max[day]
            );
            assert_eq!(projection.get(Metric::Visibility), Some(24_140.0));
        }
    }

    #[test]
    fn missing_aggregates_fall_back_to_current_instant() {
        let mut snapshot = sample_snapshot();
        let daily = snapshot.daily.as_mut().expect("daily");
        daily.pressure_msl_mean.clear();
        daily.uv_index_max[2] = None;

        let projection = project_day(&snapshot, SelectedDay::clamped(2, 7));
        assert_eq!(projection.get(Metric::Pressure), Some(1012.0));
        assert_eq!(projection.get(Metric::UvIndex), Some(4.2));
    }

    #[test]
    fn metrics_missing_everywhere_are_unavailable() {
        let mut snapshot = sample_snapshot();
        snapshot.current.as_mut().expect("current").cloud_cover = None;
        snapshot.daily.as_mut().expect("daily").cloud_cover_mean.clear();

        let projection = project_day(&snapshot, SelectedDay::clamped(3, 7));
        assert_eq!(projection.get(Metric::CloudCover), None);
        let rows = readings(&projection, &Units::metric());
        assert!(rows.iter().all(|row| row.metric != Metric::CloudCover));
    }

    #[test]
    fn no_daily_series_means_current_values_for_any_day() {
        let mut snapshot = sample_snapshot();
        snapshot.daily = None;
        let projection = project_day(&snapshot, SelectedDay::clamped(4, 7));
        assert!(projection.uses_current);
        assert_eq!(projection.get(Metric::Temperature), Some(18.4));
    }

    #[test]
    fn selected_day_clamps_into_range() {
        assert_eq!(SelectedDay::clamped(9, 7).index(), 6);
        assert_eq!(SelectedDay::clamped(3, 0).index(), 0);
        assert!(SelectedDay::clamped(0, 7).is_today());
    }

    #[test]
    fn readings_use_aggregate_labels_for_future_days() {
        let snapshot = sample_snapshot();
        let today = readings(&project_day(&snapshot, SelectedDay::TODAY), &Units::metric());
        let later = readings(
            &project_day(&snapshot, SelectedDay::clamped(1, 7)),
            &Units::metric(),
        );

        fn label(rows: &[MetricReading], metric: Metric) -> Option<&'static str> {
            rows.iter()
                .find(|row| row.metric == metric)
                .map(|row| row.label)
        }

        assert_eq!(label(&today, Metric::FeelsLike), Some("Feels Like"));
        assert_eq!(label(&later, Metric::FeelsLike), Some("Max Feels Like"));
        assert_eq!(label(&later, Metric::Visibility), Some("Visibility"));
        assert!(today.iter().all(|row| row.metric != Metric::WindDirection));
    }

    #[test]
    fn wind_row_carries_compass_direction() {
        let snapshot = sample_snapshot();
        let rows = readings(&project_day(&snapshot, SelectedDay::TODAY), &Units::metric());
        let wind = rows
            .iter()
            .find(|row| row.metric == Metric::WindSpeed)
            .expect("wind row");
        assert_eq!(wind.value, "13 km/h SW");
    }
}
