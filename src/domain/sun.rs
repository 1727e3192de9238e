use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use super::weather::{DailySeries, ForecastSnapshot, at, parse_datetime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursMinutes {
    pub hours: i64,
    pub minutes: i64,
}

impl HoursMinutes {
    pub const ZERO: HoursMinutes = HoursMinutes {
        hours: 0,
        minutes: 0,
    };

    fn from_minutes(total: i64) -> Self {
        let total = total.max(0);
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }

    fn from_seconds(total: f64) -> Self {
        if !total.is_finite() || total <= 0.0 {
            return Self::ZERO;
        }
        let seconds = total.floor() as i64;
        Self {
            hours: seconds / 3600,
            minutes: (seconds % 3600) / 60,
        }
    }
}

impl std::fmt::Display for HoursMinutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Where the sun sits between sunrise and sunset for one forecast day.
#[derive(Debug, Clone, PartialEq)]
pub struct SunPhase {
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
    pub sunrise_label: String,
    pub sunset_label: String,
    /// Elapsed fraction of daylight, clamped to `[0, 1]`.
    pub progress: f64,
    pub is_daytime: bool,
    pub has_passed_sunset: bool,
    pub remaining: HoursMinutes,
    pub daylight: HoursMinutes,
}

impl SunPhase {
    /// Point on a unit arc: x runs 0..1 from sunrise to sunset, y peaks at 1 at solar noon.
    #[must_use]
    pub fn arc_point(&self) -> (f64, f64) {
        (self.progress, (self.progress * std::f64::consts::PI).sin())
    }
}

/// `None` when either sunrise or sunset is missing; callers render nothing.
#[must_use]
pub fn sun_phase(
    sunrise: Option<NaiveDateTime>,
    sunset: Option<NaiveDateTime>,
    daylight_seconds: Option<f64>,
    now: NaiveDateTime,
) -> Option<SunPhase> {
    let (sunrise, sunset) = (sunrise?, sunset?);

    let day_length = (sunset - sunrise).num_seconds();
    let progress = if day_length <= 0 {
        if now >= sunset { 1.0 } else { 0.0 }
    } else {
        let elapsed = (now - sunrise).num_seconds() as f64;
        (elapsed / day_length as f64).clamp(0.0, 1.0)
    };

    let remaining = HoursMinutes::from_minutes((sunset - now).num_minutes());

    Some(SunPhase {
        sunrise,
        sunset,
        sunrise_label: format_clock(sunrise),
        sunset_label: format_clock(sunset),
        progress,
        is_daytime: now >= sunrise && now <= sunset,
        has_passed_sunset: now > sunset,
        remaining,
        daylight: daylight_seconds.map_or(HoursMinutes::ZERO, HoursMinutes::from_seconds),
    })
}

/// Sun phase for a daily entry, read at the location's local wall clock.
#[must_use]
pub fn sun_phase_for_day(
    snapshot: &ForecastSnapshot,
    day: usize,
    now_utc: DateTime<Utc>,
) -> Option<SunPhase> {
    let daily: &DailySeries = snapshot.daily.as_ref()?;
    sun_phase(
        timestamp_at(&daily.sunrise, day),
        timestamp_at(&daily.sunset, day),
        at(&daily.daylight_duration, day),
        local_now(snapshot, now_utc),
    )
}

#[must_use]
pub fn local_now(snapshot: &ForecastSnapshot, now_utc: DateTime<Utc>) -> NaiveDateTime {
    now_utc.naive_utc() + Duration::seconds(i64::from(snapshot.utc_offset_seconds))
}

fn timestamp_at(column: &[Option<String>], day: usize) -> Option<NaiveDateTime> {
    column
        .get(day)
        .and_then(Option::as_deref)
        .and_then(parse_datetime)
}

fn format_clock(time: NaiveDateTime) -> String {
    time.format("%I:%M %p").to_string()
}
