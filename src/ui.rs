//! Plain-text rendering of the dashboard, candidate lists, stores, and chat.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::{
    data::client::ApiError,
    domain::{
        chat::{ChatMessage, ChatRole},
        projection::{Metric, SelectedDay, project_day, readings},
        sun::{SunPhase, sun_phase_for_day},
        weather::{
            ForecastSnapshot, Location, Units, at, format_temperature, get_weather_condition,
            hourly_icon, parse_date, round_metric, uv_level,
        },
    },
    store::{FavoriteLocation, Favorites, RecentLocations},
};

const ARC_WIDTH: usize = 24;

/// Everything the dashboard needs; borrowed from app state.
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    pub location: &'a Location,
    pub snapshot: &'a ForecastSnapshot,
    pub units: &'a Units,
    pub day: SelectedDay,
    pub is_favorite: bool,
    pub hours: usize,
}

#[must_use]
pub fn render_dashboard(view: &DashboardView<'_>, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let star = if view.is_favorite { " ★" } else { "" };
    let _ = writeln!(out, "{}{star}", view.location.name);
    let subtitle = view.location.subtitle();
    if !subtitle.is_empty() {
        let _ = writeln!(out, "{subtitle}");
    }
    let _ = writeln!(out, "{}", day_heading(view.snapshot, view.day));
    out.push('\n');

    if let Some(summary) = condition_line(view.snapshot, view.day, view.units) {
        let _ = writeln!(out, "{summary}");
    }

    let projection = project_day(view.snapshot, view.day);
    for reading in readings(&projection, view.units) {
        match reading.detail {
            Some(detail) => {
                let _ = writeln!(out, "  {:<16}{} ({detail})", reading.label, reading.value);
            }
            None => {
                let _ = writeln!(out, "  {:<16}{}", reading.label, reading.value);
            }
        }
    }
    if let Some(uv) = projection.get(Metric::UvIndex) {
        let _ = writeln!(out, "  {:<16}{}", "", uv_level(uv).advice());
    }

    if let Some(phase) = sun_phase_for_day(view.snapshot, view.day.index(), now) {
        out.push('\n');
        out.push_str(&render_sun(&phase, view.day.is_today()));
    }

    let hourly = render_hourly(view.snapshot, view.day, view.units, view.hours);
    if !hourly.is_empty() {
        out.push('\n');
        out.push_str(&hourly);
    }

    let daily = render_daily(view.snapshot, view.day, view.units);
    if !daily.is_empty() {
        out.push('\n');
        out.push_str(&daily);
    }
    out
}

fn day_heading(snapshot: &ForecastSnapshot, day: SelectedDay) -> String {
    let date = snapshot
        .daily
        .as_ref()
        .and_then(|daily| daily.time.get(day.index()))
        .and_then(|value| parse_date(value))
        .map(|date| date.format("%a %-d %b").to_string());
    match (day.is_today(), date) {
        (true, Some(date)) => format!("Today · {date}"),
        (true, None) => "Today".to_string(),
        (false, Some(date)) => date,
        (false, None) => format!("Day {}", day.index()),
    }
}

fn condition_line(snapshot: &ForecastSnapshot, day: SelectedDay, units: &Units) -> Option<String> {
    if day.is_today() {
        let current = snapshot.current.as_ref()?;
        let code = current.weather_code?;
        let is_day = current.is_day.is_none_or(|flag| flag != 0);
        let icon = hourly_icon(code, is_day);
        let condition = get_weather_condition(code);
        let temperature = current
            .temperature_2m
            .map(|t| format!("{}  ", format_temperature(t, units.temperature)))
            .unwrap_or_default();
        return Some(format!(
            "{} {temperature}{}",
            icon.glyph(),
            condition.description
        ));
    }

    let daily = snapshot.daily.as_ref()?;
    let code = at(&daily.weather_code, day.index())?;
    let condition = get_weather_condition(code);
    let range = match (
        at(&daily.temperature_2m_max, day.index()),
        at(&daily.temperature_2m_min, day.index()),
    ) {
        (Some(high), Some(low)) => format!("{}° / {}°  ", round_metric(high), round_metric(low)),
        _ => String::new(),
    };
    Some(format!(
        "{} {range}{}",
        condition.icon.glyph(),
        condition.description
    ))
}

/// Sunrise/sunset block with a one-line arc marker for today.
#[must_use]
pub fn render_sun(phase: &SunPhase, live: bool) -> String {
    let mut out = format!(
        "  Sunrise {}   Sunset {}   Daylight {}\n",
        phase.sunrise_label, phase.sunset_label, phase.daylight
    );
    if !live {
        return out;
    }
    let (x, altitude) = phase.arc_point();
    let marker = ((x * ARC_WIDTH as f64).round() as usize).min(ARC_WIDTH);
    // Low sun near the horizon gets a half disc.
    let glyph = if altitude >= 0.5 { '●' } else { '◒' };
    let arc: String = (0..=ARC_WIDTH)
        .map(|idx| if idx == marker { glyph } else { '·' })
        .collect();
    let status = if phase.has_passed_sunset {
        "Sun has set".to_string()
    } else if phase.is_daytime {
        format!("{} of daylight left", phase.remaining)
    } else {
        "Before sunrise".to_string()
    };
    let _ = writeln!(out, "  ☀ {arc} ☾  {status}");
    out
}

fn render_hourly(
    snapshot: &ForecastSnapshot,
    day: SelectedDay,
    units: &Units,
    limit: usize,
) -> String {
    if limit == 0 {
        return String::new();
    }
    let hours = snapshot.hours_for_day(day.index());
    if hours.is_empty() {
        return String::new();
    }

    let mut out = String::from("Hourly\n");
    for hour in hours.into_iter().take(limit) {
        let icon = hour
            .weather_code
            .map(|code| hourly_icon(code, hour.is_day.unwrap_or(true)).glyph())
            .unwrap_or(" ");
        let temperature = hour
            .temperature
            .map(|t| format_temperature(t, units.temperature))
            .unwrap_or_else(|| "--".to_string());
        let precipitation = hour
            .precipitation_probability
            .map(|p| format!("{}%", round_metric(p)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {}  {icon} {temperature:>6}  {precipitation:>4}",
            hour.time.format("%H:%M")
        );
    }
    out
}

fn render_daily(snapshot: &ForecastSnapshot, selected: SelectedDay, units: &Units) -> String {
    let Some(daily) = snapshot.daily.as_ref() else {
        return String::new();
    };
    if daily.is_empty() {
        return String::new();
    }

    let mut out = String::from("7-day\n");
    for (idx, date) in daily.time.iter().enumerate() {
        let marker = if idx == selected.index() { '>' } else { ' ' };
        let name = parse_date(date).map_or_else(
            || date.clone(),
            |d| {
                if idx == 0 {
                    "Today".to_string()
                } else {
                    d.format("%a").to_string()
                }
            },
        );
        let glyph = at(&daily.weather_code, idx)
            .map(|code| get_weather_condition(code).icon.glyph())
            .unwrap_or(" ");
        let high = at(&daily.temperature_2m_max, idx)
            .map(|t| format_temperature(t, units.temperature))
            .unwrap_or_else(|| "--".to_string());
        let low = at(&daily.temperature_2m_min, idx)
            .map(|t| format_temperature(t, units.temperature))
            .unwrap_or_else(|| "--".to_string());
        let precipitation = at(&daily.precipitation_probability_max, idx)
            .map(|p| format!("{}%", round_metric(p)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{marker} {idx} {name:<6}{glyph} {high:>6} {low:>6}  {precipitation:>4}"
        );
    }
    out
}

/// Numbered candidate list: name on the first line, region and country indented below.
#[must_use]
pub fn render_candidates(locations: &[Location]) -> String {
    if locations.is_empty() {
        return "No matching locations.\n".to_string();
    }
    let mut out = String::new();
    for (idx, location) in locations.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", idx + 1, location.name);
        let subtitle = location.subtitle();
        if !subtitle.is_empty() {
            let _ = writeln!(out, "    {subtitle}");
        }
    }
    out
}

#[must_use]
pub fn render_favorites(favorites: &Favorites) -> String {
    if favorites.is_empty() {
        return "No favorites yet.\n".to_string();
    }
    let mut out = String::new();
    for favorite in favorites.iter() {
        let _ = writeln!(out, "{:>2}. {}", favorite.order + 1, favorite_line(favorite));
    }
    out
}

fn favorite_line(favorite: &FavoriteLocation) -> String {
    match &favorite.nickname {
        Some(nickname) => format!("{nickname} ({})", favorite.location.display_name()),
        None => favorite.location.display_name(),
    }
}

#[must_use]
pub fn render_recents(recents: &RecentLocations) -> String {
    if recents.is_empty() {
        return "No recent locations.\n".to_string();
    }
    let mut out = String::new();
    for (idx, location) in recents.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", idx + 1, location.display_name());
    }
    out
}

#[must_use]
pub fn render_chat_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        ChatRole::User => "you",
        ChatRole::Assistant => "assistant",
    };
    format!("{speaker}> {}\n", message.content)
}

/// Error panel; retryable failures advertise the retry action.
#[must_use]
pub fn render_error(error: &ApiError) -> String {
    if error.is_retryable() {
        format!("{error}\nRun the command again to retry.\n")
    } else {
        format!("{error}\n")
    }
}
