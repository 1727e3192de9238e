//! Conversation state and weather-context prompt assembly for the assistant.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use rand::Rng;

use super::weather::{ForecastSnapshot, Location, at, parse_date, round_metric};

pub const ASSISTANT_ACK: &str = "I understand. I'm ready to help with weather-related questions and advice based on the current conditions and forecast.";

const PROMPT_PREAMBLE: &str = "You are a helpful and friendly weather assistant expert. You provide advice about weather conditions, what to wear, and activity recommendations based on current and forecasted weather data.

Keep your responses concise, friendly, and practical. Use everyday language and avoid technical jargon unless asked.";

const PROMPT_CLOSING: &str = "Use this weather information to provide helpful, context-aware advice. When users ask about specific activities, times, or plans, reference the relevant weather data to give practical recommendations.";

const LOOKAHEAD_DAYS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// What the assistant knows about: the selected place and its latest forecast.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherContext<'a> {
    pub location: Option<&'a Location>,
    pub snapshot: Option<&'a ForecastSnapshot>,
}

/// System prime for a completion call. Fields that are absent are left out entirely.
#[must_use]
pub fn build_system_prompt(context: &WeatherContext<'_>) -> String {
    let mut prompt = String::from(PROMPT_PREAMBLE);

    if let Some(location) = context.location {
        let _ = write!(prompt, "\n\nCurrent location: {}", location.name);
        if let Some(country) = &location.country {
            let _ = write!(prompt, ", {country}");
        }
    }

    if let Some(snapshot) = context.snapshot {
        push_current_section(&mut prompt, snapshot);
        push_daily_section(&mut prompt, snapshot);
    }

    let _ = write!(prompt, "\n\n{PROMPT_CLOSING}");
    prompt
}

fn push_current_section(prompt: &mut String, snapshot: &ForecastSnapshot) {
    let Some(current) = &snapshot.current else {
        return;
    };

    let temp_unit = snapshot.current_unit("temperature_2m", "°C");
    let feels_unit = snapshot.current_unit("apparent_temperature", temp_unit);
    let wind_unit = snapshot.current_unit("wind_speed_10m", "km/h");
    let precip_unit = snapshot.current_unit("precipitation", "mm");

    let lines = [
        current
            .temperature_2m
            .map(|v| format!("- Temperature: {v}{temp_unit}")),
        current
            .apparent_temperature
            .map(|v| format!("- Feels like: {v}{feels_unit}")),
        current
            .relative_humidity_2m
            .map(|v| format!("- Humidity: {v}%")),
        current
            .wind_speed_10m
            .map(|v| format!("- Wind: {v} {wind_unit}")),
        current
            .precipitation
            .map(|v| format!("- Precipitation: {v} {precip_unit}")),
        current.uv_index.map(|v| format!("- UV Index: {v}")),
    ];

    let lines: Vec<String> = lines.into_iter().flatten().collect();
    if lines.is_empty() {
        return;
    }
    prompt.push_str("\n\nCurrent weather conditions:");
    for line in lines {
        let _ = write!(prompt, "\n{line}");
    }
}

fn push_daily_section(prompt: &mut String, snapshot: &ForecastSnapshot) {
    let Some(daily) = &snapshot.daily else {
        return;
    };
    if daily.is_empty() {
        return;
    }

    let today_temps = temperature_range(
        at(&daily.temperature_2m_max, 0),
        at(&daily.temperature_2m_min, 0),
        ": ",
    );
    let today_precip = at(&daily.precipitation_probability_max, 0);
    if today_temps.is_some() || today_precip.is_some() {
        prompt.push_str("\n\nToday's forecast:");
        if let Some(temps) = today_temps {
            let _ = write!(prompt, "\n- {temps}");
        }
        if let Some(probability) = today_precip {
            let _ = write!(prompt, "\n- Precipitation probability: {probability}%");
        }
    }

    let upcoming: Vec<String> = (1..daily.len().min(1 + LOOKAHEAD_DAYS))
        .filter_map(|idx| {
            let mut parts: Vec<String> = temperature_range(
                at(&daily.temperature_2m_max, idx),
                at(&daily.temperature_2m_min, idx),
                " ",
            )
            .into_iter()
            .collect();
            if let Some(probability) = at(&daily.precipitation_probability_max, idx) {
                parts.push(format!("Precipitation: {probability}%"));
            }
            if parts.is_empty() {
                return None;
            }
            let day_name = parse_date(&daily.time[idx])
                .map_or_else(|| daily.time[idx].clone(), |d| d.format("%a").to_string());
            Some(format!("- {day_name}: {}", parts.join(", ")))
        })
        .collect();

    if !upcoming.is_empty() {
        prompt.push_str("\n\nUpcoming days:");
        for line in upcoming {
            let _ = write!(prompt, "\n{line}");
        }
    }
}

/// `High: 21°, Low: 12°` for today, `High 22°, Low 13°` for later days.
fn temperature_range(high: Option<f64>, low: Option<f64>, separator: &str) -> Option<String> {
    let parts: Vec<String> = [("High", high), ("Low", low)]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label}{separator}{v}°")))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Greeting shown once when a chat session opens.
#[must_use]
pub fn welcome_message(context: &WeatherContext<'_>) -> String {
    let Some(location) = context.location else {
        return "Hi! I'm your weather assistant. Search for a location to get started, and I'll help you with weather-related questions and advice!".to_string();
    };

    let mut message = format!("Hi! I'm your weather assistant for {}. ", location.name);
    if let Some(temp) = context
        .snapshot
        .and_then(|s| s.current.as_ref())
        .and_then(|c| c.temperature_2m)
    {
        let _ = write!(message, "It's currently {}°. ", round_metric(temp));
    }
    message.push_str(
        "Ask me anything about the weather, what to wear, or activity recommendations!",
    );
    message
}

/// One open conversation: the transcript plus transient call state.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    welcomed: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Adds the welcome message the first time the session opens; later calls are no-ops.
    pub fn open(&mut self, welcome: String) -> Option<&ChatMessage> {
        if self.welcomed || !self.messages.is_empty() {
            return None;
        }
        self.welcomed = true;
        Some(self.push(ChatRole::Assistant, welcome))
    }

    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) -> &ChatMessage {
        let timestamp = Utc::now();
        let nonce: u32 = rand::rng().random();
        self.messages.push(ChatMessage {
            id: format!("{}-{nonce:08x}", timestamp.timestamp_millis()),
            role,
            content: content.into(),
            timestamp,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Prior turns to replay before the new user message. The locally generated
    /// welcome is not part of the remote conversation.
    #[must_use]
    pub fn history(&self) -> Vec<(ChatRole, &str)> {
        let skip = usize::from(self.welcomed);
        self.messages
            .iter()
            .skip(skip)
            .map(|m| (m.role, m.content.as_str()))
            .collect()
    }

    pub fn begin_turn(&mut self, text: &str) {
        self.push(ChatRole::User, text);
        self.is_loading = true;
    }

    pub fn complete_turn(&mut self, reply: String) {
        self.is_loading = false;
        self.error = None;
        self.push(ChatRole::Assistant, reply);
    }

    /// The failure becomes an assistant message so the thread keeps going.
    pub fn fail_turn(&mut self, error: &str) {
        self.is_loading = false;
        self.error = Some(error.to_string());
        self.push(
            ChatRole::Assistant,
            format!("Sorry, I encountered an error: {error}"),
        );
    }
}
