#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Sunny,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Storm,
}

impl WeatherIcon {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Sunny => "☀",
            Self::PartlyCloudy => "⛅",
            Self::Overcast => "☁",
            Self::Fog => "░",
            Self::Drizzle | Self::Rain => "☂",
            Self::Snow => "❄",
            Self::Storm => "⚡",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCondition {
    pub description: &'static str,
    pub icon: WeatherIcon,
}

const FALLBACK_CONDITION: WeatherCondition = WeatherCondition {
    description: "Unknown",
    icon: WeatherIcon::Sunny,
};

const WEATHER_CONDITIONS: &[(u16, &str, WeatherIcon)] = &[
    (0, "Clear sky", WeatherIcon::Sunny),
    (1, "Mainly clear", WeatherIcon::PartlyCloudy),
    (2, "Partly cloudy", WeatherIcon::PartlyCloudy),
    (3, "Overcast", WeatherIcon::Overcast),
    (45, "Fog", WeatherIcon::Fog),
    (48, "Depositing rime fog", WeatherIcon::Fog),
    (51, "Light drizzle", WeatherIcon::Drizzle),
    (53, "Moderate drizzle", WeatherIcon::Drizzle),
    (55, "Dense drizzle", WeatherIcon::Drizzle),
    (61, "Slight rain", WeatherIcon::Rain),
    (63, "Moderate rain", WeatherIcon::Rain),
    (65, "Heavy rain", WeatherIcon::Rain),
    (71, "Slight snow", WeatherIcon::Snow),
    (73, "Moderate snow", WeatherIcon::Snow),
    (75, "Heavy snow", WeatherIcon::Snow),
    (77, "Snow grains", WeatherIcon::Snow),
    (80, "Slight rain showers", WeatherIcon::Rain),
    (81, "Moderate rain showers", WeatherIcon::Rain),
    (82, "Violent rain showers", WeatherIcon::Rain),
    (85, "Slight snow showers", WeatherIcon::Snow),
    (86, "Heavy snow showers", WeatherIcon::Snow),
    (95, "Thunderstorm", WeatherIcon::Storm),
    (96, "Thunderstorm with slight hail", WeatherIcon::Storm),
    (99, "Thunderstorm with heavy hail", WeatherIcon::Storm),
];

/// Total lookup: codes missing from the table map to the fallback condition.
#[must_use]
pub fn get_weather_condition(code: u16) -> WeatherCondition {
    WEATHER_CONDITIONS
        .iter()
        .find(|(candidate, _, _)| *candidate == code)
        .map_or(FALLBACK_CONDITION, |(_, description, icon)| {
            WeatherCondition {
                description,
                icon: *icon,
            }
        })
}

/// A clear-sky icon at night renders as partly cloudy.
#[must_use]
pub fn hourly_icon(code: u16, is_day: bool) -> WeatherIcon {
    let icon = get_weather_condition(code).icon;
    if !is_day && icon == WeatherIcon::Sunny {
        WeatherIcon::PartlyCloudy
    } else {
        icon
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Extreme => "Extreme",
        }
    }

    #[must_use]
    pub fn advice(self) -> &'static str {
        match self {
            Self::Low => "Minimal sun protection required",
            Self::Moderate => "Seek shade during midday",
            Self::High => "Protection essential",
            Self::VeryHigh => "Extra protection required",
            Self::Extreme => "Take all precautions",
        }
    }
}

#[must_use]
pub fn uv_level(uv_index: f64) -> UvLevel {
    if uv_index <= 2.0 {
        UvLevel::Low
    } else if uv_index <= 5.0 {
        UvLevel::Moderate
    } else if uv_index <= 7.0 {
        UvLevel::High
    } else if uv_index <= 10.0 {
        UvLevel::VeryHigh
    } else {
        UvLevel::Extreme
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityLevel {
    Excellent,
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

impl VisibilityLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

#[must_use]
pub fn visibility_level(visibility_m: f64) -> VisibilityLevel {
    let km = visibility_m / 1000.0;
    if km >= 10.0 {
        VisibilityLevel::Excellent
    } else if km >= 5.0 {
        VisibilityLevel::Good
    } else if km >= 2.0 {
        VisibilityLevel::Moderate
    } else if km >= 1.0 {
        VisibilityLevel::Poor
    } else {
        VisibilityLevel::VeryPoor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudCoverLevel {
    Clear,
    PartlyCloudy,
    MostlyCloudy,
    Overcast,
}

impl CloudCoverLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::MostlyCloudy => "Mostly cloudy",
            Self::Overcast => "Overcast",
        }
    }
}

#[must_use]
pub fn cloud_cover_level(percent: f64) -> CloudCoverLevel {
    if percent <= 25.0 {
        CloudCoverLevel::Clear
    } else if percent <= 50.0 {
        CloudCoverLevel::PartlyCloudy
    } else if percent <= 75.0 {
        CloudCoverLevel::MostlyCloudy
    } else {
        CloudCoverLevel::Overcast
    }
}
