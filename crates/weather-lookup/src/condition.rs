use std::fmt;

use serde::Serialize;

/// Coarse weather category; drives icon selection only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ConditionCode {
    #[default]
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
}

impl ConditionCode {
    pub const ALL: [Self; 9] = [
        Self::Clear,
        Self::Clouds,
        Self::Rain,
        Self::Drizzle,
        Self::Thunderstorm,
        Self::Snow,
        Self::Mist,
        Self::Fog,
        Self::Haze,
    ];

    /// Parses a provider category name. Unknown names fall back to `Clear`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" => Self::Mist,
            "Fog" => Self::Fog,
            "Haze" => Self::Haze,
            _ => Self::Clear,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Haze => "Haze",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IconId(&'static str);

impl IconId {
    pub const DEFAULT: IconId = IconId("fas fa-sun");

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub fn icon_for(code: ConditionCode) -> IconId {
    match code {
        ConditionCode::Clear => IconId::DEFAULT,
        ConditionCode::Clouds => IconId("fas fa-cloud"),
        ConditionCode::Rain => IconId("fas fa-cloud-rain"),
        ConditionCode::Drizzle => IconId("fas fa-cloud-drizzle"),
        ConditionCode::Thunderstorm => IconId("fas fa-bolt"),
        ConditionCode::Snow => IconId("fas fa-snowflake"),
        ConditionCode::Mist | ConditionCode::Fog | ConditionCode::Haze => IconId("fas fa-smog"),
    }
}
