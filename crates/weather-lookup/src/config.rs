use std::collections::HashMap;

use chrono_tz::Tz;

use crate::locale::Language;
use crate::providers::openweather::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

pub const WEATHER_SOURCE_ENV: &str = "WEATHER_SOURCE";
pub const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const WEATHER_BASE_URL_ENV: &str = "WEATHER_BASE_URL";
pub const WEATHER_TIMEOUT_SECS_ENV: &str = "WEATHER_TIMEOUT_SECS";
pub const WEATHER_LANG_ENV: &str = "WEATHER_LANG";
pub const WEATHER_TIMEZONE_ENV: &str = "WEATHER_TIMEZONE";
pub const WEATHER_CURRENT_LOCATION_ENV: &str = "WEATHER_CURRENT_LOCATION";
pub const WEATHER_LOG_ENV: &str = "WEATHER_LOG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceMode {
    #[default]
    Static,
    Remote,
}

impl SourceMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "static" => Some(Self::Static),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub source: SourceMode,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub language: Language,
    pub timezone: Tz,
    pub current_location: Option<String>,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            source: non_empty(&map, WEATHER_SOURCE_ENV)
                .and_then(SourceMode::parse)
                .unwrap_or_default(),
            api_key: non_empty(&map, WEATHER_API_KEY_ENV).map(str::to_string),
            base_url: non_empty(&map, WEATHER_BASE_URL_ENV)
                .unwrap_or(DEFAULT_BASE_URL)
                .to_string(),
            timeout_secs: resolve_timeout_secs(&map),
            language: non_empty(&map, WEATHER_LANG_ENV)
                .and_then(Language::parse)
                .unwrap_or_default(),
            timezone: non_empty(&map, WEATHER_TIMEZONE_ENV)
                .and_then(|value| value.parse::<Tz>().ok())
                .unwrap_or(Tz::UTC),
            current_location: non_empty(&map, WEATHER_CURRENT_LOCATION_ENV).map(str::to_string),
        }
    }
}

fn non_empty<'a>(env_map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env_map
        .get(key)
        .map(String::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn resolve_timeout_secs(env_map: &HashMap<String, String>) -> u64 {
    non_empty(env_map, WEATHER_TIMEOUT_SECS_ENV)
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}
