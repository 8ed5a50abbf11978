use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::condition::ConditionCode;

/// A validated position; only [`Coordinates::new`] builds one from raw values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    /// Cairo, used when a synthesized place has no position of its own.
    pub const FALLBACK: Self = Self {
        lat: 30.0444,
        lon: 31.2357,
    };

    pub fn new(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        validate_coordinates(lat, lon)?;
        Ok(Self { lat, lon })
    }

    pub fn lat(self) -> f64 {
        self.lat
    }

    pub fn lon(self) -> f64 {
        self.lon
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

/// Which kind of lookup produced a result; error wording depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryKind {
    #[default]
    City,
    Coordinates,
}

impl LocationQuery {
    pub fn kind(&self) -> QueryKind {
        match self {
            Self::City(_) => QueryKind::City,
            Self::Coordinates(_) => QueryKind::Coordinates,
        }
    }

    pub fn city(raw: &str) -> Result<Self, ValidationError> {
        normalize_city(raw).map(Self::City)
    }

    pub fn coordinates(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        Coordinates::new(lat, lon).map(Self::Coordinates)
    }
}

pub fn normalize_city(raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    Ok(value.to_string())
}

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ValidationError> {
    // NaN fails both range checks.
    if !((-90.0)..=90.0).contains(&lat) {
        return Err(ValidationError::InvalidLatitude(lat));
    }
    if !((-180.0)..=180.0).contains(&lon) {
        return Err(ValidationError::InvalidLongitude(lon));
    }
    Ok(())
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("city must not be empty")]
    EmptyQuery,
    #[error("invalid latitude: {0}")]
    InvalidLatitude(f64),
    #[error("invalid longitude: {0}")]
    InvalidLongitude(f64),
}

/// UV index as shown to the user; retrieval is best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "value")]
pub enum UvIndex {
    Value(u8),
    Unavailable,
}

impl UvIndex {
    pub fn from_reading(value: f64) -> Self {
        if !value.is_finite() || value < 0.0 {
            return Self::Unavailable;
        }
        Self::Value(value.round().min(f64::from(u8::MAX)) as u8)
    }
}

/// Normalized current conditions, independent of the source that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub place_name: String,
    pub observed_at: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u16,
    pub wind_speed_kmh: f64,
    pub visibility_m: u32,
    pub condition: ConditionCode,
    pub description: String,
    pub uv_index: UvIndex,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastSample {
    /// Unix epoch seconds.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub condition: ConditionCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyForecast {
    pub day: String,
    pub condition: ConditionCode,
    pub high_c: i32,
    pub low_c: i32,
}

/// At most [`ForecastSeries::MAX_DAYS`] days, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ForecastSeries(Vec<DailyForecast>);

impl ForecastSeries {
    pub const MAX_DAYS: usize = 5;

    pub fn from_days(mut days: Vec<DailyForecast>) -> Self {
        days.truncate(Self::MAX_DAYS);
        Self(days)
    }

    pub fn days(&self) -> &[DailyForecast] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
