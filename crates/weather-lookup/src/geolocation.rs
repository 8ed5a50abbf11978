//! Seam for the platform location capability.
//!
//! The capability itself may be missing; callers model that as
//! `Option<&dyn Geolocator>` and get [`LookupError::LocationUnsupported`].

use async_trait::async_trait;

use crate::error::LookupError;

/// A fix as reported by the platform, not yet range-checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationFailure {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl From<GeolocationFailure> for LookupError {
    fn from(value: GeolocationFailure) -> Self {
        match value {
            GeolocationFailure::PermissionDenied => Self::LocationDenied,
            GeolocationFailure::PositionUnavailable => {
                Self::LocationUnavailable("position unavailable".to_string())
            }
            GeolocationFailure::Timeout => {
                Self::LocationUnavailable("location request timed out".to_string())
            }
        }
    }
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Position, GeolocationFailure>;
}

/// Answers every request with the same outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedGeolocator {
    outcome: Result<Position, GeolocationFailure>,
}

impl FixedGeolocator {
    pub fn at(position: Position) -> Self {
        Self {
            outcome: Ok(position),
        }
    }

    pub fn failing(failure: GeolocationFailure) -> Self {
        Self {
            outcome: Err(failure),
        }
    }

    /// Parses `lat,lon`, or one of `denied`, `unavailable`, `timeout`.
    ///
    /// Unparseable text reads as an unavailable position rather than a
    /// missing capability. Numbers are passed through as reported; the
    /// range check happens when the position becomes a query.
    pub fn from_setting(raw: &str) -> Self {
        let value = raw.trim();
        match value.to_ascii_lowercase().as_str() {
            "denied" => return Self::failing(GeolocationFailure::PermissionDenied),
            "unavailable" => return Self::failing(GeolocationFailure::PositionUnavailable),
            "timeout" => return Self::failing(GeolocationFailure::Timeout),
            _ => {}
        }

        value
            .split_once(',')
            .and_then(|(lat, lon)| {
                let lat = lat.trim().parse::<f64>().ok()?;
                let lon = lon.trim().parse::<f64>().ok()?;
                Some(Position::new(lat, lon))
            })
            .map(Self::at)
            .unwrap_or(Self::failing(GeolocationFailure::PositionUnavailable))
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Position, GeolocationFailure> {
        self.outcome
    }
}
