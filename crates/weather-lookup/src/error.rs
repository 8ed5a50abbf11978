use thiserror::Error;

use crate::model::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    User,
    Runtime,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupError {
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] ValidationError),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("location not found: {0}")]
    NotFound(String),
    #[error("weather service failed: {0}")]
    Service(String),
    #[error("location permission denied")]
    LocationDenied,
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),
    #[error("location capability is not available")]
    LocationUnsupported,
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidQuery(_)
            | Self::LocationDenied
            | Self::LocationUnavailable(_)
            | Self::LocationUnsupported => ErrorKind::User,
            Self::Auth(_) | Self::NotFound(_) | Self::Service(_) => ErrorKind::Runtime,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuery(_) => "user.invalid_query",
            Self::Auth(_) => "runtime.auth_failed",
            Self::NotFound(_) => "runtime.not_found",
            Self::Service(_) => "runtime.service_failed",
            Self::LocationDenied => "user.location_denied",
            Self::LocationUnavailable(_) => "user.location_unavailable",
            Self::LocationUnsupported => "user.location_unsupported",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::User => 2,
            ErrorKind::Runtime => 1,
        }
    }
}
