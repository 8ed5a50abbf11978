//! Weather lookup for a city name or a coordinate pair.
//!
//! - `model`: query validation and the display model.
//! - `condition`: condition codes and icon mapping.
//! - `city_table` / `synth`: built-in data for the static source.
//! - `forecast`: daily aggregation of forecast samples.
//! - `providers`: static and remote data sources.
//! - `geolocation`: platform location seam.
//! - `view`: view states and the pure render step.
//! - `service`: `WeatherClient` orchestration.

pub mod city_table;
pub mod condition;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geolocation;
pub mod locale;
pub mod model;
pub mod providers;
pub mod service;
pub mod synth;
pub mod view;

pub use condition::{ConditionCode, IconId, icon_for};
pub use error::{ErrorKind, LookupError};
pub use forecast::aggregate_daily;
pub use model::{
    Coordinates, CurrentConditions, DailyForecast, ForecastSample, ForecastSeries, LocationQuery,
    QueryKind, UvIndex,
};
pub use service::{WeatherClient, WeatherReport};
pub use view::{Renderer, ViewSlot, ViewState};
