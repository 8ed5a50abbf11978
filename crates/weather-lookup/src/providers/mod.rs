use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::{RuntimeConfig, SourceMode};
use crate::error::LookupError;
use crate::model::{Coordinates, CurrentConditions, ForecastSample, LocationQuery};

pub mod openweather;
pub mod static_table;

pub use openweather::{OpenWeatherClient, RemoteSettings};
pub use static_table::StaticTableSource;

/// Where current conditions, forecast samples and UV readings come from.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn current(
        &self,
        query: &LocationQuery,
        now: DateTime<Utc>,
    ) -> Result<CurrentConditions, LookupError>;

    async fn forecast(
        &self,
        query: &LocationQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<ForecastSample>, LookupError>;

    async fn uv_index(&self, coordinates: Coordinates) -> Result<f64, LookupError>;
}

pub fn build_source(config: &RuntimeConfig) -> Result<Arc<dyn DataSource>, LookupError> {
    match config.source {
        SourceMode::Static => Ok(Arc::new(
            StaticTableSource::new().with_language(config.language),
        )),
        SourceMode::Remote => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| LookupError::Auth("WEATHER_API_KEY is not set".to_string()))?;
            let client = OpenWeatherClient::new(RemoteSettings {
                base_url: config.base_url.clone(),
                api_key,
                timeout_secs: config.timeout_secs,
                language: config.language,
            })?;
            Ok(Arc::new(client))
        }
    }
}
