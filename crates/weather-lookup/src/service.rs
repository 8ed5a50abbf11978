use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::LookupError;
use crate::forecast::aggregate_daily;
use crate::geolocation::Geolocator;
use crate::locale::{self, Language};
use crate::model::{CurrentConditions, ForecastSeries, LocationQuery, QueryKind, UvIndex};
use crate::providers::DataSource;
use crate::view::{RenderOptions, Renderer, ViewState};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Everything one successful lookup produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: ForecastSeries,
}

/// Resolves queries against a data source and pushes view states to a renderer.
pub struct WeatherClient {
    source: Arc<dyn DataSource>,
    renderer: Arc<dyn Renderer>,
    clock: Clock,
    language: Language,
    timezone: Tz,
}

impl WeatherClient {
    pub fn new(source: Arc<dyn DataSource>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            source,
            renderer,
            clock: Arc::new(Utc::now),
            language: Language::default(),
            timezone: Tz::UTC,
        }
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            language: self.language,
            timezone: self.timezone,
        }
    }

    pub async fn resolve_by_name(&self, text: &str) -> Result<CurrentConditions, LookupError> {
        let query = LocationQuery::city(text)?;
        self.resolve_current(&query).await
    }

    pub async fn resolve_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentConditions, LookupError> {
        let query = LocationQuery::coordinates(lat, lon)?;
        self.resolve_current(&query).await
    }

    /// Current conditions plus the best-effort daily forecast.
    pub async fn report(&self, query: &LocationQuery) -> Result<WeatherReport, LookupError> {
        let current = self.resolve_current(query).await?;
        let forecast = self.resolve_forecast(query).await;
        Ok(WeatherReport { current, forecast })
    }

    /// Looks up a city and renders the outcome.
    ///
    /// A blank query is rejected before any view change or source call.
    pub async fn search(&self, text: &str) -> Result<WeatherReport, LookupError> {
        let query = LocationQuery::city(text)?;
        self.renderer.render(&ViewState::Loading);
        self.finish(self.report(&query).await, QueryKind::City)
    }

    /// Asks the locator for a position, then looks it up and renders the outcome.
    ///
    /// A missing locator, a failed position request or an out-of-range fix
    /// renders an error without a loading state, since no lookup was started.
    pub async fn locate(
        &self,
        locator: Option<&dyn Geolocator>,
    ) -> Result<WeatherReport, LookupError> {
        let kind = QueryKind::Coordinates;
        let Some(locator) = locator else {
            return self.finish(Err(LookupError::LocationUnsupported), kind);
        };

        let position = match locator.current_position().await {
            Ok(position) => position,
            Err(failure) => {
                info!(?failure, "location request failed");
                return self.finish(Err(failure.into()), kind);
            }
        };

        let query = match LocationQuery::coordinates(position.lat, position.lon) {
            Ok(query) => query,
            Err(error) => {
                info!(%error, "locator reported an invalid position");
                return self.finish(Err(error.into()), kind);
            }
        };

        self.renderer.render(&ViewState::Loading);
        self.finish(self.report(&query).await, kind)
    }

    fn finish(
        &self,
        outcome: Result<WeatherReport, LookupError>,
        kind: QueryKind,
    ) -> Result<WeatherReport, LookupError> {
        match &outcome {
            Ok(report) => self.renderer.render(&ViewState::Content {
                current: report.current.clone(),
                forecast: report.forecast.clone(),
            }),
            Err(error) => self.renderer.render(&ViewState::Error {
                message: locale::error_message(error, kind, self.language).to_string(),
            }),
        }
        outcome
    }

    async fn resolve_current(
        &self,
        query: &LocationQuery,
    ) -> Result<CurrentConditions, LookupError> {
        let now = (self.clock)();
        let mut current = self.source.current(query, now).await?;
        debug!(
            source = self.source.name(),
            place = %current.place_name,
            "resolved current conditions"
        );

        if let Some(coordinates) = current.coordinates {
            current.uv_index = match self.source.uv_index(coordinates).await {
                Ok(reading) => UvIndex::from_reading(reading),
                Err(error) => {
                    warn!(%error, "uv index unavailable");
                    UvIndex::Unavailable
                }
            };
        }

        Ok(current)
    }

    async fn resolve_forecast(&self, query: &LocationQuery) -> ForecastSeries {
        let now = (self.clock)();
        match self.source.forecast(query, now).await {
            Ok(samples) => aggregate_daily(&samples, &self.timezone, self.language),
            Err(error) => {
                warn!(%error, "forecast unavailable; rendering without it");
                ForecastSeries::default()
            }
        }
    }
}
