use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::debug;

use crate::city_table;
use crate::error::LookupError;
use crate::locale::{self, Language};
use crate::model::{Coordinates, CurrentConditions, ForecastSample, LocationQuery};
use crate::synth;

use super::DataSource;

/// UV reading reported for every place in static mode.
pub const STATIC_UV_INDEX: f64 = 6.0;

/// Built-in city table with procedural fallback; never fails for lack of data.
#[derive(Debug)]
pub struct StaticTableSource {
    rng: Mutex<StdRng>,
    language: Language,
}

impl Default for StaticTableSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticTableSource {
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            language: Language::default(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn resolve_name(&self, name: &str, now: DateTime<Utc>) -> CurrentConditions {
        if let Some(record) = city_table::lookup(name) {
            debug!(query = name, canonical = record.name, "static table hit");
            return record.to_conditions(now);
        }

        debug!(query = name, "static table miss; synthesizing conditions");
        let mut rng = self.rng.lock();
        synth::synthesize_conditions(&mut *rng, name, synth::FALLBACK_COORDINATES, now)
    }

    pub fn resolve_coordinates(
        &self,
        coordinates: Coordinates,
        now: DateTime<Utc>,
    ) -> CurrentConditions {
        let label = locale::current_location_label(self.language);
        let mut rng = self.rng.lock();
        synth::synthesize_conditions(&mut *rng, label, coordinates, now)
    }
}

#[async_trait]
impl DataSource for StaticTableSource {
    fn name(&self) -> &'static str {
        "static_table"
    }

    async fn current(
        &self,
        query: &LocationQuery,
        now: DateTime<Utc>,
    ) -> Result<CurrentConditions, LookupError> {
        Ok(match query {
            LocationQuery::City(name) => self.resolve_name(name, now),
            LocationQuery::Coordinates(coordinates) => self.resolve_coordinates(*coordinates, now),
        })
    }

    async fn forecast(
        &self,
        _query: &LocationQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<ForecastSample>, LookupError> {
        Ok(synth::mock_forecast_samples(now))
    }

    async fn uv_index(&self, _coordinates: Coordinates) -> Result<f64, LookupError> {
        Ok(STATIC_UV_INDEX)
    }
}
