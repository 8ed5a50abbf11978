use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::condition::ConditionCode;
use crate::error::LookupError;
use crate::locale::Language;
use crate::model::{Coordinates, CurrentConditions, ForecastSample, LocationQuery, UvIndex};

use super::DataSource;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
const UNITS: &str = "metric";
/// OpenWeatherMap caps reported visibility at 10 km and omits it when unknown.
const DEFAULT_VISIBILITY_M: u32 = 10_000;
const MS_TO_KMH: f64 = 3.6;
const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub language: Language,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: Language,
}

#[derive(Debug, Serialize)]
struct LocationParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    q: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lon: Option<f64>,
    appid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    #[serde(default)]
    coord: Option<CoordPayload>,
    main: MainPayload,
    #[serde(default)]
    weather: Vec<WeatherPayload>,
    #[serde(default)]
    wind: Option<WindPayload>,
    #[serde(default)]
    visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CoordPayload {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct MainPayload {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherPayload {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct WindPayload {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: ForecastMain,
    #[serde(default)]
    weather: Vec<WeatherPayload>,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct UvResponse {
    value: f64,
}

impl OpenWeatherClient {
    pub fn new(settings: RemoteSettings) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|error| LookupError::Service(error.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key,
            language: settings.language,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn location_params<'a>(&'a self, query: &'a LocationQuery) -> LocationParams<'a> {
        let (q, lat, lon) = match query {
            LocationQuery::City(name) => (Some(name.as_str()), None, None),
            LocationQuery::Coordinates(coordinates) => {
                (None, Some(coordinates.lat()), Some(coordinates.lon()))
            }
        };
        LocationParams {
            q,
            lat,
            lon,
            appid: &self.api_key,
            units: Some(UNITS),
            lang: Some(self.language.as_str()),
        }
    }

    /// Sends the request and returns the body of a successful response.
    ///
    /// Request URLs carry the API key and upstreams may echo it back, so
    /// every surfaced message drops the URL and has the key scrubbed.
    async fn execute(&self, request: RequestBuilder) -> Result<String, LookupError> {
        let response = request.send().await.map_err(|error| {
            let message = scrub_api_key(&error.without_url().to_string(), &self.api_key);
            warn!(error = %message, "weather request failed");
            LookupError::Service(message)
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|error| {
            LookupError::Service(scrub_api_key(
                &error.without_url().to_string(),
                &self.api_key,
            ))
        })?;

        if status.is_success() {
            debug!(status = status.as_u16(), bytes = body.len(), "weather response");
            return Ok(body);
        }

        let message = extract_error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        Err(map_status(status, scrub_api_key(&message, &self.api_key)))
    }
}

#[async_trait]
impl DataSource for OpenWeatherClient {
    fn name(&self) -> &'static str {
        "openweather"
    }

    #[instrument(skip(self, now))]
    async fn current(
        &self,
        query: &LocationQuery,
        now: DateTime<Utc>,
    ) -> Result<CurrentConditions, LookupError> {
        let request = self
            .client
            .get(self.endpoint("weather"))
            .query(&self.location_params(query));
        let body = self.execute(request).await?;
        parse_current_response(&body, now)
    }

    #[instrument(skip(self, _now))]
    async fn forecast(
        &self,
        query: &LocationQuery,
        _now: DateTime<Utc>,
    ) -> Result<Vec<ForecastSample>, LookupError> {
        let request = self
            .client
            .get(self.endpoint("forecast"))
            .query(&self.location_params(query));
        let body = self.execute(request).await?;
        parse_forecast_response(&body)
    }

    #[instrument(skip(self))]
    async fn uv_index(&self, coordinates: Coordinates) -> Result<f64, LookupError> {
        let params = LocationParams {
            q: None,
            lat: Some(coordinates.lat()),
            lon: Some(coordinates.lon()),
            appid: &self.api_key,
            units: None,
            lang: None,
        };
        let request = self.client.get(self.endpoint("uvi")).query(&params);
        let body = self.execute(request).await?;
        parse_uv_response(&body)
    }
}

fn scrub_api_key(message: &str, api_key: &str) -> String {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return message.to_string();
    }
    message.replace(api_key, REDACTED)
}

fn map_status(status: StatusCode, message: String) -> LookupError {
    match status {
        StatusCode::UNAUTHORIZED => LookupError::Auth(message),
        StatusCode::NOT_FOUND => LookupError::NotFound(message),
        _ => LookupError::Service(format!("http {}: {message}", status.as_u16())),
    }
}

fn invalid_payload(what: &str, error: impl std::fmt::Display) -> LookupError {
    LookupError::Service(format!("invalid {what} payload: {error}"))
}

fn parse_current_response(body: &str, now: DateTime<Utc>) -> Result<CurrentConditions, LookupError> {
    let payload: CurrentResponse =
        serde_json::from_str(body).map_err(|error| invalid_payload("weather", error))?;

    let Some(primary) = payload.weather.into_iter().next() else {
        return Err(invalid_payload("weather", "missing weather entry"));
    };

    let wind_ms = payload.wind.map(|wind| wind.speed).unwrap_or(0.0);
    let visibility_m = payload
        .visibility
        .filter(|value| value.is_finite() && *value >= 0.0)
        .map(|value| value.round().min(f64::from(u32::MAX)) as u32)
        .unwrap_or(DEFAULT_VISIBILITY_M);

    Ok(CurrentConditions {
        place_name: payload.name,
        observed_at: now,
        temperature_c: payload.main.temp,
        feels_like_c: payload.main.feels_like.unwrap_or(payload.main.temp),
        humidity_pct: clamp_percentage(payload.main.humidity),
        pressure_hpa: clamp_pressure(payload.main.pressure),
        wind_speed_kmh: round1(wind_ms * MS_TO_KMH),
        visibility_m,
        condition: ConditionCode::parse(&primary.main),
        description: primary.description,
        uv_index: UvIndex::Unavailable,
        coordinates: payload
            .coord
            .and_then(|coord| Coordinates::new(coord.lat, coord.lon).ok()),
    })
}

fn parse_forecast_response(body: &str) -> Result<Vec<ForecastSample>, LookupError> {
    let payload: ForecastResponse =
        serde_json::from_str(body).map_err(|error| invalid_payload("forecast", error))?;

    Ok(payload
        .list
        .into_iter()
        .map(|item| ForecastSample {
            timestamp: item.dt,
            temperature_c: item.main.temp,
            condition: item
                .weather
                .first()
                .map(|weather| ConditionCode::parse(&weather.main))
                .unwrap_or_default(),
        })
        .collect())
}

fn parse_uv_response(body: &str) -> Result<f64, LookupError> {
    let payload: UvResponse =
        serde_json::from_str(body).map_err(|error| invalid_payload("uv index", error))?;
    Ok(payload.value)
}

fn clamp_percentage(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}

fn clamp_pressure(value: f64) -> u16 {
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, f64::from(u16::MAX)).round() as u16
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let from_json = serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|json| {
            ["message", "error", "detail"].into_iter().find_map(|key| {
                json.get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|message| !message.is_empty())
                    .map(str::to_string)
            })
        });

    from_json.or_else(|| Some(trimmed.to_string()))
}
