use chrono_tz::Tz;
use parking_lot::Mutex;
use serde::Serialize;

use crate::condition::{IconId, icon_for};
use crate::forecast::round_half_up;
use crate::locale::{self, Language};
use crate::model::{CurrentConditions, ForecastSeries, UvIndex};

/// Exactly one of these is on screen at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    Error {
        message: String,
    },
    Content {
        current: CurrentConditions,
        forecast: ForecastSeries,
    },
}

pub trait Renderer: Send + Sync {
    fn render(&self, state: &ViewState);
}

/// Holds the current view; every render replaces it whole.
///
/// Last writer wins: a slow request that completes after a newer one
/// overwrites it. Only the most recent state is held.
#[derive(Debug, Default)]
pub struct ViewSlot {
    current: Mutex<Option<ViewState>>,
}

impl ViewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ViewState> {
        self.current.lock().clone()
    }
}

impl Renderer for ViewSlot {
    fn render(&self, state: &ViewState) {
        *self.current.lock() = Some(state.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub language: Language,
    pub timezone: Tz,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            timezone: Tz::UTC,
        }
    }
}

/// Display-ready view, produced without touching any output device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum RenderInstruction {
    ShowLoading,
    ShowError { message: String },
    ShowWeather(WeatherCard),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherCard {
    pub city: String,
    pub date: String,
    pub temperature: String,
    pub description: String,
    pub icon: IconId,
    pub visibility: String,
    pub humidity: String,
    pub wind_speed: String,
    pub feels_like: String,
    pub pressure: String,
    pub uv_index: String,
    pub forecast: Vec<ForecastCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastCard {
    pub day: String,
    pub icon: IconId,
    pub high: String,
    pub low: String,
}

pub fn render_instruction(state: &ViewState, options: RenderOptions) -> RenderInstruction {
    match state {
        ViewState::Loading => RenderInstruction::ShowLoading,
        ViewState::Error { message } => RenderInstruction::ShowError {
            message: message.clone(),
        },
        ViewState::Content { current, forecast } => {
            RenderInstruction::ShowWeather(weather_card(current, forecast, options))
        }
    }
}

fn weather_card(
    current: &CurrentConditions,
    forecast: &ForecastSeries,
    options: RenderOptions,
) -> WeatherCard {
    let units = locale::unit_labels(options.language);
    let local_date = current
        .observed_at
        .with_timezone(&options.timezone)
        .date_naive();

    WeatherCard {
        city: current.place_name.clone(),
        date: locale::format_long_date(local_date, options.language),
        temperature: degrees(current.temperature_c),
        description: current.description.clone(),
        icon: icon_for(current.condition),
        visibility: format!(
            "{:.1} {}",
            f64::from(current.visibility_m) / 1000.0,
            units.kilometers
        ),
        humidity: format!("{}%", current.humidity_pct),
        wind_speed: format!("{} {}", current.wind_speed_kmh, units.kilometers_per_hour),
        feels_like: degrees(current.feels_like_c),
        pressure: format!("{} {}", current.pressure_hpa, units.hectopascal),
        uv_index: match current.uv_index {
            UvIndex::Value(value) => value.to_string(),
            UvIndex::Unavailable => locale::uv_unavailable_marker().to_string(),
        },
        forecast: forecast
            .days()
            .iter()
            .map(|day| ForecastCard {
                day: day.day.clone(),
                icon: icon_for(day.condition),
                high: format!("{}°", day.high_c),
                low: format!("{}°", day.low_c),
            })
            .collect(),
    }
}

fn degrees(value: f64) -> String {
    format!("{}°", round_half_up(value))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::condition::ConditionCode;
    use crate::model::{Coordinates, DailyForecast};

    fn cairo() -> CurrentConditions {
        CurrentConditions {
            place_name: "القاهرة".to_string(),
            observed_at: Utc
                .with_ymd_and_hms(2026, 10, 15, 9, 0, 0)
                .single()
                .expect("time"),
            temperature_c: 27.6,
            feels_like_c: 32.0,
            humidity_pct: 45,
            pressure_hpa: 1013,
            wind_speed_kmh: 12.0,
            visibility_m: 10_000,
            condition: ConditionCode::Clear,
            description: "سماء صافية".to_string(),
            uv_index: UvIndex::Value(6),
            coordinates: Some(Coordinates::FALLBACK),
        }
    }

    fn forecast() -> ForecastSeries {
        ForecastSeries::from_days(vec![DailyForecast {
            day: "الجمعة".to_string(),
            condition: ConditionCode::Rain,
            high_c: 25,
            low_c: 19,
        }])
    }

    #[test]
    fn view_renders_arabic_weather_card() {
        let state = ViewState::Content {
            current: cairo(),
            forecast: forecast(),
        };

        let RenderInstruction::ShowWeather(card) =
            render_instruction(&state, RenderOptions::default())
        else {
            panic!("expected weather card");
        };

        assert_eq!(card.city, "القاهرة");
        assert_eq!(card.date, "الخميس، ١٥ أكتوبر ٢٠٢٦");
        assert_eq!(card.temperature, "28°");
        assert_eq!(card.icon.as_str(), "fas fa-sun");
        assert_eq!(card.visibility, "10.0 كم");
        assert_eq!(card.humidity, "45%");
        assert_eq!(card.wind_speed, "12 كم/س");
        assert_eq!(card.feels_like, "32°");
        assert_eq!(card.pressure, "1013 هكتوباسكال");
        assert_eq!(card.uv_index, "6");
        assert_eq!(card.forecast.len(), 1);
        assert_eq!(card.forecast[0].icon.as_str(), "fas fa-cloud-rain");
        assert_eq!(card.forecast[0].high, "25°");
    }

    #[test]
    fn view_renders_english_units_and_unavailable_uv() {
        let mut current = cairo();
        current.uv_index = UvIndex::Unavailable;
        current.visibility_m = 8_450;
        current.wind_speed_kmh = 16.2;
        let state = ViewState::Content {
            current,
            forecast: ForecastSeries::default(),
        };

        let options = RenderOptions {
            language: Language::En,
            timezone: Tz::UTC,
        };
        let RenderInstruction::ShowWeather(card) = render_instruction(&state, options) else {
            panic!("expected weather card");
        };

        assert_eq!(card.date, "Thursday, October 15, 2026");
        assert_eq!(card.visibility, "8.4 km");
        assert_eq!(card.wind_speed, "16.2 km/h");
        assert_eq!(card.pressure, "1013 hPa");
        assert_eq!(card.uv_index, "--");
        assert!(card.forecast.is_empty());
    }

    #[test]
    fn view_loading_and_error_map_directly() {
        assert_eq!(
            render_instruction(&ViewState::Loading, RenderOptions::default()),
            RenderInstruction::ShowLoading
        );
        assert_eq!(
            render_instruction(
                &ViewState::Error {
                    message: "boom".to_string()
                },
                RenderOptions::default()
            ),
            RenderInstruction::ShowError {
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn view_slot_keeps_last_written_state() {
        let slot = ViewSlot::new();
        assert_eq!(slot.current(), None);

        slot.render(&ViewState::Loading);
        slot.render(&ViewState::Error {
            message: "x".to_string(),
        });

        assert_eq!(
            slot.current(),
            Some(ViewState::Error {
                message: "x".to_string()
            })
        );
    }

    #[test]
    fn view_slot_holds_only_latest_state_across_many_renders() {
        let slot = ViewSlot::new();

        for round in 0..1_000 {
            slot.render(&ViewState::Loading);
            slot.render(&ViewState::Error {
                message: format!("round {round}"),
            });
        }

        assert_eq!(
            slot.current(),
            Some(ViewState::Error {
                message: "round 999".to_string()
            })
        );
    }

    #[test]
    fn view_instruction_serializes_with_view_tag() {
        let value = serde_json::to_value(render_instruction(
            &ViewState::Loading,
            RenderOptions::default(),
        ))
        .expect("json");
        assert_eq!(
            value.get("view").and_then(serde_json::Value::as_str),
            Some("show_loading")
        );
    }
}
