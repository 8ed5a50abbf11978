use chrono::{DateTime, Duration, Utc};
use rand::{Rng, RngExt};

use crate::condition::ConditionCode;
use crate::model::{Coordinates, CurrentConditions, ForecastSample, UvIndex};

const TEMPERATURES: [i32; 7] = [18, 22, 25, 28, 30, 32, 35];
const HUMIDITIES: [u8; 6] = [30, 40, 50, 60, 70, 80];
const PRESSURES: [u16; 6] = [1008, 1010, 1013, 1015, 1018, 1020];
const WINDS: [u16; 7] = [5, 8, 10, 12, 15, 18, 20];
const CONDITIONS: [(ConditionCode, &str); 3] = [
    (ConditionCode::Clear, "سماء صافية"),
    (ConditionCode::Clouds, "غائم جزئياً"),
    (ConditionCode::Rain, "أمطار خفيفة"),
];
const VISIBILITY_BASE_M: u32 = 8_000;
const VISIBILITY_SPREAD_M: u32 = 7_000;

/// Daily (condition, temperature) pattern for the static forecast.
const FORECAST_PATTERN: [(ConditionCode, i32); 5] = [
    (ConditionCode::Clear, 30),
    (ConditionCode::Clouds, 27),
    (ConditionCode::Clear, 32),
    (ConditionCode::Clouds, 25),
    (ConditionCode::Rain, 22),
];

pub const FALLBACK_COORDINATES: Coordinates = Coordinates::FALLBACK;

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, candidates: &[T]) -> T {
    candidates[rng.random_range(0..candidates.len())]
}

/// Builds plausible conditions for a place the static table does not know.
pub fn synthesize_conditions<R: Rng + ?Sized>(
    rng: &mut R,
    place_name: &str,
    coordinates: Coordinates,
    observed_at: DateTime<Utc>,
) -> CurrentConditions {
    let (condition, description) = pick(rng, &CONDITIONS);
    let temperature = pick(rng, &TEMPERATURES);
    let feels_like = temperature + rng.random_range(2..=6);

    CurrentConditions {
        place_name: place_name.to_string(),
        observed_at,
        temperature_c: f64::from(temperature),
        feels_like_c: f64::from(feels_like),
        humidity_pct: pick(rng, &HUMIDITIES),
        pressure_hpa: pick(rng, &PRESSURES),
        wind_speed_kmh: f64::from(pick(rng, &WINDS)),
        visibility_m: VISIBILITY_BASE_M + rng.random_range(0..VISIBILITY_SPREAD_M),
        condition,
        description: description.to_string(),
        uv_index: UvIndex::Unavailable,
        coordinates: Some(coordinates),
    }
}

/// One sample per day for the next five days, starting tomorrow.
pub fn mock_forecast_samples(now: DateTime<Utc>) -> Vec<ForecastSample> {
    FORECAST_PATTERN
        .iter()
        .zip(1_i64..)
        .map(|(&(condition, temperature), offset)| ForecastSample {
            timestamp: (now + Duration::days(offset)).timestamp(),
            temperature_c: f64::from(temperature),
            condition,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0)
            .single()
            .expect("time")
    }

    #[test]
    fn synth_values_stay_within_candidate_sets() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let conditions =
                synthesize_conditions(&mut rng, "Atlantis", FALLBACK_COORDINATES, fixed_now());

            let temperature = conditions.temperature_c as i32;
            assert!(TEMPERATURES.contains(&temperature));
            let offset = conditions.feels_like_c - conditions.temperature_c;
            assert!((2.0..=6.0).contains(&offset), "offset {offset}");
            assert!(HUMIDITIES.contains(&conditions.humidity_pct));
            assert!(conditions.humidity_pct <= 100);
            assert!(PRESSURES.contains(&conditions.pressure_hpa));
            assert!((8_000..15_000).contains(&conditions.visibility_m));
            assert!(
                CONDITIONS
                    .iter()
                    .any(|(code, text)| *code == conditions.condition
                        && *text == conditions.description)
            );
        }
    }

    #[test]
    fn synth_labels_result_with_input_text() {
        let mut rng = StdRng::seed_from_u64(7);
        let conditions =
            synthesize_conditions(&mut rng, "Springfield", FALLBACK_COORDINATES, fixed_now());

        assert_eq!(conditions.place_name, "Springfield");
        assert_eq!(conditions.coordinates, Some(FALLBACK_COORDINATES));
    }

    #[test]
    fn synth_is_deterministic_for_a_seed() {
        let first = synthesize_conditions(
            &mut StdRng::seed_from_u64(99),
            "x",
            FALLBACK_COORDINATES,
            fixed_now(),
        );
        let second = synthesize_conditions(
            &mut StdRng::seed_from_u64(99),
            "x",
            FALLBACK_COORDINATES,
            fixed_now(),
        );

        assert_eq!(first, second);
    }

    #[test]
    fn synth_mock_forecast_spans_next_five_days() {
        let samples = mock_forecast_samples(fixed_now());

        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].timestamp, fixed_now().timestamp() + 86_400);
        assert_eq!(samples[4].timestamp, fixed_now().timestamp() + 5 * 86_400);
        assert_eq!(samples[4].condition, ConditionCode::Rain);
        assert_eq!(samples[1].temperature_c, 27.0);
    }
}
