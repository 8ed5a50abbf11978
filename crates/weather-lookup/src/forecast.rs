use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use tracing::debug;

use crate::condition::ConditionCode;
use crate::locale::{self, Language};
use crate::model::{DailyForecast, ForecastSample, ForecastSeries};

struct DayBucket {
    date: NaiveDate,
    condition: ConditionCode,
    low: f64,
    high: f64,
}

/// Groups samples by calendar day in `tz`, keeping days in first-seen order.
///
/// The day's condition is taken from its first sample. Samples with an
/// out-of-range timestamp or a non-finite temperature are skipped. At most
/// [`ForecastSeries::MAX_DAYS`] days are returned.
pub fn aggregate_daily<Tz: TimeZone>(
    samples: &[ForecastSample],
    tz: &Tz,
    language: Language,
) -> ForecastSeries {
    let mut buckets: Vec<DayBucket> = Vec::new();

    for sample in samples {
        let Some(utc) = DateTime::from_timestamp(sample.timestamp, 0) else {
            debug!(timestamp = sample.timestamp, "skipping sample with invalid timestamp");
            continue;
        };
        if !sample.temperature_c.is_finite() {
            debug!(timestamp = sample.timestamp, "skipping sample with non-finite temperature");
            continue;
        }

        let date = utc.with_timezone(tz).date_naive();
        match buckets.iter_mut().find(|bucket| bucket.date == date) {
            Some(bucket) => {
                bucket.low = bucket.low.min(sample.temperature_c);
                bucket.high = bucket.high.max(sample.temperature_c);
            }
            None => buckets.push(DayBucket {
                date,
                condition: sample.condition,
                low: sample.temperature_c,
                high: sample.temperature_c,
            }),
        }
    }

    let days = buckets
        .into_iter()
        .take(ForecastSeries::MAX_DAYS)
        .map(|bucket| DailyForecast {
            day: locale::weekday_label(bucket.date.weekday(), language).to_string(),
            condition: bucket.condition,
            high_c: round_half_up(bucket.high),
            low_c: round_half_up(bucket.low),
        })
        .collect();

    ForecastSeries::from_days(days)
}

/// Rounds halves toward positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
