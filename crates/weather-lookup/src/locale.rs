use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::LookupError;
use crate::model::QueryKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ar" => Some(Self::Ar),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// Value for the remote `lang` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }
}

pub fn weekday_label(weekday: Weekday, language: Language) -> &'static str {
    match (language, weekday) {
        (Language::Ar, Weekday::Sun) => "الأحد",
        (Language::Ar, Weekday::Mon) => "الإثنين",
        (Language::Ar, Weekday::Tue) => "الثلاثاء",
        (Language::Ar, Weekday::Wed) => "الأربعاء",
        (Language::Ar, Weekday::Thu) => "الخميس",
        (Language::Ar, Weekday::Fri) => "الجمعة",
        (Language::Ar, Weekday::Sat) => "السبت",
        (Language::En, Weekday::Sun) => "Sunday",
        (Language::En, Weekday::Mon) => "Monday",
        (Language::En, Weekday::Tue) => "Tuesday",
        (Language::En, Weekday::Wed) => "Wednesday",
        (Language::En, Weekday::Thu) => "Thursday",
        (Language::En, Weekday::Fri) => "Friday",
        (Language::En, Weekday::Sat) => "Saturday",
    }
}

const MONTHS_AR: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn month_label(month0: u32, language: Language) -> &'static str {
    let table = match language {
        Language::Ar => &MONTHS_AR,
        Language::En => &MONTHS_EN,
    };
    table[(month0 as usize).min(11)]
}

/// "weekday, day month year" in the Egyptian Arabic style, or the US English one.
pub fn format_long_date(date: NaiveDate, language: Language) -> String {
    let weekday = weekday_label(date.weekday(), language);
    let month = month_label(date.month0(), language);
    match language {
        Language::Ar => localize_digits(
            &format!("{weekday}، {} {month} {}", date.day(), date.year()),
            language,
        ),
        Language::En => format!("{weekday}, {month} {}, {}", date.day(), date.year()),
    }
}

/// Replaces ASCII digits with Arabic-Indic digits for Arabic output.
pub fn localize_digits(text: &str, language: Language) -> String {
    match language {
        Language::En => text.to_string(),
        Language::Ar => text
            .chars()
            .map(|ch| match ch.to_digit(10) {
                Some(digit) if ch.is_ascii_digit() => {
                    char::from_u32('\u{0660}' as u32 + digit).unwrap_or(ch)
                }
                _ => ch,
            })
            .collect(),
    }
}

pub fn current_location_label(language: Language) -> &'static str {
    match language {
        Language::Ar => "موقعك الحالي",
        Language::En => "Current location",
    }
}

pub fn loading_label(language: Language) -> &'static str {
    match language {
        Language::Ar => "جاري التحميل...",
        Language::En => "Loading...",
    }
}

pub fn uv_unavailable_marker() -> &'static str {
    "--"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLabels {
    pub kilometers: &'static str,
    pub kilometers_per_hour: &'static str,
    pub hectopascal: &'static str,
}

pub fn unit_labels(language: Language) -> UnitLabels {
    match language {
        Language::Ar => UnitLabels {
            kilometers: "كم",
            kilometers_per_hour: "كم/س",
            hectopascal: "هكتوباسكال",
        },
        Language::En => UnitLabels {
            kilometers: "km",
            kilometers_per_hour: "km/h",
            hectopascal: "hPa",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailLabels {
    pub visibility: &'static str,
    pub humidity: &'static str,
    pub wind: &'static str,
    pub feels_like: &'static str,
    pub pressure: &'static str,
    pub uv_index: &'static str,
}

pub fn detail_labels(language: Language) -> DetailLabels {
    match language {
        Language::Ar => DetailLabels {
            visibility: "الرؤية",
            humidity: "الرطوبة",
            wind: "سرعة الرياح",
            feels_like: "الإحساس الحراري",
            pressure: "الضغط الجوي",
            uv_index: "مؤشر الأشعة فوق البنفسجية",
        },
        Language::En => DetailLabels {
            visibility: "Visibility",
            humidity: "Humidity",
            wind: "Wind",
            feels_like: "Feels like",
            pressure: "Pressure",
            uv_index: "UV index",
        },
    }
}

/// User-facing message for an error view.
///
/// Lookups by position word their failures around "your location" instead of a city.
pub fn error_message(error: &LookupError, kind: QueryKind, language: Language) -> &'static str {
    match (kind, error) {
        (QueryKind::Coordinates, LookupError::InvalidQuery(_)) => match language {
            Language::Ar => "إحداثيات الموقع غير صالحة",
            Language::En => "The reported location coordinates are invalid",
        },
        (QueryKind::Coordinates, LookupError::Auth(_)) => match language {
            Language::Ar => "API Key غير صحيح",
            Language::En => "Invalid API key",
        },
        (QueryKind::Coordinates, LookupError::NotFound(_)) => match language {
            Language::Ar => "لم يتم العثور على بيانات الموقع",
            Language::En => "No weather data found for this location",
        },
        (QueryKind::Coordinates, LookupError::Service(_)) => match language {
            Language::Ar => "عذراً، لم نتمكن من الحصول على بيانات الطقس لموقعك الحالي",
            Language::En => "Sorry, we could not get the weather for your current location",
        },
        _ => general_error_message(error, language),
    }
}

fn general_error_message(error: &LookupError, language: Language) -> &'static str {
    match (language, error) {
        (Language::Ar, LookupError::InvalidQuery(_)) => "يرجى إدخال اسم مدينة صحيح",
        (Language::Ar, LookupError::Auth(_)) => "API Key غير صحيح - يرجى التحقق من API Key",
        (Language::Ar, LookupError::NotFound(_)) => "لم يتم العثور على هذه المدينة",
        (Language::Ar, LookupError::Service(_)) => "خطأ في الاتصال بالخادم",
        (Language::Ar, LookupError::LocationDenied) => "عذراً، تم رفض إذن الوصول إلى موقعك الحالي",
        (Language::Ar, LookupError::LocationUnavailable(_)) => {
            "عذراً، لم نتمكن من الحصول على موقعك الحالي"
        }
        (Language::Ar, LookupError::LocationUnsupported) => "الجهاز لا يدعم خدمة تحديد الموقع",
        (Language::En, LookupError::InvalidQuery(_)) => "Please enter a valid city name",
        (Language::En, LookupError::Auth(_)) => "Invalid API key - please check your API key",
        (Language::En, LookupError::NotFound(_)) => "City not found",
        (Language::En, LookupError::Service(_)) => "Could not reach the weather service",
        (Language::En, LookupError::LocationDenied) => {
            "Sorry, permission to access your location was denied"
        }
        (Language::En, LookupError::LocationUnavailable(_)) => {
            "Sorry, we could not determine your current location"
        }
        (Language::En, LookupError::LocationUnsupported) => {
            "Location services are not supported on this device"
        }
    }
}
