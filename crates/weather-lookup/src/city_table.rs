use chrono::{DateTime, Utc};

use crate::condition::ConditionCode;
use crate::model::{Coordinates, CurrentConditions, UvIndex};

/// Baseline conditions for one canonical city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityRecord {
    pub name: &'static str,
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub humidity_pct: u8,
    pub pressure_hpa: u16,
    pub condition: ConditionCode,
    pub description: &'static str,
    pub wind_kmh: u16,
    pub visibility_m: u32,
    pub lat: f64,
    pub lon: f64,
}

impl CityRecord {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::new(self.lat, self.lon).ok()
    }

    pub fn to_conditions(&self, observed_at: DateTime<Utc>) -> CurrentConditions {
        CurrentConditions {
            place_name: self.name.to_string(),
            observed_at,
            temperature_c: f64::from(self.temperature_c),
            feels_like_c: f64::from(self.feels_like_c),
            humidity_pct: self.humidity_pct,
            pressure_hpa: self.pressure_hpa,
            wind_speed_kmh: f64::from(self.wind_kmh),
            visibility_m: self.visibility_m,
            condition: self.condition,
            description: self.description.to_string(),
            uv_index: UvIndex::Unavailable,
            coordinates: self.coordinates(),
        }
    }
}

const fn city(
    name: &'static str,
    (temperature_c, feels_like_c): (i32, i32),
    (humidity_pct, pressure_hpa): (u8, u16),
    (condition, description): (ConditionCode, &'static str),
    (wind_kmh, visibility_m): (u16, u32),
    (lat, lon): (f64, f64),
) -> CityRecord {
    CityRecord {
        name,
        temperature_c,
        feels_like_c,
        humidity_pct,
        pressure_hpa,
        condition,
        description,
        wind_kmh,
        visibility_m,
        lat,
        lon,
    }
}

pub static CITIES: [CityRecord; 10] = [
    city(
        "القاهرة",
        (28, 32),
        (45, 1013),
        (ConditionCode::Clear, "سماء صافية"),
        (12, 10_000),
        (30.0444, 31.2357),
    ),
    city(
        "الإسكندرية",
        (25, 28),
        (65, 1015),
        (ConditionCode::Clouds, "غائم جزئياً"),
        (18, 8_000),
        (31.2001, 29.9187),
    ),
    city(
        "الجيزة",
        (29, 33),
        (40, 1012),
        (ConditionCode::Clear, "سماء صافية"),
        (10, 12_000),
        (30.0131, 31.2089),
    ),
    city(
        "الرياض",
        (35, 40),
        (25, 1008),
        (ConditionCode::Clear, "حار وجاف"),
        (8, 15_000),
        (24.7136, 46.6753),
    ),
    city(
        "جدة",
        (32, 38),
        (70, 1010),
        (ConditionCode::Clear, "حار ورطب"),
        (15, 9_000),
        (21.4858, 39.1925),
    ),
    city(
        "دبي",
        (34, 42),
        (60, 1009),
        (ConditionCode::Clear, "حار ورطب"),
        (12, 10_000),
        (25.2048, 55.2708),
    ),
    city(
        "بيروت",
        (26, 29),
        (55, 1016),
        (ConditionCode::Clouds, "غائم جزئياً"),
        (14, 8_000),
        (33.8938, 35.5018),
    ),
    city(
        "عمان",
        (24, 27),
        (50, 1018),
        (ConditionCode::Clear, "معتدل"),
        (9, 12_000),
        (31.9454, 35.9284),
    ),
    city(
        "الدار البيضاء",
        (22, 25),
        (75, 1020),
        (ConditionCode::Clouds, "غائم"),
        (16, 7_000),
        (33.5731, -7.5898),
    ),
    city(
        "تونس",
        (27, 30),
        (58, 1014),
        (ConditionCode::Clear, "مشمس"),
        (11, 10_000),
        (36.8065, 10.1815),
    ),
];

/// Alternate spellings and country names, keyed in lowercase.
pub static ALIASES: [(&str, &str); 17] = [
    ("cairo", "القاهرة"),
    ("alexandria", "الإسكندرية"),
    ("giza", "الجيزة"),
    ("riyadh", "الرياض"),
    ("jeddah", "جدة"),
    ("dubai", "دبي"),
    ("beirut", "بيروت"),
    ("amman", "عمان"),
    ("casablanca", "الدار البيضاء"),
    ("tunis", "تونس"),
    ("مصر", "القاهرة"),
    ("السعودية", "الرياض"),
    ("الامارات", "دبي"),
    ("لبنان", "بيروت"),
    ("الاردن", "عمان"),
    ("المغرب", "الدار البيضاء"),
    ("تونس", "تونس"),
];

/// Case-sensitive match on the canonical name.
pub fn find_exact(name: &str) -> Option<&'static CityRecord> {
    CITIES.iter().find(|record| record.name == name)
}

/// Case-insensitive match through the alias table.
pub fn find_alias(name: &str) -> Option<&'static CityRecord> {
    let normalized = name.to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .and_then(|(_, canonical)| find_exact(canonical))
}

pub fn lookup(name: &str) -> Option<&'static CityRecord> {
    find_exact(name).or_else(|| find_alias(name))
}
