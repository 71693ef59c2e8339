//! Tropical zodiac signs.
//!
//! Two entry points: a birth date resolved through fixed month/day ranges, and a
//! continuous ecliptic longitude split into twelve 30° segments starting at Áries.

use crate::calendar::{self, CalendarDate, CalendarError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// (sign, start month, start day, end month, end day), inclusive on both ends.
/// Capricorn wraps the year boundary.
const SIGN_RANGES: &[(ZodiacSign, u32, u32, u32, u32)] = &[
    (ZodiacSign::Capricorn, 12, 22, 1, 20),
    (ZodiacSign::Aquarius, 1, 21, 2, 18),
    (ZodiacSign::Pisces, 2, 19, 3, 20),
    (ZodiacSign::Aries, 3, 21, 4, 19),
    (ZodiacSign::Taurus, 4, 20, 5, 20),
    (ZodiacSign::Gemini, 5, 21, 6, 20),
    (ZodiacSign::Cancer, 6, 21, 7, 22),
    (ZodiacSign::Leo, 7, 23, 8, 22),
    (ZodiacSign::Virgo, 8, 23, 9, 22),
    (ZodiacSign::Libra, 9, 23, 10, 22),
    (ZodiacSign::Scorpio, 10, 23, 11, 21),
    (ZodiacSign::Sagittarius, 11, 22, 12, 21),
];

impl ZodiacSign {
    /// Ecliptic order, 0° Áries first.
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Portuguese display name.
    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Áries",
            ZodiacSign::Taurus => "Touro",
            ZodiacSign::Gemini => "Gêmeos",
            ZodiacSign::Cancer => "Câncer",
            ZodiacSign::Leo => "Leão",
            ZodiacSign::Virgo => "Virgem",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Escorpião",
            ZodiacSign::Sagittarius => "Sagitário",
            ZodiacSign::Capricorn => "Capricórnio",
            ZodiacSign::Aquarius => "Aquário",
            ZodiacSign::Pisces => "Peixes",
        }
    }

    /// Position in ecliptic order (Áries = 0).
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Resolve a sign from month and day alone. The year never matters.
    pub fn from_month_day(month: u32, day: u32) -> Option<ZodiacSign> {
        SIGN_RANGES
            .iter()
            .find(|(_, start_m, start_d, end_m, end_d)| {
                (month == *start_m && day >= *start_d) || (month == *end_m && day <= *end_d)
            })
            .map(|(sign, ..)| *sign)
    }

    pub fn from_date(date: &CalendarDate) -> Option<ZodiacSign> {
        Self::from_month_day(date.month(), date.day())
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve the sun sign for a `YYYY-MM-DD` birth date.
///
/// Empty input yields `Ok(None)` ("Desconhecido"); malformed input is an error.
pub fn resolve_zodiac_sign(date: &str) -> Result<Option<ZodiacSign>, CalendarError> {
    Ok(calendar::parse_optional(date)?.and_then(|d| ZodiacSign::from_date(&d)))
}

/// Sign containing an ecliptic longitude in degrees.
pub fn zodiac_from_longitude(longitude: f64) -> ZodiacSign {
    let lon = normalize_degrees(longitude);
    let index = (lon / 30.0).floor() as usize;
    ZodiacSign::ALL[index % 12]
}

/// Normalize degrees to [0, 360).
pub fn normalize_degrees(value: f64) -> f64 {
    let mut normalized = value % 360.0;
    if normalized < 0.0 {
        normalized += 360.0;
    }
    normalized
}
