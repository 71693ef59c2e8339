//! Tzolkin Kin calculator.
//!
//! The 260-day count is anchored on a single calibration point,
//! 2024-01-01 (noon UTC) = Kin 73, and walked forwards or backwards by whole
//! days. Seal, tone and color all derive from the kin number.

use crate::calendar::{self, CalendarDate, CalendarError};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TZOLKIN_CYCLE: i64 = 260;
pub const REFERENCE_KIN: i64 = 73;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Index 0 is the twentieth seal (Sol), then 1..=19.
pub const SEALS: [&str; 20] = [
    "Sol",
    "Dragão",
    "Vento",
    "Noite",
    "Semente",
    "Serpente",
    "Enlaçador de Mundos",
    "Mão",
    "Estrela",
    "Lua",
    "Cachorro",
    "Macaco",
    "Humano",
    "Caminhante do Céu",
    "Mago",
    "Águia",
    "Guerreiro",
    "Terra",
    "Espelho",
    "Tempestade",
];

/// Index 0 is the thirteenth tone (Cósmico), then 1..=12.
pub const TONES: [&str; 13] = [
    "Cósmico",
    "Magnético",
    "Lunar",
    "Elétrico",
    "Autoexistente",
    "Harmônico",
    "Rítmico",
    "Ressonante",
    "Galáctico",
    "Solar",
    "Planetário",
    "Espectral",
    "Cristal",
];

pub const COLORS: [&str; 4] = ["Amarelo", "Vermelho", "Branco", "Azul"];

/// 2024-01-01T12:00:00Z, the day known to be Kin 73.
pub fn reference_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TzolkinKin {
    pub kin_number: u16,
    pub seal: String,
    pub tone: String,
    pub color: String,
    pub full_name: String,
}

impl TzolkinKin {
    /// Kin for a calendar date.
    pub fn for_date(date: CalendarDate) -> Self {
        let diff_ms = (date.at_noon_utc() - reference_instant()).num_milliseconds();
        let diff_days = (diff_ms as f64 / MILLIS_PER_DAY).round() as i64;
        Self::from_kin_number(kin_number_from_offset(diff_days))
    }

    /// Build the full record from a kin number in 1..=260.
    pub fn from_kin_number(kin_number: u16) -> Self {
        let seal_index = (kin_number % 20) as usize;
        let tone_index = (kin_number % 13) as usize;
        let seal = SEALS[seal_index];
        let tone = TONES[tone_index];
        let color = COLORS[seal_index % 4];

        Self {
            kin_number,
            seal: seal.to_string(),
            tone: tone.to_string(),
            color: color.to_string(),
            full_name: format!("{} {} {}", seal, tone, color),
        }
    }

    pub fn seal_index(&self) -> usize {
        (self.kin_number % 20) as usize
    }

    pub fn tone_index(&self) -> usize {
        (self.kin_number % 13) as usize
    }
}

impl fmt::Display for TzolkinKin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kin {} ({})", self.kin_number, self.full_name)
    }
}

/// Kin number `diff_days` away from the reference day, normalized to 1..=260.
pub fn kin_number_from_offset(diff_days: i64) -> u16 {
    let kin = (REFERENCE_KIN + diff_days).rem_euclid(TZOLKIN_CYCLE);
    if kin == 0 {
        TZOLKIN_CYCLE as u16
    } else {
        kin as u16
    }
}

/// Kin for a `YYYY-MM-DD` date. Empty input yields `Ok(None)`.
pub fn calculate_tzolkin_kin(date: &str) -> Result<Option<TzolkinKin>, CalendarError> {
    let kin = calendar::parse_optional(date)?.map(TzolkinKin::for_date);
    if let Some(k) = &kin {
        log::debug!("tzolkin: {} -> kin {}", date.trim(), k.kin_number);
    }
    Ok(kin)
}
