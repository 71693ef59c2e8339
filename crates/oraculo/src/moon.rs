//! Approximate moon phase from the mean synodic month.
//!
//! The position inside the current lunation is measured from a fixed new moon
//! (2000-01-06 18:14 UTC). True anomaly and perigee drift are ignored, so
//! labels can be off by several hours near a boundary.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.5305882;
const SYNODIC_MONTH_MS: f64 = SYNODIC_MONTH_DAYS * 24.0 * 60.0 * 60.0 * 1000.0;

/// Reference new moon, read as UTC.
pub fn reference_new_moon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

/// Upper bound (exclusive) of each phase, in lunation order.
/// Anything at or past 0.97 wraps back to a new moon.
const PHASE_BOUNDS: &[(f64, MoonPhase)] = &[
    (0.03, MoonPhase::NewMoon),
    (0.22, MoonPhase::WaxingCrescent),
    (0.28, MoonPhase::FirstQuarter),
    (0.47, MoonPhase::WaxingGibbous),
    (0.53, MoonPhase::FullMoon),
    (0.72, MoonPhase::WaningGibbous),
    (0.78, MoonPhase::LastQuarter),
    (0.97, MoonPhase::WaningCrescent),
];

impl MoonPhase {
    /// Lunation order, starting at the new moon.
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    pub fn from_ratio(ratio: f64) -> MoonPhase {
        PHASE_BOUNDS
            .iter()
            .find(|(upper, _)| ratio < *upper)
            .map(|(_, phase)| *phase)
            .unwrap_or(MoonPhase::NewMoon)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "Lua Nova",
            MoonPhase::WaxingCrescent => "Lua Crescente",
            MoonPhase::FirstQuarter => "Quarto Crescente",
            MoonPhase::WaxingGibbous => "Lua Corcunda (Crescente)",
            MoonPhase::FullMoon => "Lua Cheia",
            MoonPhase::WaningGibbous => "Lua Corcunda (Minguante)",
            MoonPhase::LastQuarter => "Quarto Minguante",
            MoonPhase::WaningCrescent => "Lua Minguante",
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }

    /// Position in lunation order (new moon = 0).
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn is_waxing(&self) -> bool {
        matches!(
            self,
            MoonPhase::WaxingCrescent | MoonPhase::FirstQuarter | MoonPhase::WaxingGibbous
        )
    }

    pub fn is_waning(&self) -> bool {
        matches!(
            self,
            MoonPhase::WaningGibbous | MoonPhase::LastQuarter | MoonPhase::WaningCrescent
        )
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fraction of the current lunation elapsed at `now`, in [0, 1).
pub fn phase_ratio(now: DateTime<Utc>) -> f64 {
    let diff = (now - reference_new_moon()).num_milliseconds() as f64;
    let ratio = diff.rem_euclid(SYNODIC_MONTH_MS) / SYNODIC_MONTH_MS;
    // rem_euclid can round up to exactly the modulus for tiny negative inputs
    if ratio >= 1.0 {
        0.0
    } else {
        ratio
    }
}

pub fn moon_phase_at(now: DateTime<Utc>) -> MoonPhase {
    MoonPhase::from_ratio(phase_ratio(now))
}

/// Phase for the current system time.
pub fn current_moon_phase() -> MoonPhase {
    moon_phase_at(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_boundaries() {
        assert_eq!(MoonPhase::from_ratio(0.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_ratio(0.0299), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_ratio(0.03), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::from_ratio(0.22), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_ratio(0.28), MoonPhase::WaxingGibbous);
        assert_eq!(MoonPhase::from_ratio(0.47), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_ratio(0.53), MoonPhase::WaningGibbous);
        assert_eq!(MoonPhase::from_ratio(0.72), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_ratio(0.78), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_ratio(0.9699), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_ratio(0.97), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_ratio(0.999), MoonPhase::NewMoon);
    }
}
