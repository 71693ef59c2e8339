//! Deterministic calculators behind the oracle readings: zodiac sign, life
//! path number, Tzolkin kin, moon phase and a small planetary snapshot.

pub mod calendar;
pub mod ephemeris;
pub mod moon;
pub mod numerology;
pub mod tzolkin;
pub mod zodiac;

pub use calendar::{CalendarDate, CalendarError, UNKNOWN_LABEL};
pub use ephemeris::{ephemeris_snapshot, Body, EphemerisError, LongitudeSource, PlanetaryPosition, SwissEphemerisAdapter};
pub use moon::{current_moon_phase, moon_phase_at, MoonPhase};
pub use numerology::{life_path_number, LifePathNumber};
pub use tzolkin::{calculate_tzolkin_kin, TzolkinKin};
pub use zodiac::{resolve_zodiac_sign, zodiac_from_longitude, ZodiacSign};
