//! Sky snapshot for the seven classical bodies.
//!
//! Positions come from a [`LongitudeSource`] (the Swiss Ephemeris in
//! production). Retrograde motion is a coarse heuristic: the longitude must
//! have decreased over the last hour by less than 10°, the bound filtering
//! out the 360° -> 0° wrap. It is not an orbital-mechanics station detector.

pub mod adapter;
pub mod types;

pub use adapter::{EphemerisError, LongitudeSource, SwissEphemerisAdapter};
pub use types::{Body, PlanetaryPosition};

use crate::zodiac::{normalize_degrees, zodiac_from_longitude};
use chrono::{DateTime, Duration, Utc};

/// Look-back window for the retrograde check.
pub const RETROGRADE_WINDOW_MINUTES: i64 = 60;
/// Larger backwards jumps are treated as the 360° -> 0° wrap.
pub const WRAP_GUARD_DEGREES: f64 = 10.0;

/// Decide retrograde motion from two longitudes one window apart.
pub fn is_retrograde(longitude_now: f64, longitude_before: f64) -> bool {
    longitude_now < longitude_before && (longitude_now - longitude_before).abs() < WRAP_GUARD_DEGREES
}

/// Position record for one body from its current and previous longitude.
pub fn position_from_longitudes(body: Body, longitude_now: f64, longitude_before: f64) -> PlanetaryPosition {
    let lon = normalize_degrees(longitude_now);
    PlanetaryPosition {
        body,
        sign: zodiac_from_longitude(lon),
        degree: (lon % 30.0).floor() as u8,
        retrograde: is_retrograde(lon, normalize_degrees(longitude_before)),
    }
}

/// Compute sign, degree and retrograde flag for every body in [`Body::ALL`].
pub fn ephemeris_snapshot<S: LongitudeSource + ?Sized>(
    source: &S,
    now: DateTime<Utc>,
) -> Result<Vec<PlanetaryPosition>, EphemerisError> {
    let before = now - Duration::minutes(RETROGRADE_WINDOW_MINUTES);

    Body::ALL
        .iter()
        .map(|&body| {
            let lon_now = source.ecliptic_longitude(body, now)?;
            let lon_before = source.ecliptic_longitude(body, before)?;
            Ok(position_from_longitudes(body, lon_now, lon_before))
        })
        .collect()
}
