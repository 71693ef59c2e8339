use crate::ephemeris::types::Body;
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use std::env;
use std::path::{Path, PathBuf};
use swisseph::swe::{calc_ut, julday, revjul, set_ephe_path};
use thiserror::Error;

const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Failed to calculate position for {body} at {datetime}: {message}")]
    CalculationFailed {
        body: String,
        datetime: DateTime<Utc>,
        message: String,
    },
}

/// Anything that can report a geocentric, tropical ecliptic longitude.
pub trait LongitudeSource {
    /// Longitude in degrees, [0, 360)
    fn ecliptic_longitude(&self, body: Body, at: DateTime<Utc>) -> Result<f64, EphemerisError>;
}

// Swiss Ephemeris planet codes
fn planet_code(body: Body) -> u32 {
    match body {
        Body::Sun => 0,
        Body::Moon => 1,
        Body::Mercury => 2,
        Body::Venus => 3,
        Body::Mars => 4,
        Body::Jupiter => 5,
        Body::Saturn => 6,
    }
}

// FLG_SWIEPH: read the Swiss Ephemeris data files
const FLG_SWIEPH: u32 = 2;

/// Swiss Ephemeris adapter implementation
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path.
    ///
    /// Falls back to `SWISS_EPHEMERIS_PATH`, then `/usr/local/share/swisseph`.
    /// The path is handed to the library, so it is process-wide.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        set_ephe_path(&path.to_string_lossy());
        log::debug!("Swiss Ephemeris data at {}", path.display());
        Ok(Self {
            ephemeris_path: path,
        })
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }
}

impl LongitudeSource for SwissEphemerisAdapter {
    fn ecliptic_longitude(&self, body: Body, at: DateTime<Utc>) -> Result<f64, EphemerisError> {
        let jd = datetime_to_julian_day(at);
        let result = calc_ut(jd, planet_code(body), FLG_SWIEPH).map_err(|e| {
            EphemerisError::CalculationFailed {
                body: body.id().to_string(),
                datetime: julian_day_to_datetime(jd),
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let longitude = result.out[0] % 360.0;
        Ok(if longitude < 0.0 { longitude + 360.0 } else { longitude })
    }
}

/// Convert UTC datetime to Julian Day
fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let hour_decimal =
        dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0;

    // GREG_CAL = 1
    julday(dt.year(), dt.month() as i32, dt.day() as i32, hour_decimal, 1)
}

/// Convert Julian Day to UTC datetime, for error reporting
fn julian_day_to_datetime(jd: f64) -> DateTime<Utc> {
    let (year, month, day, hour_decimal) = revjul(jd, 1);
    let hour = hour_decimal as u32;
    let minute = ((hour_decimal - hour as f64) * 60.0) as u32;
    let second = (((hour_decimal - hour as f64) * 60.0 - minute as f64) * 60.0) as u32;
    Utc.with_ymd_and_hms(year, month as u32, day as u32, hour, minute, second)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_missing_path_is_reported() {
        let err = SwissEphemerisAdapter::new(Some(PathBuf::from("/definitely/not/here")))
            .err()
            .expect("missing path must fail");
        assert!(matches!(err, EphemerisError::FileNotFound { .. }));
    }

    #[test]
    fn test_planet_codes_are_distinct() {
        let codes: HashSet<u32> = Body::ALL.iter().map(|b| planet_code(*b)).collect();
        assert_eq!(codes.len(), Body::ALL.len());
    }
}
