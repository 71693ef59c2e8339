use crate::zodiac::ZodiacSign;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bodies included in a sky snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
}

impl Body {
    /// Snapshot order.
    pub const ALL: [Body; 7] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
    ];

    /// Lowercase identifier, matching the Swiss Ephemeris id table.
    pub fn id(&self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
        }
    }

    /// Portuguese display name.
    pub fn label(&self) -> &'static str {
        match self {
            Body::Sun => "Sol",
            Body::Moon => "Lua",
            Body::Mercury => "Mercúrio",
            Body::Venus => "Vênus",
            Body::Mars => "Marte",
            Body::Jupiter => "Júpiter",
            Body::Saturn => "Saturno",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where one body sits on the zodiac right now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryPosition {
    pub body: Body,
    pub sign: ZodiacSign,
    /// Whole degrees inside the sign (0-29)
    pub degree: u8,
    /// Longitude decreased over the last hour
    pub retrograde: bool,
}

impl fmt::Display for PlanetaryPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}° {}", self.body, self.degree, self.sign)?;
        if self.retrograde {
            f.write_str(" (R)")?;
        }
        Ok(())
    }
}
