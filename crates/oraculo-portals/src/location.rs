use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }
}

/// Where the seeker is, when they allow it to be known.
pub trait LocationProvider {
    fn current_location(&self) -> Option<Coordinates>;
}

/// Coordinates fixed at construction, typically from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(Option<Coordinates>);

impl FixedLocation {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self(coords)
    }

    pub fn unknown() -> Self {
        Self(None)
    }
}

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Option<Coordinates> {
        self.0
    }
}
