//! Geographic coordinate type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in floating-point degrees.
///
/// Serializes as `{"lat": …, "lon": …}`, the shape used by the persisted
/// address file.
///
/// # Examples
///
/// ```
/// use route_planner::domain::Coordinates;
///
/// let guadalajara = Coordinates::new(20.6767, -103.3475);
/// assert!(guadalajara.is_finite());
/// assert!(!Coordinates::new(f64::NAN, 0.0).is_finite());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true when both components are finite real numbers.
    ///
    /// Non-finite coordinates are rejected by distance computation and by
    /// geocode result conversion.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}
