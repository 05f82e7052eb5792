//! Great-circle distance between coordinate pairs.

use crate::domain::Coordinates;

/// Mean radius of Earth, in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Error returned when a coordinate component is not a finite real number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate {coords}: {reason}")]
pub struct InvalidCoordinate {
    coords: Coordinates,
    reason: &'static str,
}

/// Computes the great-circle distance between two positions using the
/// haversine formula. Returns kilometers.
///
/// Symmetric in its arguments and zero for identical points. Fails when
/// either position contains a NaN or infinite component.
///
/// # Examples
///
/// ```
/// use route_planner::distance::haversine_km;
/// use route_planner::domain::Coordinates;
///
/// let a = Coordinates::new(0.0, 0.0);
/// let b = Coordinates::new(0.0, 1.0);
///
/// // One degree of longitude at the equator is roughly 111 km.
/// let d = haversine_km(&a, &b).unwrap();
/// assert!((d - 111.19).abs() < 0.1);
///
/// assert_eq!(haversine_km(&a, &a).unwrap(), 0.0);
/// ```
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> Result<f64, InvalidCoordinate> {
    for c in [a, b] {
        if !c.is_finite() {
            return Err(InvalidCoordinate {
                coords: *c,
                reason: "latitude and longitude must be finite",
            });
        }
    }

    let lat1 = a.lat.to_radians();
    let lon1 = a.lon.to_radians();
    let lat2 = b.lat.to_radians();
    let lon2 = b.lon.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    Ok(2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin())
}
