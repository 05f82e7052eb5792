//! Address geocoding.
//!
//! Translates free-text addresses into geocoded records via the Nominatim
//! search API. The [`Geocoder`] trait is the seam the address store
//! depends on, so tests run against [`MockGeocoder`] instead of the
//! network.

mod client;
mod mock;
mod types;

pub use client::{GeocodeError, NominatimClient, NominatimConfig};
pub use mock::MockGeocoder;
pub use types::{BadPlaceCoordinate, NominatimPlace};

use crate::domain::AddressRecord;

/// Resolves a free-text address to its single best match.
///
/// Implementations return `None` both for "no such place" and for
/// collaborator failures (network, non-success status, unusable result) —
/// a missing geocode is a valid negative outcome, never an error the
/// caller has to handle.
pub trait Geocoder {
    /// Look up the best match for `query`.
    fn lookup(&mut self, query: &str) -> Option<AddressRecord>;
}
