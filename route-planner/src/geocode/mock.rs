//! Mock geocoder for testing without network access.

use std::collections::HashMap;

use crate::domain::AddressRecord;

use super::Geocoder;

/// Geocoder backed by a fixed set of canned records.
///
/// Counts lookups so tests can assert that the store never consults the
/// geocoder for an address it already holds.
#[derive(Debug, Clone, Default)]
pub struct MockGeocoder {
    records: HashMap<String, AddressRecord>,
    lookups: usize,
}

impl MockGeocoder {
    /// Creates an empty mock (every lookup misses).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a canned result for a query string.
    pub fn insert(&mut self, query: impl Into<String>, record: AddressRecord) {
        self.records.insert(query.into(), record);
    }

    /// Number of lookups issued so far, hits and misses alike.
    pub fn lookup_count(&self) -> usize {
        self.lookups
    }
}

impl Geocoder for MockGeocoder {
    fn lookup(&mut self, query: &str) -> Option<AddressRecord> {
        self.lookups += 1;
        self.records.get(query).cloned()
    }
}
