//! Route optimization over the address graphs.
//!
//! Single-pair shortest paths are found with Dijkstra under a selectable
//! cost criterion; multi-destination visiting orders come from either an
//! exhaustive permutation search or a nearest-neighbour greedy walk. The
//! planner operates on a borrowed snapshot of the store and keeps no
//! state of its own.

mod legs;
mod multi;
mod shortest_path;

use crate::distance::InvalidCoordinate;
use crate::domain::TransportMode;
use crate::store::{AddressNotFound, AddressStore};

/// Error from route computation.
///
/// Both variants indicate caller errors (a key that was never stored, or
/// coordinates that bypassed validation via an unvalidated file load);
/// disconnectivity is handled with a fallback route, never an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// An origin, destination or path node has no stored record.
    #[error(transparent)]
    AddressNotFound(#[from] AddressNotFound),

    /// A stored record carries non-finite coordinates.
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),
}

/// Route planner over a snapshot of the address store.
///
/// Private transport searches the connectivity graph; any other mode
/// searches the transit graph. Construction is cheap: the planner borrows
/// the store and can be rebuilt per query.
pub struct Planner<'a> {
    store: &'a AddressStore,
    transport: TransportMode,
}

impl<'a> Planner<'a> {
    /// Creates a planner for the given transport mode.
    pub fn new(store: &'a AddressStore, transport: TransportMode) -> Self {
        Self { store, transport }
    }

    /// The transport mode this planner routes for.
    pub fn transport(&self) -> TransportMode {
        self.transport
    }

    fn require(&self, key: &str) -> Result<(), AddressNotFound> {
        if self.store.contains(key) {
            Ok(())
        } else {
            Err(AddressNotFound(key.to_string()))
        }
    }
}
