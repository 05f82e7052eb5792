//! Domain types for the address planner.
//!
//! Core value types shared across the store, graphs and planner. Types
//! that appear in the persisted file carry serde renames pinning the wire
//! field names.

mod address;
mod coords;
mod criterion;
mod route;

pub use address::AddressRecord;
pub use coords::Coordinates;
pub use criterion::{Criterion, TransportMode, UnknownCriterion, UnknownTransportMode};
pub use route::{GreedyRouteResult, Instruction, MultiRouteResult, Route, RouteSummary};
