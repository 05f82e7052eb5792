//! Address graphs.
//!
//! Two purpose-built adjacency structures instead of a general graph
//! library: an undirected simple-edge map for private-transport
//! connectivity and a directed multi-edge map for public-transport lines.

mod connectivity;
mod transit;

pub use connectivity::{ConnectivityGraph, EdgeMetadata};
pub use transit::{DEFAULT_LEG_DURATION_MINS, TransitEdge, TransitGraph, TransitRoute};
