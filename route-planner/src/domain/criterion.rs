//! Route-search cost criteria and transport modes.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an unsupported criterion string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown criterion {input:?}: expected distance, time or transfers")]
pub struct UnknownCriterion {
    input: String,
}

/// The cost dimension a route search minimizes.
///
/// # Examples
///
/// ```
/// use route_planner::domain::Criterion;
///
/// // Both the original Spanish tokens and English names parse.
/// assert_eq!("distancia".parse::<Criterion>().unwrap(), Criterion::Distance);
/// assert_eq!("Time".parse::<Criterion>().unwrap(), Criterion::Time);
/// assert!("velocidad".parse::<Criterion>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Minimum sum of edge distances.
    Distance,
    /// Minimum sum of edge durations (distance proxy for private
    /// transport, where durations are not modeled on edges).
    Time,
    /// Minimum hop count.
    Transfers,
}

impl FromStr for Criterion {
    type Err = UnknownCriterion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distancia" | "distance" => Ok(Criterion::Distance),
            "tiempo" | "time" => Ok(Criterion::Time),
            "transbordos" | "transfers" => Ok(Criterion::Transfers),
            _ => Err(UnknownCriterion { input: s.into() }),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Criterion::Distance => "distance",
            Criterion::Time => "time",
            Criterion::Transfers => "transfers",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an unsupported transport mode string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode {input:?}: expected private, public or combined")]
pub struct UnknownTransportMode {
    input: String,
}

/// How the traveller moves between addresses.
///
/// Private transport routes over the connectivity graph; any other mode
/// routes over the transit graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    /// Own vehicle; edge durations are not modeled.
    Private,
    /// Public transport over user-declared lines.
    Public,
    /// Mixed private/public trip.
    Combined,
}

impl TransportMode {
    /// True for [`TransportMode::Private`].
    pub fn is_private(&self) -> bool {
        matches!(self, TransportMode::Private)
    }
}

impl FromStr for TransportMode {
    type Err = UnknownTransportMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "privado" | "private" => Ok(TransportMode::Private),
            "publico" | "público" | "public" => Ok(TransportMode::Public),
            "combinado" | "combined" => Ok(TransportMode::Combined),
            _ => Err(UnknownTransportMode { input: s.into() }),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportMode::Private => "private",
            TransportMode::Public => "public",
            TransportMode::Combined => "combined",
        };
        f.write_str(name)
    }
}
