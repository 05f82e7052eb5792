//! Leg assembly and route summarization.
//!
//! Turns a raw key sequence into geometry points and per-leg instructions,
//! and derives aggregate metrics from a finished route.

use crate::distance::haversine_km;
use crate::domain::{Coordinates, Criterion, Instruction, Route, RouteSummary, TransportMode};
use crate::store::{AddressNotFound, AddressStore};

use super::{Planner, RouteError};

/// Estimated private-transport pace, minutes per kilometer.
const PRIVATE_MINS_PER_KM: f64 = 2.0;

/// Fixed per-leg duration estimate for non-private transport, minutes.
const TRANSIT_LEG_MINS: f64 = 3.0;

pub(super) fn point(store: &AddressStore, key: &str) -> Result<Coordinates, RouteError> {
    store
        .coords_of(key)
        .ok_or_else(|| AddressNotFound(key.to_string()).into())
}

pub(super) fn path_geometry(
    store: &AddressStore,
    stops: &[String],
) -> Result<Vec<Coordinates>, RouteError> {
    stops.iter().map(|key| point(store, key)).collect()
}

pub(super) fn leg_instruction(
    store: &AddressStore,
    from: &str,
    to: &str,
    transport: TransportMode,
) -> Result<Instruction, RouteError> {
    let distance_km = haversine_km(&point(store, from)?, &point(store, to)?)?;
    let duration_mins = if transport.is_private() {
        distance_km * PRIVATE_MINS_PER_KM
    } else {
        TRANSIT_LEG_MINS
    };

    Ok(Instruction {
        text: format!("From {from} to {to}"),
        distance_km,
        duration_secs: duration_mins * 60.0,
        mode: transport,
    })
}

impl Planner<'_> {
    /// Builds a full route from a key sequence and its search cost.
    pub(super) fn assemble(&self, stops: Vec<String>, cost: f64) -> Result<Route, RouteError> {
        let geometry = path_geometry(self.store, &stops)?;
        let instructions = stops
            .windows(2)
            .map(|pair| leg_instruction(self.store, &pair[0], &pair[1], self.transport))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Route {
            stops,
            cost,
            geometry,
            instructions,
        })
    }

    /// Derives aggregate metrics from a computed route.
    ///
    /// Total time is the search cost when the route was optimized for
    /// time; otherwise it is estimated from total distance for private
    /// transport and taken from the cost for transit. Transfers are
    /// recomputed from the transit graph and are always zero for private
    /// transport.
    pub fn summarize(&self, route: &Route, criterion: Criterion) -> Result<RouteSummary, RouteError> {
        let mut total_distance_km = 0.0;
        for pair in route.stops.windows(2) {
            total_distance_km += haversine_km(
                &point(self.store, &pair[0])?,
                &point(self.store, &pair[1])?,
            )?;
        }

        let total_time_mins = match criterion {
            Criterion::Time => route.cost,
            _ if self.transport.is_private() => total_distance_km * PRIVATE_MINS_PER_KM,
            _ => route.cost,
        };

        let transfers = if self.transport.is_private() {
            0
        } else {
            route
                .stops
                .windows(3)
                .filter(|w| self.store.transit().is_transfer(&w[0], &w[1], &w[2]))
                .count()
        };

        Ok(RouteSummary {
            total_distance_km,
            total_time_mins,
            transfers,
            criterion,
            transport: self.transport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AddressRecord;

    #[test]
    fn instruction_private_estimates_from_distance() {
        let mut store = AddressStore::new();
        store.insert_record("a", AddressRecord::bare("A", Coordinates::new(0.0, 0.0)));
        store.insert_record("b", AddressRecord::bare("B", Coordinates::new(0.0, 1.0)));

        let leg = leg_instruction(&store, "a", "b", TransportMode::Private).unwrap();
        assert_eq!(leg.text, "From a to b");
        assert!((leg.distance_km - 111.19).abs() < 0.1);
        assert!((leg.duration_secs - leg.distance_km * 2.0 * 60.0).abs() < 1e-9);
    }

    #[test]
    fn instruction_transit_uses_fixed_estimate() {
        let mut store = AddressStore::new();
        store.insert_record("a", AddressRecord::bare("A", Coordinates::new(0.0, 0.0)));
        store.insert_record("b", AddressRecord::bare("B", Coordinates::new(0.0, 1.0)));

        let leg = leg_instruction(&store, "a", "b", TransportMode::Public).unwrap();
        assert_eq!(leg.duration_secs, 180.0);
    }

    #[test]
    fn missing_stop_fails() {
        let store = AddressStore::new();
        assert!(point(&store, "ghost").is_err());
    }

    fn transit_store() -> AddressStore {
        let mut store = AddressStore::new();
        store.insert_record("a", AddressRecord::bare("A", Coordinates::new(0.0, 0.0)));
        store.insert_record("b", AddressRecord::bare("B", Coordinates::new(0.0, 1.0)));
        store.insert_record("c", AddressRecord::bare("C", Coordinates::new(0.0, 2.0)));
        // Two different lines meet at b, so passing through it is a
        // transfer.
        store
            .add_transit_route(vec!["a".into(), "b".into()], "bus", "L1", &[5.0])
            .unwrap();
        store
            .add_transit_route(vec!["b".into(), "c".into()], "bus", "L2", &[5.0])
            .unwrap();
        store
    }

    #[test]
    fn summary_counts_transfers_on_transit_routes() {
        let store = transit_store();
        let planner = Planner::new(&store, crate::domain::TransportMode::Public);

        let route = planner.shortest_path("a", "c", Criterion::Time).unwrap();
        let summary = planner.summarize(&route, Criterion::Time).unwrap();

        assert_eq!(summary.transfers, 1);
        // Optimized for time, so the total is the search cost itself.
        assert_eq!(summary.total_time_mins, route.cost);
        assert!((summary.total_distance_km - 222.39).abs() < 0.2);
    }

    #[test]
    fn summary_private_transport_never_reports_transfers() {
        let mut store = transit_store();
        store.connect("a", "b", Default::default());
        store.connect("b", "c", Default::default());

        let planner = Planner::new(&store, TransportMode::Private);
        let route = planner
            .shortest_path("a", "c", Criterion::Distance)
            .unwrap();
        let summary = planner.summarize(&route, Criterion::Distance).unwrap();

        assert_eq!(summary.transfers, 0);
        // Private time estimate is distance at two minutes per kilometer.
        assert!(
            (summary.total_time_mins - summary.total_distance_km * 2.0).abs() < 1e-9
        );
    }
}
