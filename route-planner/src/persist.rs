//! Address file persistence.
//!
//! One JSON document holds the full store: the record map, every
//! connectivity edge and the authored transit lines. The top-level keys
//! (`direcciones`, `grafo_edges`, `transporte_rutas`) and all field names
//! inside them are fixed — existing saved files must keep loading, so the
//! wire names never change even though the code is English.
//!
//! Loading replaces the in-memory store wholesale and deliberately does
//! NOT validate cross-references: an edge or transit stop naming an
//! address that is absent from `direcciones` is accepted silently. Known
//! gap, kept for compatibility with files written by older tools.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::AddressRecord;
use crate::graph::{EdgeMetadata, TransitRoute};
use crate::store::AddressStore;

/// Error from saving or loading the address file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The file could not be written.
    #[error("could not write address file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be read or did not contain a valid document.
    #[error("corrupt or unreadable address file {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// On-disk document. Field names are the wire contract.
#[derive(Debug, Serialize, Deserialize)]
struct FileDocument {
    #[serde(default)]
    direcciones: BTreeMap<String, AddressRecord>,
    #[serde(default)]
    grafo_edges: Vec<(String, String, EdgeMetadata)>,
    #[serde(default)]
    transporte_rutas: Vec<TransitRouteDoc>,
}

/// One authored transit line as persisted.
#[derive(Debug, Serialize, Deserialize)]
struct TransitRouteDoc {
    paradas: Vec<String>,
    tipo: String,
    linea: String,
    #[serde(default)]
    duraciones: Vec<f64>,
}

impl From<&TransitRoute> for TransitRouteDoc {
    fn from(route: &TransitRoute) -> Self {
        Self {
            paradas: route.stops.clone(),
            tipo: route.mode.clone(),
            linea: route.line.clone(),
            duraciones: route.leg_durations.clone(),
        }
    }
}

/// Writes the store to `path` as a pretty-printed UTF-8 JSON document.
pub fn save(store: &AddressStore, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();

    let document = FileDocument {
        direcciones: store.records().clone(),
        grafo_edges: store
            .connectivity()
            .edges()
            .map(|(a, b, metadata)| (a.to_string(), b.to_string(), metadata.clone()))
            .collect(),
        transporte_rutas: store.transit().routes().iter().map(Into::into).collect(),
    };

    let json = serde_json::to_string_pretty(&document).map_err(|e| PersistError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    fs::write(path, json).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        addresses = store.len(),
        "address file saved"
    );
    Ok(())
}

/// Reads `path` and rebuilds a store from it, replacing nothing until the
/// document has parsed successfully.
pub fn load(path: impl AsRef<Path>) -> Result<AddressStore, PersistError> {
    let path = path.as_ref();

    let text = fs::read_to_string(path).map_err(|e| PersistError::Corrupt {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let document: FileDocument = serde_json::from_str(&text).map_err(|e| PersistError::Corrupt {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mut store = AddressStore::new();
    for (key, record) in document.direcciones {
        store.insert_record(key, record);
    }

    for (k1, k2, metadata) in document.grafo_edges {
        // Raw insertion: endpoints are not checked against the record
        // map, matching the no-validation load contract.
        store.connectivity_mut().insert_edge(&k1, &k2, metadata);
    }

    for route in document.transporte_rutas {
        store.add_transit_route_unchecked(TransitRoute::new(
            route.paradas,
            route.tipo,
            route.linea,
            &route.duraciones,
        ));
    }

    info!(
        path = %path.display(),
        addresses = store.len(),
        edges = store.connectivity().edge_count(),
        transit_routes = store.transit().routes().len(),
        "address file loaded"
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use crate::graph::EdgeMetadata;

    fn record(name: &str, lat: f64, lon: f64) -> AddressRecord {
        AddressRecord::bare(name, Coordinates::new(lat, lon))
    }

    fn sample_store() -> AddressStore {
        let mut store = AddressStore::new();
        store.insert_record("a", record("A", 0.0, 0.0));
        store.insert_record("b", record("B", 0.0, 1.0));
        store.insert_record("c", record("C", 1.0, 0.0));
        store.connect("a", "b", EdgeMetadata::default());
        store.connect("b", "c", EdgeMetadata::with_distance(7.5));
        store
            .add_transit_route(
                vec!["a".into(), "b".into(), "c".into()],
                "bus",
                "L1",
                &[4.0, 6.0],
            )
            .unwrap();
        store
    }

    #[test]
    fn roundtrip_reproduces_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addresses.json");

        let original = sample_store();
        save(&original, &path).unwrap();
        let loaded = load(&path).unwrap();

        // Same records, field for field.
        assert_eq!(loaded.records(), original.records());

        // Same edge set with the same metadata.
        let edges = |s: &AddressStore| {
            s.connectivity()
                .edges()
                .map(|(a, b, m)| (a.to_string(), b.to_string(), m.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(edges(&loaded), edges(&original));

        // Same authored transit lines.
        assert_eq!(loaded.transit().routes(), original.transit().routes());
        assert_eq!(loaded.transit().edge_count(), original.transit().edge_count());
    }

    #[test]
    fn wire_format_top_level_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addresses.json");
        save(&sample_store(), &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert!(json["direcciones"].is_object());
        assert!(json["grafo_edges"].is_array());
        assert!(json["transporte_rutas"].is_array());

        let edge = &json["grafo_edges"][0];
        assert_eq!(edge[0], "a");
        assert_eq!(edge[1], "b");
        assert!(edge[2]["distancia"].is_number());

        let route = &json["transporte_rutas"][0];
        assert_eq!(route["paradas"], serde_json::json!(["a", "b", "c"]));
        assert_eq!(route["tipo"], "bus");
        assert_eq!(route["linea"], "L1");
        assert_eq!(route["duraciones"], serde_json::json!([4.0, 6.0]));
    }

    #[test]
    fn load_accepts_dangling_edge_reference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addresses.json");

        let json = serde_json::json!({
            "direcciones": {
                "a": {
                    "direccion": "A",
                    "coordenadas": {"lat": 0.0, "lon": 0.0},
                    "componentes": {},
                    "osm_id": 1,
                    "tipo": "house",
                    "categoria": null
                }
            },
            "grafo_edges": [["a", "phantom", {"distancia": 3.0}]],
            "transporte_rutas": []
        });
        fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

        let store = load(&path).unwrap();
        assert!(store.get("phantom").is_none());
        assert_eq!(store.neighbors("a"), vec!["phantom"]);
    }

    #[test]
    fn load_accepts_transit_stop_without_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addresses.json");

        let json = serde_json::json!({
            "direcciones": {},
            "grafo_edges": [],
            "transporte_rutas": [
                {"paradas": ["x", "y"], "tipo": "bus", "linea": "L9", "duraciones": [8.0]}
            ]
        });
        fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

        let store = load(&path).unwrap();
        let edges = store.transit().edges_from("x");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].distance_km, 0.0);
        assert_eq!(edges[0].duration_mins, 8.0);
    }

    #[test]
    fn malformed_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addresses.json");
        fs::write(&path, "{not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, PersistError::Corrupt { .. }));
    }

    #[test]
    fn missing_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PersistError::Corrupt { .. }));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addresses.json");
        fs::write(&path, "{}").unwrap();

        let store = load(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.connectivity().edge_count(), 0);
        assert!(store.transit().routes().is_empty());
    }

    #[test]
    fn edge_extras_survive_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("addresses.json");

        let mut store = sample_store();
        let mut metadata = EdgeMetadata::with_distance(1.0);
        metadata
            .extra
            .insert("peaje".into(), serde_json::Value::Bool(true));
        store.connect("a", "c", metadata);

        save(&store, &path).unwrap();
        let loaded = load(&path).unwrap();

        let edge = loaded.connectivity().edge("a", "c").unwrap();
        assert_eq!(edge.extra["peaje"], true);
    }
}
