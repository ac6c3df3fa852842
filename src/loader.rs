//! Circuit configuration loading and validation.
//!
//! Configuration files are JSON as written by the canvas editor. Hand-edited
//! files with comments or trailing commas are accepted through a JSON5
//! fallback. Everything is validated here; routing only sees [`Circuit`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::ir::{Circuit, Component, Connection, Endpoint, PinMap};
use crate::routing::{Diagnostic, DiagnosticKind};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("circuit config is neither JSON nor JSON5: {0}")]
    Syntax(String),
    #[error("circuit config has an invalid shape: {0}")]
    Shape(#[source] serde_json::Error),
    #[error("duplicate component id {0:?}")]
    DuplicateComponent(String),
    #[error("connection {0:?} must map device ids to pin ids")]
    InvalidConnection(String),
    #[error("component {component:?} has {field} outside the canvas range")]
    InvalidCoordinate {
        component: String,
        field: &'static str,
    },
}

/// Problems with one component's pin map. Never fatal to a load.
#[derive(Debug, Error)]
pub enum PinMapError {
    #[error("pin map is not valid JSON: {0}")]
    Syntax(String),
    #[error("pin map has an invalid shape: {0}")]
    Shape(#[source] serde_json::Error),
    #[error("pin {0:?} needs two relocation coordinates")]
    ShortPoints(String),
    #[error("pin {0:?} has a relocation outside the canvas range")]
    InvalidOffset(String),
}

/// Largest coordinate magnitude accepted anywhere on the canvas.
pub const MAX_COORDINATE: f32 = 1.0e6;

fn in_canvas_range(value: f32) -> bool {
    value.is_finite() && value.abs() <= MAX_COORDINATE
}

#[derive(Debug, Clone, Default)]
pub struct LoadedCircuit {
    pub circuit: Circuit,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Deserialize)]
struct RawCircuit {
    components: Vec<RawComponent>,
    #[serde(default)]
    wire: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    rotation: f32,
    #[serde(default)]
    image: Option<RawImage>,
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    height: Option<f32>,
    #[serde(rename = "pin-map", default)]
    pin_map_ref: Option<RawPinMapRef>,
    #[serde(rename = "pinMap", default)]
    pin_map: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    height: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct RawPinMapRef {
    #[serde(default)]
    src: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPinMap {
    #[serde(rename = "digital-pins")]
    digital_pins: RawDigitalPins,
}

#[derive(Debug, Deserialize)]
struct RawDigitalPins {
    #[serde(default)]
    id: Vec<String>,
    #[serde(default)]
    reloc: Vec<RawReloc>,
}

#[derive(Debug, Deserialize)]
struct RawReloc {
    id: String,
    points: Vec<f32>,
}

/// Reads a circuit configuration file. Pin-map `src` references resolve
/// against the file's directory.
pub fn load_circuit(path: &Path) -> Result<LoadedCircuit, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_circuit(&contents, Some(base_dir))
}

/// Parses and validates a circuit configuration.
///
/// Without `base_dir`, components that only reference an external pin map
/// are loaded without pins and reported.
pub fn parse_circuit(contents: &str, base_dir: Option<&Path>) -> Result<LoadedCircuit, LoadError> {
    let value = parse_json_or_json5(contents).map_err(LoadError::Syntax)?;
    let raw: RawCircuit = serde_json::from_value(value).map_err(LoadError::Shape)?;

    let mut diagnostics = Vec::new();
    let mut seen = HashSet::new();
    let mut components = Vec::with_capacity(raw.components.len());
    for raw_component in raw.components {
        if !seen.insert(raw_component.id.clone()) {
            return Err(LoadError::DuplicateComponent(raw_component.id));
        }
        components.push(build_component(raw_component, base_dir, &mut diagnostics)?);
    }

    let mut connections = Vec::with_capacity(raw.wire.len());
    for (name, entry) in raw.wire {
        connections.push(build_connection(name, entry)?);
    }

    Ok(LoadedCircuit {
        circuit: Circuit {
            components,
            connections,
        },
        diagnostics,
    })
}

/// Converts a `digital-pins` document into a [`PinMap`].
pub fn parse_pin_map(value: Value) -> Result<PinMap, PinMapError> {
    let raw: RawPinMap = serde_json::from_value(value).map_err(PinMapError::Shape)?;
    let mut offsets = HashMap::with_capacity(raw.digital_pins.reloc.len());
    for reloc in raw.digital_pins.reloc {
        let (Some(&dx), Some(&dy)) = (reloc.points.first(), reloc.points.get(1)) else {
            return Err(PinMapError::ShortPoints(reloc.id));
        };
        if !in_canvas_range(dx) || !in_canvas_range(dy) {
            return Err(PinMapError::InvalidOffset(reloc.id));
        }
        offsets.insert(reloc.id, (dx, dy));
    }
    let mut order = Vec::with_capacity(raw.digital_pins.id.len());
    for id in raw.digital_pins.id {
        if !order.contains(&id) {
            order.push(id);
        }
    }
    Ok(PinMap { order, offsets })
}

fn parse_json_or_json5(contents: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(contents) {
        Ok(value) => Ok(value),
        Err(json_err) => json5::from_str::<Value>(contents).map_err(|_| json_err.to_string()),
    }
}

fn build_component(
    raw: RawComponent,
    base_dir: Option<&Path>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Component, LoadError> {
    let (image_width, image_height) = raw
        .image
        .as_ref()
        .map(|image| (image.width, image.height))
        .unwrap_or((None, None));
    let width = image_width.or(raw.width);
    let height = image_height.or(raw.height);
    let fields = [
        ("x", Some(raw.x)),
        ("y", Some(raw.y)),
        ("width", width),
        ("height", height),
    ];
    if let Some((field, _)) = fields
        .iter()
        .find(|(_, value)| value.is_some_and(|v| !in_canvas_range(v)))
    {
        return Err(LoadError::InvalidCoordinate {
            component: raw.id,
            field: *field,
        });
    }

    let src = raw.pin_map_ref.and_then(|pin_ref| pin_ref.src);

    let pin_value = match (raw.pin_map, src) {
        (Some(value), _) => Some(value),
        (None, Some(src)) => read_pin_map_file(&raw.id, &src, base_dir, diagnostics),
        (None, None) => None,
    };
    let pin_map = pin_value.and_then(|value| match parse_pin_map(value) {
        Ok(map) => Some(map),
        Err(err) => {
            diagnostics.push(Diagnostic::raise(
                DiagnosticKind::MalformedPinMap,
                raw.id.as_str(),
                format!("failed to generate pin wires: {err}"),
            ));
            None
        }
    });

    Ok(Component {
        name: raw.name.unwrap_or_else(|| raw.id.clone()),
        id: raw.id,
        x: raw.x,
        y: raw.y,
        width,
        height,
        rotation: raw.rotation,
        pin_map,
    })
}

fn read_pin_map_file(
    component_id: &str,
    src: &str,
    base_dir: Option<&Path>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Value> {
    let Some(base_dir) = base_dir else {
        diagnostics.push(Diagnostic::raise(
            DiagnosticKind::MissingPinMapFile,
            component_id,
            format!("pin map {src:?} referenced but no base directory to resolve it"),
        ));
        return None;
    };
    let path = base_dir.join(src.trim_start_matches('/'));
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) => {
            diagnostics.push(Diagnostic::raise(
                DiagnosticKind::MissingPinMapFile,
                component_id,
                format!("failed to read pin map {}: {err}", path.display()),
            ));
            return None;
        }
    };
    match parse_json_or_json5(&contents) {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.push(Diagnostic::raise(
                DiagnosticKind::MalformedPinMap,
                component_id,
                format!("failed to generate pin wires: {}", PinMapError::Syntax(err)),
            ));
            None
        }
    }
}

fn build_connection(name: String, entry: Value) -> Result<Connection, LoadError> {
    let Value::Object(devices) = entry else {
        return Err(LoadError::InvalidConnection(name));
    };
    let mut endpoints = Vec::with_capacity(devices.len());
    for (device_id, pin) in devices {
        let pin_id = match pin {
            Value::String(pin) => pin,
            Value::Number(number) => number.to_string(),
            _ => return Err(LoadError::InvalidConnection(name)),
        };
        endpoints.push(Endpoint { device_id, pin_id });
    }
    Ok(Connection { name, endpoints })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = r#"{
        "components": [
            {
                "id": "uno",
                "name": "Arduino Uno",
                "x": 0, "y": 0,
                "image": { "src": "/img/uno.png", "width": 100, "height": 40 },
                "pinMap": { "digital-pins": {
                    "id": ["D13", "GND"],
                    "reloc": [
                        { "id": "GND", "points": [20, 10] },
                        { "id": "D13", "points": [10, 10] }
                    ]
                } }
            },
            {
                "id": "led",
                "x": 200, "y": 0,
                "width": 100, "height": 40,
                "pinMap": { "digital-pins": {
                    "id": ["anode"],
                    "reloc": [{ "id": "anode", "points": [10, 10] }]
                } }
            }
        ],
        "wire": {
            "zeta": { "uno": "D13", "led": "anode" },
            "alpha": { "uno": "GND", "led": "anode" }
        }
    }"#;

    #[test]
    fn parses_components_pins_and_wire_table() {
        let loaded = parse_circuit(DEMO, None).unwrap();
        let circuit = &loaded.circuit;
        assert!(loaded.diagnostics.is_empty());
        assert_eq!(circuit.components.len(), 2);
        let uno = circuit.component("uno").unwrap();
        assert_eq!(uno.name, "Arduino Uno");
        assert_eq!((uno.width, uno.height), (Some(100.0), Some(40.0)));
        let pins = uno.pin_map.as_ref().unwrap();
        assert_eq!(pins.order, vec!["D13", "GND"]);
        assert_eq!(pins.offset("GND"), Some((20.0, 10.0)));
        // Falls back to top-level size and to the id for the name.
        let led = circuit.component("led").unwrap();
        assert_eq!(led.name, "led");
        assert_eq!(led.width, Some(100.0));
    }

    #[test]
    fn wire_table_keeps_file_order() {
        let loaded = parse_circuit(DEMO, None).unwrap();
        let names: Vec<&str> = loaded
            .circuit
            .connections
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(loaded.circuit.connections[0].endpoints[0].device_id, "uno");
        assert_eq!(loaded.circuit.connections[0].endpoints[1].pin_id, "anode");
    }

    #[test]
    fn accepts_json5_input() {
        let text = r#"{
            // hand edited
            components: [{ id: 'a', x: 1, y: 2, },],
            wire: { sig: { a: 'D13' } },
        }"#;
        let loaded = parse_circuit(text, None).unwrap();
        assert_eq!(loaded.circuit.components[0].x, 1.0);
        assert_eq!(loaded.circuit.connections[0].endpoints[0].pin_id, "D13");
    }

    #[test]
    fn numeric_pin_ids_become_strings() {
        let text = r#"{ "components": [{ "id": "a" }], "wire": { "sig": { "a": 13 } } }"#;
        let loaded = parse_circuit(text, None).unwrap();
        assert_eq!(loaded.circuit.connections[0].endpoints[0].pin_id, "13");
    }

    #[test]
    fn malformed_pin_map_is_reported_not_fatal() {
        let text = r#"{
            "components": [
                { "id": "a", "x": 0, "y": 0,
                  "pinMap": { "digital-pins": { "id": ["P"], "reloc": [{ "id": "P", "points": [3] }] } } },
                { "id": "b", "x": 0, "y": 0, "pinMap": { "pins": [] } }
            ]
        }"#;
        let loaded = parse_circuit(text, None).unwrap();
        assert_eq!(loaded.circuit.components.len(), 2);
        assert!(loaded.circuit.components.iter().all(|c| c.pin_map.is_none()));
        assert_eq!(loaded.diagnostics.len(), 2);
        assert!(
            loaded
                .diagnostics
                .iter()
                .all(|d| d.kind == DiagnosticKind::MalformedPinMap)
        );
    }

    #[test]
    fn external_pin_map_without_base_dir_is_reported() {
        let text = r#"{ "components": [{ "id": "a", "pin-map": { "src": "/maps/a.json" } }] }"#;
        let loaded = parse_circuit(text, None).unwrap();
        assert!(loaded.circuit.components[0].pin_map.is_none());
        assert_eq!(loaded.diagnostics[0].kind, DiagnosticKind::MissingPinMapFile);
    }

    #[test]
    fn rejects_structural_errors() {
        assert!(matches!(parse_circuit("{", None), Err(LoadError::Syntax(_))));
        assert!(matches!(parse_circuit(r#"{ "wire": {} }"#, None), Err(LoadError::Shape(_))));
        assert!(matches!(
            parse_circuit(r#"{ "components": [{ "id": "a" }, { "id": "a" }] }"#, None),
            Err(LoadError::DuplicateComponent(id)) if id == "a"
        ));
        assert!(matches!(
            parse_circuit(r#"{ "components": [], "wire": { "w": ["a"] } }"#, None),
            Err(LoadError::InvalidConnection(name)) if name == "w"
        ));
    }

    #[test]
    fn rejects_coordinates_outside_the_canvas() {
        let overflow = r#"{ "components": [{ "id": "far", "x": 1e39, "y": 0 }] }"#;
        assert!(matches!(
            parse_circuit(overflow, None),
            Err(LoadError::InvalidCoordinate { component, field: "x" }) if component == "far"
        ));
        let huge = r#"{ "components": [{ "id": "wide", "x": 0, "y": 0, "width": 5e6, "height": 10 }] }"#;
        assert!(matches!(
            parse_circuit(huge, None),
            Err(LoadError::InvalidCoordinate { field: "width", .. })
        ));
    }

    #[test]
    fn out_of_range_pin_offset_is_a_malformed_pin_map() {
        let text = r#"{
            "components": [
                { "id": "a", "x": 0, "y": 0,
                  "pinMap": { "digital-pins": { "id": ["P"], "reloc": [{ "id": "P", "points": [1e12, 0] }] } } }
            ]
        }"#;
        let loaded = parse_circuit(text, None).unwrap();
        assert!(loaded.circuit.components[0].pin_map.is_none());
        assert_eq!(loaded.diagnostics[0].kind, DiagnosticKind::MalformedPinMap);
    }
}
