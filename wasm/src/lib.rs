use circuit_wire_router::route_dump::{dump_to_json, wires_to_json};
use circuit_wire_router::{Config, RoutedCircuit, RoutingSession, Theme, parse_circuit};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRouteOptions {
    theme: Option<String>,
    passes: Option<usize>,
    overlap_shift: Option<f32>,
    pin_markers: Option<bool>,
}

fn build_config(options: WireRouteOptions) -> Config {
    let mut config = Config::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::from_name) {
        config.theme = theme;
    }
    if let Some(passes) = options.passes {
        config.routing.passes = passes;
    }
    if let Some(shift) = options.overlap_shift
        && shift > 0.0
    {
        config.routing.overlap_shift = shift;
    }
    if let Some(pin_markers) = options.pin_markers {
        config.routing.pin_markers = pin_markers;
    }
    config
}

fn route_config(config_json: &str, options_json: Option<String>) -> Result<RoutedCircuit, String> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<WireRouteOptions>(&raw_options).map_err(|error| error.to_string())?
    } else {
        WireRouteOptions::default()
    };

    let loaded = parse_circuit(config_json, None).map_err(|error| error.to_string())?;
    let mut session = RoutingSession::new(&build_config(options));
    Ok(session.route_loaded(loaded))
}

/// Routes every wire of a circuit configuration and returns the canvas wire
/// list as JSON. Pin maps must be embedded; there is no filesystem here.
#[wasm_bindgen]
pub fn route_wires(config_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let routed = route_config(config_json, options_json).map_err(|error| JsValue::from_str(&error))?;
    wires_to_json(&routed).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Like [`route_wires`] but returns the full route dump, including the
/// load and routing diagnostics the console panel shows.
#[wasm_bindgen(js_name = routeDump)]
pub fn route_dump(config_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let routed = route_config(config_json, options_json).map_err(|error| JsValue::from_str(&error))?;
    dump_to_json(&routed).map_err(|error| JsValue::from_str(&error.to_string()))
}
