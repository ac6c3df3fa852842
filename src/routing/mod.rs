//! Wire routing for placed circuit components.
//!
//! ```text
//! Circuit
//!   → obstacles        (component bounding boxes)
//!   → pin resolution   (connection endpoints to canvas points)
//!   → lead-out + path  (L/Z heuristic per two-terminal segment)
//!   → deconflict       (separate overlapping segments)
//!   → colors           (5V / GND / round-robin signal palette)
//!   → RoutedCircuit
//! ```

mod color;
mod geometry;
mod overlap;
mod path;
mod pins;
pub(crate) mod types;

pub use color::{ColorCycle, GROUND_ROLE, POWER_ROLE};
pub use geometry::{obstacle_bounds, segment_hits_obstacles};
pub use overlap::{OVERLAP_SHIFT, deconflict, deconflict_with_shift, overlap_count};
pub use path::find_path;
pub use pins::{EXIT_LEAD, resolve_pin, short_exit_direction};
pub use types::*;

use crate::config::{Config, RoutingConfig};
use crate::ir::{Circuit, Connection};
use crate::loader::LoadedCircuit;
use crate::theme::Theme;

use color::is_supply_role;
use geometry::compress_path;
use pins::lead_out;

/// State for one routing run. The signal color cursor lives here and is
/// never reset while the session is alive.
#[derive(Debug, Clone)]
pub struct RoutingSession {
    routing: RoutingConfig,
    theme: Theme,
    colors: ColorCycle,
}

impl RoutingSession {
    pub fn new(config: &Config) -> Self {
        Self {
            routing: config.routing.clone(),
            theme: config.theme.clone(),
            colors: ColorCycle::new(&config.theme),
        }
    }

    pub fn colors(&mut self) -> &mut ColorCycle {
        &mut self.colors
    }

    /// Routes every connection of `circuit`.
    ///
    /// Never fails: unknown devices or pins, missing routes and unmeasured
    /// components are reported as diagnostics and the batch carries on.
    pub fn route(&mut self, circuit: &Circuit) -> RoutedCircuit {
        let mut diagnostics = Vec::new();
        if !circuit.is_fully_resolved() {
            for component in circuit.components.iter().filter(|c| !c.size_resolved()) {
                diagnostics.push(Diagnostic::raise(
                    DiagnosticKind::UnresolvedSize,
                    component.id.as_str(),
                    "image size not resolved, routing around a zero-size box",
                ));
            }
        }
        let obstacles = obstacle_bounds(&circuit.components);

        let wires: Vec<Wire> = circuit
            .connections
            .iter()
            .map(|connection| self.route_connection(circuit, connection, &obstacles, &mut diagnostics))
            .collect();

        let mut wires = deconflict_with_shift(
            &wires,
            &obstacles,
            self.routing.passes,
            self.routing.overlap_shift,
        );
        for wire in &mut wires {
            wire.color = self.colors.color_for(&wire.role).to_string();
        }

        let pin_markers = if self.routing.pin_markers {
            self.pin_markers(circuit)
        } else {
            Vec::new()
        };

        RoutedCircuit {
            wires,
            pin_markers,
            obstacles,
            diagnostics,
        }
    }

    /// Routes a freshly loaded circuit. Load-time diagnostics come first in
    /// the result, followed by the ones raised while routing.
    pub fn route_loaded(&mut self, loaded: LoadedCircuit) -> RoutedCircuit {
        let mut routed = self.route(&loaded.circuit);
        let mut diagnostics = loaded.diagnostics;
        diagnostics.append(&mut routed.diagnostics);
        routed.diagnostics = diagnostics;
        routed
    }

    fn route_connection(
        &self,
        circuit: &Circuit,
        connection: &Connection,
        obstacles: &[Obstacle],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Wire {
        let id = format!("wire-{}", connection.name);
        let role = connection_role(connection);

        let mut pins = Vec::with_capacity(connection.endpoints.len());
        for endpoint in &connection.endpoints {
            let Some(component) = circuit.component(&endpoint.device_id) else {
                diagnostics.push(Diagnostic::raise(
                    DiagnosticKind::UnknownDevice,
                    id.as_str(),
                    format!("device {:?} is not on the canvas", endpoint.device_id),
                ));
                continue;
            };
            let Some(point) = resolve_pin(&endpoint.device_id, &endpoint.pin_id, &circuit.components)
            else {
                diagnostics.push(Diagnostic::raise(
                    DiagnosticKind::UnknownPin,
                    id.as_str(),
                    format!("pin {:?} not found on {:?}", endpoint.pin_id, endpoint.device_id),
                ));
                continue;
            };
            pins.push((point, component));
        }

        if pins.len() < 2 {
            return Wire::new(id, role, Vec::new());
        }

        let mut routed = true;
        let mut points: Vec<(f32, f32)> = Vec::new();
        for pair in pins.windows(2) {
            let (start, from) = pair[0];
            let (end, to) = pair[1];
            let lead_a = lead_out(start, from, self.routing.exit_lead, self.routing.max_lead_steps);
            let lead_b = lead_out(end, to, self.routing.exit_lead, self.routing.max_lead_steps);
            let mut path = find_path(lead_a, lead_b, obstacles);
            if path.is_empty() {
                diagnostics.push(Diagnostic::raise(
                    DiagnosticKind::NoRoute,
                    id.as_str(),
                    format!("no clear path between {} and {}", from.id, to.id),
                ));
                routed = false;
                path = vec![lead_a, lead_b];
            }
            if points.is_empty() {
                points.push(start);
            }
            points.extend(path);
            points.push(end);
        }

        log::debug!("{id}: {} points, routed={routed}", points.len());
        let mut wire = Wire::new(id, role, compress_path(&points));
        wire.routed = routed;
        wire
    }

    fn pin_markers(&self, circuit: &Circuit) -> Vec<PinMarker> {
        let mut markers = Vec::new();
        for component in &circuit.components {
            let Some(pin_map) = &component.pin_map else {
                continue;
            };
            for (pin_id, (dx, dy)) in pin_map.pins() {
                markers.push(PinMarker {
                    id: format!("{}-{}", component.id, pin_id),
                    point: (component.x + dx, component.y + dy),
                    color: self.theme.pin_marker_color.clone(),
                });
            }
        }
        markers
    }
}

/// Routes a circuit with a fresh session.
pub fn route_circuit(circuit: &Circuit, config: &Config) -> RoutedCircuit {
    RoutingSession::new(config).route(circuit)
}

/// Role label of a connection: its name when that is a supply role, else the
/// first supply pin it touches, else its name.
pub fn connection_role(connection: &Connection) -> String {
    if is_supply_role(&connection.name) {
        return connection.name.clone();
    }
    connection
        .endpoints
        .iter()
        .find(|endpoint| is_supply_role(&endpoint.pin_id))
        .map(|endpoint| endpoint.pin_id.clone())
        .unwrap_or_else(|| connection.name.clone())
}
