use crate::routing::{Diagnostic, Obstacle, RoutedCircuit, overlap_count};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// A polyline in the shape the canvas layer draws: flattened `x, y` pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderWire {
    pub id: String,
    pub points: Vec<f32>,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct RouteDump {
    pub wires: Vec<WireDump>,
    pub pin_markers: Vec<RenderWire>,
    pub obstacles: Vec<Obstacle>,
    pub diagnostics: Vec<Diagnostic>,
    pub overlap_count: usize,
}

#[derive(Debug, Serialize)]
pub struct WireDump {
    pub id: String,
    pub role: String,
    pub color: String,
    pub routed: bool,
    pub points: Vec<[f32; 2]>,
}

/// Routed wires followed by pin markers, ready for the canvas.
pub fn render_wires(routed: &RoutedCircuit) -> Vec<RenderWire> {
    let wires = routed.wires.iter().map(|wire| RenderWire {
        id: wire.id.clone(),
        points: wire.points.iter().flat_map(|&(x, y)| [x, y]).collect(),
        color: wire.color.clone(),
    });
    wires.chain(marker_wires(routed)).collect()
}

fn marker_wires(routed: &RoutedCircuit) -> impl Iterator<Item = RenderWire> + '_ {
    routed.pin_markers.iter().map(|marker| {
        let (x, y) = marker.point;
        RenderWire {
            id: marker.id.clone(),
            points: vec![x, y, x, y],
            color: marker.color.clone(),
        }
    })
}

impl RouteDump {
    pub fn from_routed(routed: &RoutedCircuit) -> Self {
        let wires = routed
            .wires
            .iter()
            .map(|wire| WireDump {
                id: wire.id.clone(),
                role: wire.role.clone(),
                color: wire.color.clone(),
                routed: wire.routed,
                points: wire.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        RouteDump {
            wires,
            pin_markers: marker_wires(routed).collect(),
            obstacles: routed.obstacles.clone(),
            diagnostics: routed.diagnostics.clone(),
            overlap_count: overlap_count(&routed.wires),
        }
    }
}

pub fn wires_to_json(routed: &RoutedCircuit) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&render_wires(routed))
}

pub fn dump_to_json(routed: &RoutedCircuit) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RouteDump::from_routed(routed))
}

pub fn write_route_dump(path: &Path, routed: &RoutedCircuit) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &RouteDump::from_routed(routed))?;
    Ok(())
}
