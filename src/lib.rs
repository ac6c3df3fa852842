#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod loader;
pub mod route_dump;
pub mod routing;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RoutingConfig};
pub use ir::{Circuit, Component, Connection, Endpoint, PinMap};
pub use loader::{LoadError, LoadedCircuit, load_circuit, parse_circuit};
pub use route_dump::{RenderWire, render_wires};
pub use routing::{RoutedCircuit, RoutingSession, route_circuit};
pub use theme::Theme;
