use crate::config::{Config, load_config};
use crate::loader::{LoadedCircuit, load_circuit, parse_circuit};
use crate::route_dump::{dump_to_json, wires_to_json, write_route_dump};
use crate::routing::RoutingSession;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "wroute", version, about = "Auto-route wires for a circuit canvas configuration")]
pub struct Args {
    /// Circuit config file (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "wires")]
    pub output_format: OutputFormat,

    /// Router config JSON file (palette and routing constants)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Overlap resolution passes
    #[arg(long = "passes")]
    pub passes: Option<usize>,

    /// Skip the per-pin marker wires
    #[arg(long = "no-pin-markers")]
    pub no_pin_markers: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Flattened `{ id, points, color }` list for the canvas
    Wires,
    /// Detailed dump with obstacles and diagnostics
    Dump,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = apply_overrides(load_config(args.config.as_deref())?, &args);

    let loaded = read_circuit(args.input.as_deref())?;
    let mut session = RoutingSession::new(&config);
    let routed = session.route_loaded(loaded);

    let unrouted = routed.wires.iter().filter(|w| !w.routed || w.points.is_empty()).count();
    if unrouted > 0 {
        log::info!("{unrouted} of {} wires could not be fully routed", routed.wires.len());
    }

    match (args.output_format, args.output.as_deref()) {
        (OutputFormat::Dump, Some(path)) => write_route_dump(path, &routed),
        (OutputFormat::Dump, None) => write_output(&dump_to_json(&routed)?, None),
        (OutputFormat::Wires, output) => write_output(&wires_to_json(&routed)?, output),
    }
}

fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(passes) = args.passes {
        config.routing.passes = passes;
    }
    if args.no_pin_markers {
        config.routing.pin_markers = false;
    }
    config
}

fn read_circuit(path: Option<&Path>) -> Result<LoadedCircuit> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(load_circuit(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    // Relative pin-map sources resolve against the working directory.
    Ok(parse_circuit(&buf, Some(Path::new(".")))?)
}

fn write_output(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_flags() {
        let args = Args::parse_from(["wroute", "-i", "demo.json", "-e", "dump", "--passes", "3"]);
        assert_eq!(args.input.as_deref(), Some(Path::new("demo.json")));
        assert_eq!(args.output_format, OutputFormat::Dump);
        assert_eq!(args.passes, Some(3));
    }

    #[test]
    fn overrides_replace_config_values() {
        let args = Args::parse_from(["wroute", "--passes", "5", "--no-pin-markers"]);
        let config = apply_overrides(Config::default(), &args);
        assert_eq!(config.routing.passes, 5);
        assert!(!config.routing.pin_markers);

        let args = Args::parse_from(["wroute"]);
        let config = apply_overrides(Config::default(), &args);
        assert_eq!(config.routing.passes, 2);
        assert!(config.routing.pin_markers);
        assert_eq!(args.output_format, OutputFormat::Wires);
    }
}
