use circuit_wire_router::config::Config;
use circuit_wire_router::loader::parse_circuit;
use circuit_wire_router::routing::{deconflict, route_circuit};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// A `cols x rows` grid of boards, each with four pins, wired in a chain
/// plus `extra_wires` longer hops and one shared ground rail.
fn board_grid_source(cols: usize, rows: usize, extra_wires: usize) -> String {
    let count = cols * rows;
    let mut components = Vec::with_capacity(count);
    for i in 0..count {
        let x = (i % cols) as f32 * 160.0;
        let y = (i / cols) as f32 * 120.0;
        components.push(format!(
            r#"{{"id":"U{i}","x":{x},"y":{y},"width":80,"height":50,"pinMap":{{"digital-pins":{{"id":["D1","D2","5V","GND"],"reloc":[{{"id":"D1","points":[10,0]}},{{"id":"D2","points":[70,0]}},{{"id":"5V","points":[10,50]}},{{"id":"GND","points":[70,50]}}]}}}}}}"#
        ));
    }

    let mut wires = Vec::new();
    for i in 0..count.saturating_sub(1) {
        wires.push(format!(r#""chain{i}":{{"U{i}":"D2","U{}":"D1"}}"#, i + 1));
    }
    let mut added = 0usize;
    'outer: for i in 0..count {
        for j in (i + 2)..count {
            if added >= extra_wires {
                break 'outer;
            }
            wires.push(format!(r#""hop{added}":{{"U{i}":"D1","U{j}":"D2"}}"#));
            added += 1;
        }
    }
    let rail: Vec<String> = (0..count).map(|i| format!(r#""U{i}":"GND""#)).collect();
    wires.push(format!(r#""GND":{{{}}}"#, rail.join(",")));

    format!(
        r#"{{"components":[{}],"wire":{{{}}}}}"#,
        components.join(","),
        wires.join(",")
    )
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (cols, rows) in [(4usize, 3usize), (8, 6), (12, 10)] {
        let input = board_grid_source(cols, rows, cols * rows);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("grid_{cols}x{rows}")),
            &input,
            |b, input| {
                b.iter(|| {
                    let loaded = parse_circuit(black_box(input), None).expect("parse failed");
                    black_box(loaded.circuit.connections.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_route(c: &mut Criterion) {
    let mut group = c.benchmark_group("route");
    let config = Config::default();
    for (cols, rows, extra_wires) in [(4usize, 3usize, 8usize), (8, 6, 40), (12, 10, 120)] {
        let input = board_grid_source(cols, rows, extra_wires);
        let loaded = parse_circuit(&input, None).expect("parse failed");
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("grid_{cols}x{rows}_{extra_wires}")),
            &loaded.circuit,
            |b, circuit| {
                b.iter(|| {
                    let routed = route_circuit(black_box(circuit), &config);
                    black_box(routed.wires.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_deconflict_passes(c: &mut Criterion) {
    let mut group = c.benchmark_group("deconflict");
    let mut config = Config::default();
    config.routing.passes = 0;
    let input = board_grid_source(8, 6, 80);
    let loaded = parse_circuit(&input, None).expect("parse failed");
    let raw = route_circuit(&loaded.circuit, &config);
    for passes in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(passes), &raw, |b, raw| {
            b.iter(|| {
                let wires = deconflict(black_box(&raw.wires), &raw.obstacles, passes);
                black_box(wires.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_route, bench_deconflict_passes);
criterion_main!(benches);
