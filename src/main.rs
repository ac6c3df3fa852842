fn main() {
    env_logger::init();
    if let Err(err) = circuit_wire_router::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
