fn main() {
    if let Err(err) = mindmap_engine::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
