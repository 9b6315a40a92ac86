fn main() {
    if let Err(e) = force10_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
