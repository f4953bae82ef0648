fn main() {
    if let Err(e) = delivery_metrics::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
