#[tokio::main]
async fn main() {
    if let Err(e) = storage_health::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
