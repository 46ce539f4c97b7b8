//! loc-picker CLI entry point
//!
//! Interactive location picker - CLI + web app

use loc_picker::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
