//! CrowdGuard CLI client with reconnection support.
//!
//! Connects to the CrowdGuard WebSocket endpoint, prints every relayed event
//! and sends `loc <lat> <lon>` lines as location updates.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin crowdguard-client
//! cargo run --bin crowdguard-client -- --url ws://127.0.0.1:4000/ws
//! ```

use clap::Parser;

use crowdguard_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "crowdguard-client")]
#[command(about = "CLI client for the CrowdGuard presence and event relay", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(
        short = 'u',
        long,
        env = "CROWDGUARD_URL",
        default_value = "ws://127.0.0.1:4000/ws"
    )]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("crowdguard_client", env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = crowdguard_client::run_client(args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
