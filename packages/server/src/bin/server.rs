//! CrowdGuard presence and event-relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin crowdguard-server
//! cargo run --bin crowdguard-server -- --host 0.0.0.0 --port 4000
//! PORT=4000 CORS_ORIGIN=https://map.example.org cargo run --bin crowdguard-server
//! ```

use std::{sync::Arc, time::Duration};

use axum::http::HeaderValue;
use clap::Parser;
use crowdguard_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryIncidentGateway, InMemoryPresenceStore},
    },
    ui::{AppState, Server},
    usecase::{
        ConnectConnectionUseCase, DisconnectConnectionUseCase, GetIncidentsUseCase,
        GetPresenceUseCase, PostCommentUseCase, ReportIncidentUseCase, UpdateLocationUseCase,
        UpvoteIncidentUseCase,
    },
};
use crowdguard_shared::{logger::setup_logger, time::SystemClock};
use tower_http::cors::AllowOrigin;

#[derive(Parser, Debug)]
#[command(name = "crowdguard-server")]
#[command(about = "Presence and event-relay server for the CrowdGuard safety map", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "4000")]
    port: u16,

    /// Origin allowed by CORS ("*" allows any origin)
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:3000")]
    cors_origin: String,

    /// Seconds between WebSocket pings
    #[arg(
        long,
        env = "HEARTBEAT_INTERVAL_SECS",
        default_value = "15",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    heartbeat_interval_secs: u64,
}

fn allowed_origin(origin: &str) -> Result<AllowOrigin, axum::http::header::InvalidHeaderValue> {
    if origin == "*" {
        return Ok(AllowOrigin::any());
    }
    Ok(AllowOrigin::exact(HeaderValue::from_str(origin)?))
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("crowdguard_server", env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let allowed_origin = match allowed_origin(&args.cors_origin) {
        Ok(origin) => origin,
        Err(e) => {
            tracing::error!("Invalid CORS origin '{}': {}", args.cors_origin, e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Stores
    // 2. MessagePusher
    // 3. UseCases
    // 4. AppState
    // 5. Server

    // 1. Create stores (in-memory)
    let presence_store = Arc::new(InMemoryPresenceStore::new());
    let incident_gateway = Arc::new(InMemoryIncidentGateway::new());
    let clock = Arc::new(SystemClock);

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3, 4. Create UseCases and AppState
    let app_state = AppState {
        connect_connection_usecase: Arc::new(ConnectConnectionUseCase::new(
            presence_store.clone(),
            message_pusher.clone(),
        )),
        update_location_usecase: Arc::new(UpdateLocationUseCase::new(
            presence_store.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        disconnect_connection_usecase: Arc::new(DisconnectConnectionUseCase::new(
            presence_store.clone(),
            message_pusher.clone(),
        )),
        report_incident_usecase: Arc::new(ReportIncidentUseCase::new(
            incident_gateway.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        upvote_incident_usecase: Arc::new(UpvoteIncidentUseCase::new(
            incident_gateway.clone(),
            message_pusher.clone(),
        )),
        post_comment_usecase: Arc::new(PostCommentUseCase::new(
            incident_gateway.clone(),
            message_pusher.clone(),
            clock,
        )),
        get_incidents_usecase: Arc::new(GetIncidentsUseCase::new(incident_gateway)),
        get_presence_usecase: Arc::new(GetPresenceUseCase::new(presence_store)),
        heartbeat_interval: Duration::from_secs(args.heartbeat_interval_secs),
    };

    // 5. Create and run the server
    let server = Server::new(app_state, allowed_origin);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
