//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handler::{
        create_incident, debug_presence, get_incident, health_check, list_comments,
        list_incidents, post_comment, upvote_incident, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Presence and event-relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, AllowOrigin::exact(origin));
/// server.run("127.0.0.1".to_string(), 4000).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
    allowed_origin: AllowOrigin,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `app_state` - UseCases and connection settings shared by all handlers
    /// * `allowed_origin` - Origin allowed by CORS (the web frontend)
    pub fn new(app_state: AppState, allowed_origin: AllowOrigin) -> Self {
        Self {
            app_state: Arc::new(app_state),
            allowed_origin,
        }
    }

    /// Build the router with every endpoint, CORS and request tracing
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(self.allowed_origin.clone())
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/incidents", get(list_incidents).post(create_incident))
            .route("/api/incidents/{id}", get(get_incident))
            .route("/api/incidents/{id}/upvote", post(upvote_incident))
            .route(
                "/api/incidents/{id}/comments",
                get(list_comments).post(post_comment),
            )
            .route("/debug/presence", get(debug_presence))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Run the server on `host:port`
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> std::io::Result<()> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let app = self.router();

        tracing::info!("CrowdGuard server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
