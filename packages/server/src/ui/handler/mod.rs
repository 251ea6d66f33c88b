//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{
    create_incident, debug_presence, get_incident, health_check, list_comments, list_incidents,
    post_comment, upvote_incident,
};
pub use websocket::websocket_handler;
