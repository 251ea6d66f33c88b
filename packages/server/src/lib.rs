//! CrowdGuard presence and event-relay server.
//!
//! Tracks the last-known location of every live WebSocket connection, relays
//! location updates to the other connections, and re-broadcasts incident and
//! comment writes made through the HTTP API.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
