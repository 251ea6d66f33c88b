//! CrowdGuard CLI client.
//!
//! Prints relayed presence, incident and comment events, and sends location
//! updates typed at the prompt.

mod command;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
