//! Error types for the CrowdGuard client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection could not be opened or was lost
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Input line that is not a known command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Gave up after the maximum number of reconnect attempts
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}
