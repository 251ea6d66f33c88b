//! Parsing of the lines typed at the prompt.

use crowdguard_server::{domain::Coordinates, infrastructure::dto::websocket::LocationPayload};

use crate::error::ClientError;

/// A command entered by the user
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `loc <lat> <lon>`: report the current position
    Location(LocationPayload),
    /// `help`
    Help,
}

/// Parse one input line.
///
/// Coordinates are range-checked here so the server never sees a frame it
/// would drop.
pub fn parse_command(line: &str) -> Result<Command, ClientError> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("loc") => {
            let (Some(latitude), Some(longitude), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(ClientError::InvalidCommand(
                    "usage: loc <latitude> <longitude>".to_string(),
                ));
            };
            let latitude = parse_degrees(latitude)?;
            let longitude = parse_degrees(longitude)?;
            let coordinates = Coordinates::new(latitude, longitude)
                .map_err(|e| ClientError::InvalidCommand(e.to_string()))?;
            Ok(Command::Location(LocationPayload {
                latitude: coordinates.latitude(),
                longitude: coordinates.longitude(),
            }))
        }
        Some("help") => Ok(Command::Help),
        Some(other) => Err(ClientError::InvalidCommand(format!(
            "unknown command '{}' (type 'help')",
            other
        ))),
        None => Err(ClientError::InvalidCommand("empty input".to_string())),
    }
}

fn parse_degrees(value: &str) -> Result<f64, ClientError> {
    value
        .parse::<f64>()
        .map_err(|_| ClientError::InvalidCommand(format!("'{}' is not a number", value)))
}
