//! WebSocket client session management.

use chrono::Utc;
use crowdguard_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    command::{Command, parse_command},
    error::ClientError,
    formatter::EventFormatter,
    ui::redisplay_prompt,
};

/// Render one inbound text frame
fn render_frame(text: &str) -> String {
    match serde_json::from_str::<ServerEvent>(text) {
        Ok(event) => EventFormatter::format_event(&event),
        Err(_) => EventFormatter::format_raw_message(text),
    }
}

/// Run one WebSocket session until the user quits or the connection drops.
///
/// # Returns
///
/// * `Ok(())` - The input closed (Ctrl+C / Ctrl+D); do not reconnect
/// * `Err(ClientError::ConnectionError)` - The connection failed or was lost
pub async fn run_client_session(
    url: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to CrowdGuard server!");
    println!("\n{}Press Ctrl+C to exit.\n", EventFormatter::format_help());

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            message = read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        print!("{}", render_frame(text.as_str()));
                        redisplay_prompt();
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Server closed the connection");
                        return Err(ClientError::ConnectionError(
                            "Connection closed by server".to_string(),
                        ));
                    }
                    Some(Ok(_)) => {
                        // Ping への Pong は tungstenite が自動で返す
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                }
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    let _ = write.close().await;
                    return Ok(());
                };

                match parse_command(&line) {
                    Ok(Command::Location(payload)) => {
                        let event = ClientEvent::UpdateLocation(payload);
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::error!("Failed to serialize location: {}", e);
                                continue;
                            }
                        };
                        if let Err(e) = write.send(Message::Text(json.into())).await {
                            tracing::warn!("Failed to send location: {}", e);
                            return Err(ClientError::ConnectionError(e.to_string()));
                        }
                        print!(
                            "{}",
                            EventFormatter::format_sent_confirmation(
                                payload.latitude,
                                payload.longitude,
                                Utc::now()
                            )
                        );
                    }
                    Ok(Command::Help) => print!("{}", EventFormatter::format_help()),
                    Err(e) => println!("{}", e),
                }
                redisplay_prompt();
            }
        }
    }
}
