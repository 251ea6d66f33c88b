//! WebSocket connection handlers.
//!
//! 1 接続につき reader タスクと writer タスクを 1 つずつ起動する。
//! どちらかが終了した時点で接続は CLOSED になり、切断処理がちょうど 1 回走る。

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, Coordinates, ValueObjectError},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

/// Consecutive unanswered pings after which the connection is dropped
const MAX_MISSED_PONGS: u8 = 2;

/// Reason an inbound frame was dropped
#[derive(Debug, Error)]
enum MalformedFrame {
    #[error("invalid frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid coordinates: {0}")]
    Coordinates(#[from] ValueObjectError),
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Parse an inbound text frame into the reported position.
///
/// Unknown events, missing or non-numeric coordinates and out-of-range
/// coordinates are all rejected.
fn parse_location_frame(text: &str) -> Result<Coordinates, MalformedFrame> {
    let ClientEvent::UpdateLocation(payload) = serde_json::from_str::<ClientEvent>(text)?;
    Ok(Coordinates::try_from(payload)?)
}

/// Spawns a task that drains the connection's queue into the WebSocket sink.
///
/// The same task pings the client every `heartbeat_interval`. After
/// [`MAX_MISSED_PONGS`] unanswered pings it stops, which closes the connection.
///
/// # Arguments
///
/// * `rx` - Queue of serialized frames for this connection
/// * `sender` - WebSocket sink to send frames to this client
/// * `heartbeat_interval` - Ping period
/// * `pong_received` - Set by the reader whenever a pong arrives
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    connection_id: ConnectionId,
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    heartbeat_interval: Duration,
    pong_received: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(heartbeat_interval);
        heartbeat.tick().await;
        let mut missed_pongs: u8 = 0;

        loop {
            tokio::select! {
                frame = rx.recv() => {
                    // None: 登録解除済み（キューが閉じた）
                    let Some(frame) = frame else {
                        break;
                    };
                    if sender.send(Message::Text(frame.into())).await.is_err() {
                        tracing::debug!("Outbound send to '{}' failed", connection_id);
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_received.swap(false, Ordering::Acquire) {
                        missed_pongs = 0;
                    } else {
                        missed_pongs += 1;
                        if missed_pongs >= MAX_MISSED_PONGS {
                            tracing::warn!(
                                "Heartbeat timeout for '{}' (missed {} pongs), dropping connection",
                                connection_id,
                                missed_pongs
                            );
                            break;
                        }
                    }
                    if sender.send(Message::Ping(Default::default())).await.is_err() {
                        break;
                    }
                }
            }
        }

        let _ = sender.close().await;
    })
}

/// Reads frames from the client until it closes or the socket fails.
async fn receiver_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    pong_received: Arc<AtomicBool>,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => handle_text_frame(&state, &connection_id, &text).await,
            Message::Pong(_) => pong_received.store(true, Ordering::Release),
            Message::Ping(_) => {
                // Pong は axum が自動で返す
                tracing::trace!("Received ping from '{}'", connection_id);
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
            Message::Binary(_) => {
                tracing::warn!("Dropped binary frame from '{}'", connection_id);
            }
        }
    }
}

async fn handle_text_frame(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let coordinates = match parse_location_frame(text) {
        Ok(coordinates) => coordinates,
        Err(e) => {
            tracing::warn!("Dropped malformed frame from '{}': {}", connection_id, e);
            return;
        }
    };

    match state
        .update_location_usecase
        .execute(connection_id.clone(), coordinates)
        .await
    {
        Ok(record) => tracing::debug!(
            "Location of '{}' updated to ({}, {})",
            connection_id,
            record.coordinates.latitude(),
            record.coordinates.longitude()
        ),
        Err(e) => tracing::warn!("Failed to update location: {}", e),
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (sender, receiver) = socket.split();

    // Create a channel for this connection to receive frames
    let (tx, rx) = mpsc::unbounded_channel();

    // CONNECTING → OPEN（送信キューの登録とスナップショット送信）
    match state
        .connect_connection_usecase
        .execute(connection_id.clone(), tx)
        .await
    {
        Ok(peer_count) => tracing::info!(
            "Connection '{}' opened ({} peers with a known location)",
            connection_id,
            peer_count
        ),
        Err(e) => tracing::warn!("Connection '{}' opened without snapshot: {}", connection_id, e),
    }

    let pong_received = Arc::new(AtomicBool::new(true));
    let mut send_task = pusher_loop(
        connection_id.clone(),
        rx,
        sender,
        state.heartbeat_interval,
        pong_received.clone(),
    );
    let mut recv_task = tokio::spawn(receiver_loop(
        receiver,
        state.clone(),
        connection_id.clone(),
        pong_received,
    ));

    // If any one of the tasks completes, stop the other
    let writer_finished_first = tokio::select! {
        _ = &mut recv_task => false,
        _ = &mut send_task => true,
    };
    if writer_finished_first {
        // 切断処理の後に位置更新が Presence に書き込まれないよう、reader の停止を待つ
        recv_task.abort();
        let _ = recv_task.await;
    } else {
        send_task.abort();
    }

    // OPEN → CLOSED
    match state
        .disconnect_connection_usecase
        .execute(connection_id.clone())
        .await
    {
        Ok(()) => tracing::info!(
            "Connection '{}' closed ({} peers remaining)",
            connection_id,
            state
                .disconnect_connection_usecase
                .count_remaining_presence()
                .await
        ),
        Err(e) => tracing::debug!("Skipped duplicate disconnect: {}", e),
    }
}
