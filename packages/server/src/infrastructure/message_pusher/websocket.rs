//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `RelayEvent` を JSON フレームに変換して送信（send_to, broadcast_all, broadcast_except）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! イベントはブロードキャストごとに 1 回だけシリアライズされます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, MessagePushError, MessagePusher, PresenceStore, PusherChannel, RelayEvent,
    },
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id.clone(), tx).await;
/// pusher.broadcast_except(&connection_id, &event).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(event: &RelayEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }

    /// `exclude` 以外の全クライアントに送る。送信失敗は許容してログのみ
    async fn fan_out(
        &self,
        exclude: Option<&ConnectionId>,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for (connection_id, sender) in clients.iter() {
            if exclude == Some(connection_id) {
                continue;
            }
            // 切断済みのクライアントへの送信失敗は無視する（at-most-once）
            if let Err(e) = sender.send(content.clone()) {
                tracing::warn!(
                    "Failed to push '{}' to connection '{}': {}",
                    event.name(),
                    connection_id,
                    e
                );
            } else {
                tracing::trace!("Pushed '{}' to connection '{}'", event.name(), connection_id);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, sender);
    }

    async fn register_with_snapshot(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
        presence_store: Arc<dyn PresenceStore>,
    ) -> Result<usize, MessagePushError> {
        // clients のロックを持ったままスナップショットを取り、キューに積む
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id.clone(), sender.clone());
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);

        let snapshot = presence_store.snapshot().await;
        let peer_count = snapshot.len();
        let event = RelayEvent::PresenceSnapshot(snapshot);
        let content = Self::encode(&event)?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection_id);

        Ok(peer_count)
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        let removed = clients.remove(connection_id).is_some();
        if removed {
            tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
        }
        removed
    }

    async fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        let clients = self.clients.lock().await;
        clients.contains_key(connection_id)
    }

    async fn send_to(
        &self,
        connection_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.as_str().to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection_id);
        Ok(())
    }

    async fn broadcast_all(&self, event: &RelayEvent) -> Result<(), MessagePushError> {
        self.fan_out(None, event).await
    }

    async fn broadcast_except(
        &self,
        sender_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        self.fan_out(Some(sender_id), event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - send_to: 特定の接続への送信（存在しない接続はエラー）
    // - broadcast_all: 全接続への送信
    // - broadcast_except: 送信者以外への送信（エコーしない）
    // - 切断済みの接続が混ざっていてもブロードキャストは成功すること
    // ========================================

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn location_event(from: &str) -> RelayEvent {
        RelayEvent::LocationUpdated {
            connection_id: id(from),
            coordinates: Coordinates::new(1.0, 1.0).unwrap(),
        }
    }

    async fn register(
        pusher: &WebSocketMessagePusher,
        name: &str,
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(id(name), tx).await;
        rx
    }

    #[tokio::test]
    async fn test_send_to_success() {
        // テスト項目: 特定の接続にイベントを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let mut alice = register(&pusher, "alice").await;
        let mut bob = register(&pusher, "bob").await;

        // when (操作):
        let result = pusher
            .send_to(&id("alice"), &RelayEvent::PresenceSnapshot(vec![]))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            alice.recv().await,
            Some(r#"{"event":"currentUsers","data":{}}"#.to_string())
        );
        assert!(bob.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_to_client_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher
            .send_to(&id("ghost"), &RelayEvent::PresenceSnapshot(vec![]))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("ghost".to_string()))
        );
    }

    #[tokio::test]
    async fn test_broadcast_except_skips_sender() {
        // テスト項目: broadcast_except は送信者以外の全接続に届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let mut alice = register(&pusher, "alice").await;
        let mut bob = register(&pusher, "bob").await;
        let mut charlie = register(&pusher, "charlie").await;

        // when (操作):
        let result = pusher
            .broadcast_except(&id("alice"), &location_event("alice"))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let expected =
            r#"{"event":"locationUpdate","data":{"id":"alice","latitude":1.0,"longitude":1.0}}"#;
        assert_eq!(bob.recv().await.as_deref(), Some(expected));
        assert_eq!(charlie.recv().await.as_deref(), Some(expected));
        assert!(alice.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_all_includes_everyone() {
        // テスト項目: broadcast_all は全接続に届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let mut alice = register(&pusher, "alice").await;
        let mut bob = register(&pusher, "bob").await;

        // when (操作):
        let event = RelayEvent::UserDisconnected(id("charlie"));
        let result = pusher.broadcast_all(&event).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let expected = r#"{"event":"userDisconnected","data":"charlie"}"#;
        assert_eq!(alice.recv().await.as_deref(), Some(expected));
        assert_eq!(bob.recv().await.as_deref(), Some(expected));
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_closed_receiver() {
        // テスト項目: 受信側が閉じた接続が混ざっていてもブロードキャストは成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let closed = register(&pusher, "closed").await;
        drop(closed);
        let mut bob = register(&pusher, "bob").await;

        // when (操作):
        let result = pusher.broadcast_all(&location_event("alice")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(bob.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unregister_reports_membership_once() {
        // テスト項目: 登録解除は 1 回目のみ true を返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let _alice = register(&pusher, "alice").await;

        // when (操作):
        let first = pusher.unregister_client(&id("alice")).await;
        let second = pusher.unregister_client(&id("alice")).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert!(!pusher.is_registered(&id("alice")).await);
    }

    #[tokio::test]
    async fn test_events_to_one_connection_keep_emission_order() {
        // テスト項目: 同じ接続への送信は送信順に届く（FIFO）
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let mut bob = register(&pusher, "bob").await;

        // when (操作):
        for latitude in [1.0, 2.0, 3.0] {
            let event = RelayEvent::LocationUpdated {
                connection_id: id("alice"),
                coordinates: Coordinates::new(latitude, 0.0).unwrap(),
            };
            pusher.broadcast_except(&id("alice"), &event).await.unwrap();
        }

        // then (期待する結果):
        for latitude in ["1.0", "2.0", "3.0"] {
            let frame = bob.recv().await.unwrap();
            assert!(frame.contains(&format!(r#""latitude":{latitude}"#)));
        }
    }
}
