//! UseCase: 接続開始処理（CONNECTING → OPEN）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectConnectionUseCase::execute() メソッド
//! - 送信キューの登録と、Presence スナップショットの直接送信
//! - スナップショット取得中に切断が起きても、切断通知がスナップショットより先に届かないこと
//!
//! ### なぜこのテストが必要か
//! - 新しい接続は既存の参加者を次の位置更新を待たずに描画できる必要がある
//! - スナップショットは新しい接続だけに送られ、他の接続には重複して届かないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存の Presence がある状態での接続
//! - エッジケース：誰も位置を送っていない状態での接続（空のスナップショット）
//! - 競合：スナップショット取得と同時に別の接続が切断される

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceStore, PusherChannel};

use super::error::ConnectError;

/// 接続開始のユースケース
pub struct ConnectConnectionUseCase {
    /// PresenceStore（位置情報ストアの抽象化）
    presence_store: Arc<dyn PresenceStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectConnectionUseCase {
    /// 新しい ConnectConnectionUseCase を作成
    pub fn new(
        presence_store: Arc<dyn PresenceStore>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence_store,
            message_pusher,
        }
    }

    /// 接続を OPEN にする
    ///
    /// 登録とスナップショットの送信は MessagePusher の中で 1 つの操作として行われる。
    /// 新しい接続が受け取る位置更新や切断通知は、必ずスナップショットの後に届く。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 新しい接続の ID（Domain Model）
    /// * `sender` - 接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - スナップショットに含まれた接続数
    /// * `Err(ConnectError)` - スナップショットの送信失敗
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<usize, ConnectError> {
        self.message_pusher
            .register_with_snapshot(connection_id, sender, self.presence_store.clone())
            .await
            .map_err(|e| ConnectError::SnapshotDeliveryFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Coordinates, PresenceRecord},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryPresenceStore,
        },
        usecase::DisconnectConnectionUseCase,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::time::Duration;
    use tokio::sync::{Notify, mpsc};

    /// スナップショットのコピーを取った直後に、`resume` が通知されるまで止まる PresenceStore
    struct PausingPresenceStore {
        inner: InMemoryPresenceStore,
        snapshot_taken: Notify,
        resume: Notify,
    }

    #[async_trait]
    impl PresenceStore for PausingPresenceStore {
        async fn upsert(
            &self,
            connection_id: ConnectionId,
            coordinates: Coordinates,
            at: DateTime<Utc>,
        ) -> PresenceRecord {
            self.inner.upsert(connection_id, coordinates, at).await
        }

        async fn remove(&self, connection_id: &ConnectionId) -> bool {
            self.inner.remove(connection_id).await
        }

        async fn snapshot(&self) -> Vec<PresenceRecord> {
            let records = self.inner.snapshot().await;
            self.snapshot_taken.notify_one();
            self.resume.notified().await;
            records
        }

        async fn contains(&self, connection_id: &ConnectionId) -> bool {
            self.inner.contains(connection_id).await
        }

        async fn count(&self) -> usize {
            self.inner.count().await
        }
    }

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn create_usecase() -> (
        ConnectConnectionUseCase,
        Arc<InMemoryPresenceStore>,
        Arc<WebSocketMessagePusher>,
    ) {
        let presence_store = Arc::new(InMemoryPresenceStore::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase =
            ConnectConnectionUseCase::new(presence_store.clone(), message_pusher.clone());
        (usecase, presence_store, message_pusher)
    }

    #[tokio::test]
    async fn test_connect_sends_current_presence_to_new_connection() {
        // テスト項目: 新しい接続に現在の Presence スナップショットが送られる
        // given (前提条件):
        let (usecase, presence_store, _pusher) = create_usecase();
        presence_store
            .upsert(
                id("alice"),
                Coordinates::new(1.0, 2.0).unwrap(),
                DateTime::<Utc>::UNIX_EPOCH,
            )
            .await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(id("bob"), tx).await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(
            frame,
            serde_json::json!({
                "event": "currentUsers",
                "data": {"alice": {"id": "alice", "latitude": 1.0, "longitude": 2.0}}
            })
        );
    }

    #[tokio::test]
    async fn test_connect_snapshot_is_not_broadcast() {
        // テスト項目: スナップショットは既存の接続には送られない
        // given (前提条件):
        let (usecase, _store, message_pusher) = create_usecase();
        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
        message_pusher.register_client(id("alice"), alice_tx).await;
        let (bob_tx, mut bob_rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(id("bob"), bob_tx).await.unwrap();

        // then (期待する結果):
        assert!(bob_rx.recv().await.is_some());
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connect_with_empty_presence_sends_empty_snapshot() {
        // テスト項目: Presence が空でも空のスナップショットが送られ、接続は登録される
        // given (前提条件):
        let (usecase, _store, message_pusher) = create_usecase();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(id("alice"), tx).await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
        assert_eq!(
            rx.recv().await.as_deref(),
            Some(r#"{"event":"currentUsers","data":{}}"#)
        );
        assert!(message_pusher.is_registered(&id("alice")).await);
    }

    #[tokio::test]
    async fn test_disconnect_during_snapshot_is_delivered_after_snapshot() {
        // テスト項目: スナップショット取得中に切断された接続の通知は、スナップショットの後に届く
        // given (前提条件):
        let store = Arc::new(PausingPresenceStore {
            inner: InMemoryPresenceStore::new(),
            snapshot_taken: Notify::new(),
            resume: Notify::new(),
        });
        store
            .upsert(
                id("charlie"),
                Coordinates::new(1.0, 1.0).unwrap(),
                DateTime::<Utc>::UNIX_EPOCH,
            )
            .await;
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let (charlie_tx, _charlie_rx) = mpsc::unbounded_channel();
        message_pusher.register_client(id("charlie"), charlie_tx).await;
        let connect = Arc::new(ConnectConnectionUseCase::new(
            store.clone(),
            message_pusher.clone(),
        ));
        let disconnect = Arc::new(DisconnectConnectionUseCase::new(
            store.clone(),
            message_pusher.clone(),
        ));
        let (bob_tx, mut bob_rx) = mpsc::unbounded_channel();

        // when (操作):
        let connect_task = tokio::spawn(async move { connect.execute(id("bob"), bob_tx).await });
        store.snapshot_taken.notified().await;
        let disconnect_task =
            tokio::spawn(async move { disconnect.execute(id("charlie")).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.resume.notify_one();
        let connected = connect_task.await.unwrap();
        let disconnected = disconnect_task.await.unwrap();

        // then (期待する結果):
        assert_eq!(connected, Ok(1));
        assert_eq!(disconnected, Ok(()));
        assert_eq!(
            bob_rx.recv().await.as_deref(),
            Some(
                r#"{"event":"currentUsers","data":{"charlie":{"id":"charlie","latitude":1.0,"longitude":1.0}}}"#
            )
        );
        assert_eq!(
            bob_rx.recv().await.as_deref(),
            Some(r#"{"event":"userDisconnected","data":"charlie"}"#)
        );
        assert!(!store.contains(&id("charlie")).await);
    }
}
