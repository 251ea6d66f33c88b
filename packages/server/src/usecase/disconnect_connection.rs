//! UseCase: 切断処理（OPEN → CLOSED）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectConnectionUseCase::execute() メソッド
//! - Presence の削除と、残りの接続への userDisconnected 通知
//!
//! ### なぜこのテストが必要か
//! - 明示的な切断とトランスポート層の切断が同時に起きても、
//!   削除と通知はちょうど 1 回でなければならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：3 接続中 1 接続の切断
//! - エッジケース：位置を一度も送らずに切断した接続
//! - 異常系：同じ接続の切断が 2 回届く

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceStore, RelayEvent};

use super::error::DisconnectError;

/// 切断のユースケース
pub struct DisconnectConnectionUseCase {
    presence_store: Arc<dyn PresenceStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectConnectionUseCase {
    pub fn new(
        presence_store: Arc<dyn PresenceStore>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence_store,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// 送信キューの登録解除に成功した呼び出しだけが Presence の削除と通知を行う。
    /// 登録解除は Mutex の中で行われるため、同時に 2 回呼ばれても通知は 1 回になる。
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 切断処理と通知を行った
    /// * `Err(DisconnectError::AlreadyClosed)` - 既に切断処理済み（何もしていない）
    pub async fn execute(&self, connection_id: ConnectionId) -> Result<(), DisconnectError> {
        // 1. 送信キューの登録解除（重複排除）
        if !self.message_pusher.unregister_client(&connection_id).await {
            return Err(DisconnectError::AlreadyClosed(connection_id.into_string()));
        }

        // 2. Presence を削除（位置未送信の接続では何もしない）
        let had_presence = self.presence_store.remove(&connection_id).await;
        tracing::debug!(
            "Connection '{}' removed (had presence: {})",
            connection_id,
            had_presence
        );

        // 3. 残りの全接続に通知
        let event = RelayEvent::UserDisconnected(connection_id);
        if let Err(e) = self.message_pusher.broadcast_all(&event).await {
            tracing::warn!("Failed to broadcast '{}': {}", event.name(), e);
        }

        Ok(())
    }

    /// 残りの接続のうち位置を送信済みの数
    pub async fn count_remaining_presence(&self) -> usize {
        self.presence_store.count().await
    }
}
