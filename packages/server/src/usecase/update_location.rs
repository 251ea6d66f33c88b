//! UseCase: 位置更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateLocationUseCase::execute() メソッド
//! - Presence の upsert と、送信者以外へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者は自分の位置を知っているため、エコーしてはいけない
//! - 同じ接続からの更新でレコードが増えないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：3 接続中 1 接続からの位置更新
//! - 異常系：切断済みの接続からの位置更新

use std::sync::Arc;

use crowdguard_shared::time::Clock;

use crate::domain::{
    ConnectionId, Coordinates, MessagePusher, PresenceRecord, PresenceStore, RelayEvent,
};

use super::error::UpdateLocationError;

/// 位置更新のユースケース
pub struct UpdateLocationUseCase {
    presence_store: Arc<dyn PresenceStore>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl UpdateLocationUseCase {
    pub fn new(
        presence_store: Arc<dyn PresenceStore>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            presence_store,
            message_pusher,
            clock,
        }
    }

    /// 位置更新を実行
    ///
    /// # Returns
    ///
    /// * `Ok(PresenceRecord)` - 保存後のレコード
    /// * `Err(UpdateLocationError)` - 接続が OPEN でない
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        coordinates: Coordinates,
    ) -> Result<PresenceRecord, UpdateLocationError> {
        // 1. OPEN な接続からの更新のみ受け付ける
        if !self.message_pusher.is_registered(&connection_id).await {
            return Err(UpdateLocationError::NotConnected(
                connection_id.into_string(),
            ));
        }

        // 2. Presence を更新
        let record = self
            .presence_store
            .upsert(connection_id.clone(), coordinates, self.clock.now())
            .await;

        // 3. 送信者以外にブロードキャスト
        let event = RelayEvent::LocationUpdated {
            connection_id: connection_id.clone(),
            coordinates,
        };
        if let Err(e) = self
            .message_pusher
            .broadcast_except(&connection_id, &event)
            .await
        {
            tracing::warn!("Failed to relay location of '{}': {}", connection_id, e);
        }

        Ok(record)
    }
}
