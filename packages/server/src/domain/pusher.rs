//! MessagePusher trait 定義
//!
//! クライアントへのイベント配信（Event Relay）のインターフェース。
//! 配信は at-most-once の fire-and-forget で、ACK や再送は行わない。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, PresenceStore, RelayEvent};

/// 接続ごとの送信キュー（シリアライズ済みの JSON テキスト）
///
/// 1 接続につき 1 本のキューを 1 つの writer タスクが順に処理するため、
/// 接続単位の FIFO が保たれる。
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信キューを登録する
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信キューを登録し、現在の Presence スナップショットをその接続だけに送る
    ///
    /// 登録からスナップショットのキュー投入までの間に、他のブロードキャストは割り込まない。
    /// スナップショットより前に `userDisconnected` や `locationUpdate` が届くことはない。
    /// スナップショットの送信に失敗しても登録は残る。
    ///
    /// 戻り値はスナップショットに含まれた接続数。
    async fn register_with_snapshot(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
        presence_store: Arc<dyn PresenceStore>,
    ) -> Result<usize, MessagePushError>;

    /// 接続の送信キューを登録解除する
    ///
    /// 登録されていた場合のみ `true`。2 回目以降の呼び出しは `false` を返す。
    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool;

    async fn is_registered(&self, connection_id: &ConnectionId) -> bool;

    /// 特定の接続にだけ送る
    async fn send_to(
        &self,
        connection_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;

    /// 全接続に送る（イベントを起こした本人を含む）
    async fn broadcast_all(&self, event: &RelayEvent) -> Result<(), MessagePushError>;

    /// 送信者以外の全接続に送る
    async fn broadcast_except(
        &self,
        sender_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;
}
