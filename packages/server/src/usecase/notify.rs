//! 書き込み完了後の通知
//!
//! 永続化に成功した UseCase はここを 1 回だけ呼ぶ。
//! 配信は fire-and-forget なので、失敗してもリクエスト自体は成功扱い。

use crate::domain::{MessagePusher, RelayEvent};

pub(crate) async fn notify(message_pusher: &dyn MessagePusher, event: RelayEvent) {
    match message_pusher.broadcast_all(&event).await {
        Ok(()) => tracing::info!("Broadcasted '{}'", event.name()),
        Err(e) => tracing::warn!("Failed to broadcast '{}': {}", event.name(), e),
    }
}
