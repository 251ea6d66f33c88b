//! UseCase: 現在の Presence の参照（デバッグ用）

use std::sync::Arc;

use crate::domain::{PresenceRecord, PresenceStore};

pub struct GetPresenceUseCase {
    presence_store: Arc<dyn PresenceStore>,
}

impl GetPresenceUseCase {
    pub fn new(presence_store: Arc<dyn PresenceStore>) -> Self {
        Self { presence_store }
    }

    pub async fn execute(&self) -> Vec<PresenceRecord> {
        self.presence_store.snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, Coordinates},
        infrastructure::repository::InMemoryPresenceStore,
    };
    use chrono::{DateTime, Utc};

    #[tokio::test]
    async fn test_get_presence_returns_snapshot() {
        // テスト項目: 位置を送信済みの接続だけが返る
        // given (前提条件):
        let store = Arc::new(InMemoryPresenceStore::new());
        store
            .upsert(
                ConnectionId::new("bob".to_string()).unwrap(),
                Coordinates::new(-33.9, 151.2).unwrap(),
                DateTime::<Utc>::UNIX_EPOCH,
            )
            .await;
        let usecase = GetPresenceUseCase::new(store);

        // when (操作):
        let records = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].connection_id.as_str(), "bob");
    }
}
