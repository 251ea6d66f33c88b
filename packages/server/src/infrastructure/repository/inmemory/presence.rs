//! InMemory Presence Store 実装
//!
//! ドメイン層が定義する PresenceStore trait の具体的な実装。
//! 接続 ID → 最新位置の HashMap を 1 つの Mutex で保護します。
//! プロセス再起動をまたいだ永続化は行いません。

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Coordinates, PresenceRecord, PresenceStore};

/// インメモリ Presence Store 実装
#[derive(Default)]
pub struct InMemoryPresenceStore {
    records: Mutex<HashMap<ConnectionId, PresenceRecord>>,
}

impl InMemoryPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceStore for InMemoryPresenceStore {
    async fn upsert(
        &self,
        connection_id: ConnectionId,
        coordinates: Coordinates,
        at: DateTime<Utc>,
    ) -> PresenceRecord {
        let mut records = self.records.lock().await;
        let record = records
            .entry(connection_id.clone())
            .and_modify(|record| {
                record.coordinates = coordinates;
                record.last_updated = at;
            })
            .or_insert_with(|| PresenceRecord {
                connection_id,
                coordinates,
                last_updated: at,
            });
        record.clone()
    }

    async fn remove(&self, connection_id: &ConnectionId) -> bool {
        let mut records = self.records.lock().await;
        records.remove(connection_id).is_some()
    }

    async fn snapshot(&self) -> Vec<PresenceRecord> {
        let records = self.records.lock().await;
        let mut snapshot: Vec<PresenceRecord> = records.values().cloned().collect();
        snapshot.sort_by(|a, b| a.connection_id.cmp(&b.connection_id));
        snapshot
    }

    async fn contains(&self, connection_id: &ConnectionId) -> bool {
        let records = self.records.lock().await;
        records.contains_key(connection_id)
    }

    async fn count(&self) -> usize {
        let records = self.records.lock().await;
        records.len()
    }
}
