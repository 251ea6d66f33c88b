//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! - `PresenceStore`: 接続ごとの位置情報（揮発性、メモリ上のみ）
//! - `IncidentGateway`: 事案・コメントの永続ストア（外部コラボレーター）

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    Comment, ConnectionId, Coordinates, GatewayError, Incident, IncidentId, PresenceRecord,
};

/// Presence Store trait
///
/// 接続 ID ごとに最大 1 件の `PresenceRecord` を保持する。
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// 位置を登録または上書きし、保存後のレコードを返す
    ///
    /// 同じ接続 ID に対して何度呼んでもレコードは 1 件のまま。
    async fn upsert(
        &self,
        connection_id: ConnectionId,
        coordinates: Coordinates,
        at: DateTime<Utc>,
    ) -> PresenceRecord;

    /// レコードを削除する（存在しなければ何もしない）
    ///
    /// 削除した場合は `true` を返す。
    async fn remove(&self, connection_id: &ConnectionId) -> bool;

    /// 現在の全レコードのコピーを接続 ID 順で返す
    async fn snapshot(&self) -> Vec<PresenceRecord>;

    async fn contains(&self, connection_id: &ConnectionId) -> bool;

    async fn count(&self) -> usize;
}

/// Incident Gateway trait
///
/// 事案とコメントの create / read / update。
/// UseCase は書き込み完了を待ってからブロードキャストする。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IncidentGateway: Send + Sync {
    /// 事案を保存する。同じ ID が既にあれば `GatewayError::Duplicate`
    async fn create(&self, incident: Incident) -> Result<Incident, GatewayError>;

    async fn find_by_id(&self, id: &IncidentId) -> Result<Incident, GatewayError>;

    /// upvote を 1 加算し、検証状態を更新した後のレコードを返す
    async fn increment_upvote(&self, id: &IncidentId) -> Result<Incident, GatewayError>;

    /// 全事案を新しい順で返す
    async fn list(&self) -> Result<Vec<Incident>, GatewayError>;

    /// コメントを保存する。対象の事案がなければ `GatewayError::NotFound`
    async fn create_comment(&self, comment: Comment) -> Result<Comment, GatewayError>;

    /// 事案のコメントを古い順で返す
    async fn list_comments(&self, incident_id: &IncidentId) -> Result<Vec<Comment>, GatewayError>;
}
