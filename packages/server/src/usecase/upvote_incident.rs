//! UseCase: 事案への upvote
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpvoteIncidentUseCase::execute() メソッド
//! - upvote ごとの incidentUpdated ブロードキャストと、閾値での検証
//!
//! ### なぜこのテストが必要か
//! - 5 回目の upvote で upvotes=5 かつ verified=true のレコードが 1 回だけ配信されること
//! - 同時 upvote で加算が失われないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：閾値未満・閾値到達・閾値超過
//! - 異常系：存在しない事案への upvote

use std::sync::Arc;

use crate::domain::{Incident, IncidentGateway, IncidentId, MessagePusher, RelayEvent};

use super::{error::UpvoteIncidentError, notify::notify};

pub struct UpvoteIncidentUseCase {
    incident_gateway: Arc<dyn IncidentGateway>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpvoteIncidentUseCase {
    pub fn new(
        incident_gateway: Arc<dyn IncidentGateway>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            incident_gateway,
            message_pusher,
        }
    }

    /// upvote を 1 加算し、更新後のレコードを全接続に送る
    ///
    /// 加算と検証状態の更新は Gateway 内で 1 回の書き込みとして行われる。
    pub async fn execute(&self, id: &IncidentId) -> Result<Incident, UpvoteIncidentError> {
        let updated = self.incident_gateway.increment_upvote(id).await?;
        tracing::info!(
            "Incident '{}' upvoted ({} upvotes, verified: {})",
            updated.id,
            updated.upvotes,
            updated.verified
        );

        notify(
            self.message_pusher.as_ref(),
            RelayEvent::IncidentUpdated(updated.clone()),
        )
        .await;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ConnectionId, GatewayError, MockIncidentGateway, MockMessagePusher, entity::fixtures,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryIncidentGateway,
        },
    };
    use tokio::sync::mpsc;

    async fn setup() -> (
        UpvoteIncidentUseCase,
        mpsc::UnboundedReceiver<String>,
        IncidentId,
    ) {
        let gateway = Arc::new(InMemoryIncidentGateway::new());
        let incident = gateway.create(fixtures::incident("inc-1")).await.unwrap();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (tx, rx) = mpsc::unbounded_channel();
        pusher
            .register_client(ConnectionId::new("watcher".to_string()).unwrap(), tx)
            .await;
        (UpvoteIncidentUseCase::new(gateway, pusher), rx, incident.id)
    }

    fn parse(frame: &str) -> serde_json::Value {
        serde_json::from_str(frame).unwrap()
    }

    #[tokio::test]
    async fn test_each_upvote_broadcasts_incident_updated() {
        // テスト項目: 閾値未満の upvote でも毎回 incidentUpdated が配信される
        // given (前提条件):
        let (usecase, mut rx, id) = setup().await;

        // when (操作):
        for _ in 0..4 {
            usecase.execute(&id).await.unwrap();
        }

        // then (期待する結果):
        for expected in 1..=4 {
            let frame = parse(&rx.recv().await.unwrap());
            assert_eq!(frame["event"], "incidentUpdated");
            assert_eq!(frame["data"]["upvotes"], expected);
            assert_eq!(frame["data"]["verified"], false);
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_fifth_upvote_broadcasts_verified_once() {
        // テスト項目: 5 回目の upvote で upvotes=5・verified=true が 1 回だけ配信される
        // given (前提条件):
        let (usecase, mut rx, id) = setup().await;
        for _ in 0..4 {
            usecase.execute(&id).await.unwrap();
            rx.recv().await.unwrap();
        }

        // when (操作):
        let updated = usecase.execute(&id).await.unwrap();

        // then (期待する結果):
        assert_eq!(updated.upvotes, 5);
        assert!(updated.verified);
        let frame = parse(&rx.recv().await.unwrap());
        assert_eq!(frame["data"]["upvotes"], 5);
        assert_eq!(frame["data"]["verified"], true);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_upvote_past_threshold_stays_verified_and_broadcasts() {
        // テスト項目: 閾値を超えても検証済みのまま加算が続き、毎回 incidentUpdated が配信される
        // given (前提条件):
        let (usecase, mut rx, id) = setup().await;
        for _ in 0..5 {
            usecase.execute(&id).await.unwrap();
            rx.recv().await.unwrap();
        }

        // when (操作):
        let updated = usecase.execute(&id).await.unwrap();

        // then (期待する結果):
        assert_eq!(updated.upvotes, 6);
        assert!(updated.verified);
        let frame = parse(&rx.recv().await.unwrap());
        assert_eq!(frame["event"], "incidentUpdated");
        assert_eq!(frame["data"]["upvotes"], 6);
        assert_eq!(frame["data"]["verified"], true);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_concurrent_upvotes_are_not_lost() {
        // テスト項目: 同時に 10 件の upvote が来ても全て加算される
        // given (前提条件):
        let (usecase, _rx, id) = setup().await;
        let usecase = Arc::new(usecase);

        // when (操作):
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let usecase = usecase.clone();
                let id = id.clone();
                tokio::spawn(async move { usecase.execute(&id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // then (期待する結果):
        let updated = usecase.execute(&id).await.unwrap();
        assert_eq!(updated.upvotes, 11);
    }

    #[tokio::test]
    async fn test_upvote_unknown_incident_is_not_broadcast() {
        // テスト項目: 存在しない事案への upvote は NotFound で、配信もされない
        // given (前提条件):
        let mut gateway = MockIncidentGateway::new();
        gateway
            .expect_increment_upvote()
            .times(1)
            .returning(|id| Err(GatewayError::NotFound(id.to_string())));
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast_all().times(0);
        let usecase = UpvoteIncidentUseCase::new(Arc::new(gateway), Arc::new(pusher));

        // when (操作):
        let result = usecase
            .execute(&IncidentId::new("missing".to_string()).unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(UpvoteIncidentError::NotFound("missing".to_string()))
        );
    }
}
