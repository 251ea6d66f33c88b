//! UseCase: 事案の通報
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ReportIncidentUseCase::execute() メソッド
//! - 保存が完了してから newIncident がブロードキャストされること
//!
//! ### どのような状況を想定しているか
//! - 正常系：通報の保存とブロードキャスト
//! - 異常系：同じ ID の通報（保存失敗時はブロードキャストしない）

use std::sync::Arc;

use crowdguard_shared::time::Clock;

use crate::domain::{Incident, IncidentDraft, IncidentGateway, MessagePusher, RelayEvent};

use super::{error::ReportIncidentError, notify::notify};

pub struct ReportIncidentUseCase {
    incident_gateway: Arc<dyn IncidentGateway>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ReportIncidentUseCase {
    pub fn new(
        incident_gateway: Arc<dyn IncidentGateway>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            incident_gateway,
            message_pusher,
            clock,
        }
    }

    /// 事案を保存し、全接続に newIncident を送る
    ///
    /// タイムスタンプ・検証状態・upvote 数はサーバー側で決める。
    pub async fn execute(&self, draft: IncidentDraft) -> Result<Incident, ReportIncidentError> {
        let incident = draft.into_incident(self.clock.now());

        let stored = self.incident_gateway.create(incident).await?;
        tracing::info!("Incident '{}' reported ({})", stored.id, stored.kind.as_str());

        notify(
            self.message_pusher.as_ref(),
            RelayEvent::IncidentCreated(stored.clone()),
        )
        .await;

        Ok(stored)
    }
}
