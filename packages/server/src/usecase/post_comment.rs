//! UseCase: 事案へのコメント投稿

use std::sync::Arc;

use crowdguard_shared::time::Clock;

use crate::domain::{
    Comment, CommentBody, IncidentGateway, IncidentId, MessagePusher, RelayEvent, UserId,
};

use super::{error::PostCommentError, notify::notify};

pub struct PostCommentUseCase {
    incident_gateway: Arc<dyn IncidentGateway>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl PostCommentUseCase {
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

    /// コメントを保存し、全接続に newComment を送る
    pub async fn execute(
        &self,
        incident_id: IncidentId,
        body: CommentBody,
        author_id: UserId,
    ) -> Result<Comment, PostCommentError> {
        let comment = Comment::new(incident_id, body, author_id, self.clock.now());

        let stored = self.incident_gateway.create_comment(comment).await?;
        tracing::info!(
            "Comment '{}' posted on incident '{}'",
            stored.id.as_str(),
            stored.incident_id
        );

        notify(
            self.message_pusher.as_ref(),
            RelayEvent::CommentCreated(stored.clone()),
        )
        .await;

        Ok(stored)
    }
}
