//! UseCase: 事案とコメントの参照

use std::sync::Arc;

use crate::domain::{Comment, Incident, IncidentGateway, IncidentId};

use super::error::GetIncidentError;

pub struct GetIncidentsUseCase {
    incident_gateway: Arc<dyn IncidentGateway>,
}

impl GetIncidentsUseCase {
    pub fn new(incident_gateway: Arc<dyn IncidentGateway>) -> Self {
        Self { incident_gateway }
    }

    /// 全事案を新しい順で取得
    pub async fn list(&self) -> Result<Vec<Incident>, GetIncidentError> {
        Ok(self.incident_gateway.list().await?)
    }

    pub async fn find(&self, id: &IncidentId) -> Result<Incident, GetIncidentError> {
        Ok(self.incident_gateway.find_by_id(id).await?)
    }

    /// 事案のコメントを古い順で取得
    pub async fn comments(&self, id: &IncidentId) -> Result<Vec<Comment>, GetIncidentError> {
        Ok(self.incident_gateway.list_comments(id).await?)
    }
}
