//! InMemory Incident Gateway 実装
//!
//! 事案とコメントを保持するインメモリのドキュメントストア。
//! upvote の加算と検証状態の更新は 1 回のロック内で行われるため、
//! 閾値到達時に「未検証のまま 5 票」の状態が外から見えることはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Comment, GatewayError, Incident, IncidentGateway, IncidentId};

#[derive(Default)]
struct Documents {
    incidents: HashMap<IncidentId, Incident>,
    comments: HashMap<IncidentId, Vec<Comment>>,
}

/// インメモリ Incident Gateway 実装
#[derive(Default)]
pub struct InMemoryIncidentGateway {
    documents: Mutex<Documents>,
}

impl InMemoryIncidentGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IncidentGateway for InMemoryIncidentGateway {
    async fn create(&self, incident: Incident) -> Result<Incident, GatewayError> {
        let mut documents = self.documents.lock().await;
        if documents.incidents.contains_key(&incident.id) {
            return Err(GatewayError::Duplicate(incident.id.into_string()));
        }
        documents
            .incidents
            .insert(incident.id.clone(), incident.clone());
        tracing::debug!("Stored incident '{}'", incident.id);
        Ok(incident)
    }

    async fn find_by_id(&self, id: &IncidentId) -> Result<Incident, GatewayError> {
        let documents = self.documents.lock().await;
        documents
            .incidents
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.as_str().to_string()))
    }

    async fn increment_upvote(&self, id: &IncidentId) -> Result<Incident, GatewayError> {
        let mut documents = self.documents.lock().await;
        let incident = documents
            .incidents
            .get_mut(id)
            .ok_or_else(|| GatewayError::NotFound(id.as_str().to_string()))?;
        incident.register_upvote();
        Ok(incident.clone())
    }

    async fn list(&self) -> Result<Vec<Incident>, GatewayError> {
        let documents = self.documents.lock().await;
        let mut incidents: Vec<Incident> = documents.incidents.values().cloned().collect();
        incidents.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(incidents)
    }

    async fn create_comment(&self, comment: Comment) -> Result<Comment, GatewayError> {
        let mut documents = self.documents.lock().await;
        if !documents.incidents.contains_key(&comment.incident_id) {
            return Err(GatewayError::NotFound(
                comment.incident_id.as_str().to_string(),
            ));
        }
        documents
            .comments
            .entry(comment.incident_id.clone())
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, incident_id: &IncidentId) -> Result<Vec<Comment>, GatewayError> {
        let documents = self.documents.lock().await;
        if !documents.incidents.contains_key(incident_id) {
            return Err(GatewayError::NotFound(incident_id.as_str().to_string()));
        }
        Ok(documents
            .comments
            .get(incident_id)
            .cloned()
            .unwrap_or_default())
    }
}
