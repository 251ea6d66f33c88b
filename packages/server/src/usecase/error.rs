//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("failed to deliver presence snapshot: {0}")]
    SnapshotDeliveryFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    /// 既に切断処理済み（重複した切断シグナル）
    #[error("connection '{0}' is already closed")]
    AlreadyClosed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateLocationError {
    /// 切断済みの接続からの位置更新
    #[error("connection '{0}' is not open")]
    NotConnected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportIncidentError {
    #[error("incident '{0}' already exists")]
    Duplicate(String),

    #[error("failed to store incident: {0}")]
    Storage(String),
}

impl From<GatewayError> for ReportIncidentError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Duplicate(id) => Self::Duplicate(id),
            other => Self::Storage(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpvoteIncidentError {
    #[error("incident '{0}' not found")]
    NotFound(String),

    #[error("failed to upvote incident: {0}")]
    Storage(String),
}

impl From<GatewayError> for UpvoteIncidentError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostCommentError {
    #[error("incident '{0}' not found")]
    IncidentNotFound(String),

    #[error("failed to store comment: {0}")]
    Storage(String),
}

impl From<GatewayError> for PostCommentError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::NotFound(id) => Self::IncidentNotFound(id),
            other => Self::Storage(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetIncidentError {
    #[error("incident '{0}' not found")]
    NotFound(String),

    #[error("failed to read incidents: {0}")]
    Storage(String),
}

impl From<GatewayError> for GetIncidentError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other.to_string()),
        }
    }
}
