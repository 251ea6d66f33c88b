//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{CommentBody, IncidentDraft, IncidentId, UserId, ValueObjectError},
    infrastructure::dto::{
        http::{CreateCommentRequest, CreateIncidentRequest, ErrorResponse, PresenceDetailDto},
        websocket::{CommentDto, IncidentDto},
    },
    ui::state::AppState,
    usecase::{GetIncidentError, PostCommentError, ReportIncidentError, UpvoteIncidentError},
};

/// Non-2xx response with a `{"error": ...}` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl ToString) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.message);
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(error: ValueObjectError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }
}

impl From<ReportIncidentError> for ApiError {
    fn from(error: ReportIncidentError) -> Self {
        let status = match error {
            ReportIncidentError::Duplicate(_) => StatusCode::CONFLICT,
            ReportIncidentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error)
    }
}

impl From<UpvoteIncidentError> for ApiError {
    fn from(error: UpvoteIncidentError) -> Self {
        let status = match error {
            UpvoteIncidentError::NotFound(_) => StatusCode::NOT_FOUND,
            UpvoteIncidentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error)
    }
}

impl From<PostCommentError> for ApiError {
    fn from(error: PostCommentError) -> Self {
        let status = match error {
            PostCommentError::IncidentNotFound(_) => StatusCode::NOT_FOUND,
            PostCommentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error)
    }
}

impl From<GetIncidentError> for ApiError {
    fn from(error: GetIncidentError) -> Self {
        let status = match error {
            GetIncidentError::NotFound(_) => StatusCode::NOT_FOUND,
            GetIncidentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error)
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint to get the current presence snapshot
pub async fn debug_presence(State(state): State<Arc<AppState>>) -> Json<Vec<PresenceDetailDto>> {
    let records = state.get_presence_usecase.execute().await;
    Json(records.iter().map(PresenceDetailDto::from).collect())
}

/// Get incidents, newest first
pub async fn list_incidents(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<IncidentDto>>> {
    let incidents = state.get_incidents_usecase.list().await?;
    Ok(Json(incidents.iter().map(IncidentDto::from).collect()))
}

/// Report a new incident and broadcast `newIncident`
pub async fn create_incident(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateIncidentRequest>,
) -> ApiResult<(StatusCode, Json<IncidentDto>)> {
    // DTO から Domain Model への変換
    let draft = IncidentDraft::try_from(request)?;
    let incident = state.report_incident_usecase.execute(draft).await?;
    Ok((StatusCode::CREATED, Json(IncidentDto::from(&incident))))
}

/// Get incident by ID
pub async fn get_incident(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<IncidentDto>> {
    let id = IncidentId::new(id)?;
    let incident = state.get_incidents_usecase.find(&id).await?;
    Ok(Json(IncidentDto::from(&incident)))
}

/// Upvote an incident and broadcast `incidentUpdated`
pub async fn upvote_incident(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<IncidentDto>> {
    let id = IncidentId::new(id)?;
    let incident = state.upvote_incident_usecase.execute(&id).await?;
    Ok(Json(IncidentDto::from(&incident)))
}

/// Get comments of an incident, oldest first
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<CommentDto>>> {
    let id = IncidentId::new(id)?;
    let comments = state.get_incidents_usecase.comments(&id).await?;
    Ok(Json(comments.iter().map(CommentDto::from).collect()))
}

/// Post a comment on an incident and broadcast `newComment`
pub async fn post_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentDto>)> {
    let incident_id = IncidentId::new(id)?;
    let body = CommentBody::new(request.body)?;
    let author_id = UserId::new(request.author_id)?;

    let comment = state
        .post_comment_usecase
        .execute(incident_id, body, author_id)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentDto::from(&comment))))
}
