//! Server state shared by all handlers.

use std::{sync::Arc, time::Duration};

use crate::usecase::{
    ConnectConnectionUseCase, DisconnectConnectionUseCase, GetIncidentsUseCase,
    GetPresenceUseCase, PostCommentUseCase, ReportIncidentUseCase, UpdateLocationUseCase,
    UpvoteIncidentUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectConnectionUseCase（接続開始のユースケース）
    pub connect_connection_usecase: Arc<ConnectConnectionUseCase>,
    /// UpdateLocationUseCase（位置更新のユースケース）
    pub update_location_usecase: Arc<UpdateLocationUseCase>,
    /// DisconnectConnectionUseCase（切断のユースケース）
    pub disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
    /// ReportIncidentUseCase（事案通報のユースケース）
    pub report_incident_usecase: Arc<ReportIncidentUseCase>,
    /// UpvoteIncidentUseCase（upvote のユースケース）
    pub upvote_incident_usecase: Arc<UpvoteIncidentUseCase>,
    /// PostCommentUseCase（コメント投稿のユースケース）
    pub post_comment_usecase: Arc<PostCommentUseCase>,
    /// GetIncidentsUseCase（事案参照のユースケース）
    pub get_incidents_usecase: Arc<GetIncidentsUseCase>,
    /// GetPresenceUseCase（Presence 参照のユースケース）
    pub get_presence_usecase: Arc<GetPresenceUseCase>,
    /// WebSocket の ping 間隔
    pub heartbeat_interval: Duration,
}
