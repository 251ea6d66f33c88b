//! Relay されるイベント（ドメイン表現）
//!
//! UseCase 層はこの enum を MessagePusher に渡すだけで、
//! ワイヤーフォーマット（JSON）への変換は Infrastructure 層が行います。

use super::{
    entity::{Comment, Incident, PresenceRecord},
    value_object::{ConnectionId, Coordinates},
};

#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    /// A connection reported a new position (`locationUpdate`)
    LocationUpdated {
        connection_id: ConnectionId,
        coordinates: Coordinates,
    },
    /// Presence state at the moment a connection opened (`currentUsers`)
    PresenceSnapshot(Vec<PresenceRecord>),
    /// A connection closed (`userDisconnected`)
    UserDisconnected(ConnectionId),
    /// An incident was stored (`newIncident`)
    IncidentCreated(Incident),
    /// An incident changed after an upvote (`incidentUpdated`)
    IncidentUpdated(Incident),
    /// A comment was stored (`newComment`)
    CommentCreated(Comment),
}

impl RelayEvent {
    /// Wire event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::LocationUpdated { .. } => "locationUpdate",
            Self::PresenceSnapshot(_) => "currentUsers",
            Self::UserDisconnected(_) => "userDisconnected",
            Self::IncidentCreated(_) => "newIncident",
            Self::IncidentUpdated(_) => "incidentUpdated",
            Self::CommentCreated(_) => "newComment",
        }
    }
}
