//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    Comment, Coordinates, Description, Incident, IncidentDraft, IncidentId, IncidentKind,
    PresenceRecord, RelayEvent, Severity, UserId, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<dto::LocationPayload> for Coordinates {
    type Error = ValueObjectError;

    fn try_from(payload: dto::LocationPayload) -> Result<Self, Self::Error> {
        Coordinates::new(payload.latitude, payload.longitude)
    }
}

impl TryFrom<http::CreateIncidentRequest> for IncidentDraft {
    type Error = ValueObjectError;

    fn try_from(request: http::CreateIncidentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            id: request.id.map(IncidentId::new).transpose()?,
            kind: request.kind.parse::<IncidentKind>()?,
            coordinates: Coordinates::new(request.latitude, request.longitude)?,
            description: Description::new(request.description)?,
            address: request
                .address
                .map(|address| address.trim().to_string())
                .filter(|address| !address.is_empty()),
            severity: request.severity.map(Severity::new).transpose()?,
            reporter_id: UserId::new(request.reporter_id)?,
        })
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&PresenceRecord> for dto::PeerLocationDto {
    fn from(record: &PresenceRecord) -> Self {
        Self {
            id: record.connection_id.as_str().to_string(),
            latitude: record.coordinates.latitude(),
            longitude: record.coordinates.longitude(),
        }
    }
}

impl From<&PresenceRecord> for http::PresenceDetailDto {
    fn from(record: &PresenceRecord) -> Self {
        Self {
            id: record.connection_id.as_str().to_string(),
            latitude: record.coordinates.latitude(),
            longitude: record.coordinates.longitude(),
            last_updated: record.last_updated,
        }
    }
}

impl From<&Incident> for dto::IncidentDto {
    fn from(incident: &Incident) -> Self {
        Self {
            id: incident.id.as_str().to_string(),
            kind: incident.kind.as_str().to_string(),
            latitude: incident.coordinates.latitude(),
            longitude: incident.coordinates.longitude(),
            description: incident.description.as_str().to_string(),
            address: incident.address.clone(),
            severity: incident.severity.map(|severity| severity.value()),
            timestamp: incident.timestamp,
            verified: incident.verified,
            reporter_id: incident.reporter_id.as_str().to_string(),
            upvotes: incident.upvotes,
        }
    }
}

impl From<&Comment> for dto::CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.as_str().to_string(),
            incident_id: comment.incident_id.as_str().to_string(),
            body: comment.body.as_str().to_string(),
            author_id: comment.author_id.as_str().to_string(),
            timestamp: comment.timestamp,
        }
    }
}

impl From<&RelayEvent> for dto::ServerEvent {
    fn from(event: &RelayEvent) -> Self {
        match event {
            RelayEvent::LocationUpdated {
                connection_id,
                coordinates,
            } => Self::LocationUpdate(dto::PeerLocationDto {
                id: connection_id.as_str().to_string(),
                latitude: coordinates.latitude(),
                longitude: coordinates.longitude(),
            }),
            RelayEvent::PresenceSnapshot(records) => Self::CurrentUsers(
                records
                    .iter()
                    .map(|record| {
                        (
                            record.connection_id.as_str().to_string(),
                            dto::PeerLocationDto::from(record),
                        )
                    })
                    .collect(),
            ),
            RelayEvent::UserDisconnected(connection_id) => {
                Self::UserDisconnected(connection_id.as_str().to_string())
            }
            RelayEvent::IncidentCreated(incident) => Self::NewIncident(incident.into()),
            RelayEvent::IncidentUpdated(incident) => Self::IncidentUpdated(incident.into()),
            RelayEvent::CommentCreated(comment) => Self::NewComment(comment.into()),
        }
    }
}
