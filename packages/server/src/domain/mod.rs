//! Domain layer: value objects, entities, relay events and the interfaces
//! (`PresenceStore`, `IncidentGateway`, `MessagePusher`) the use cases depend on.

pub mod entity;
pub mod error;
pub mod event;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    Comment, Incident, IncidentDraft, IncidentKind, PresenceRecord, VERIFICATION_THRESHOLD,
};
pub use error::{GatewayError, MessagePushError, ValueObjectError};
pub use event::RelayEvent;
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::{IncidentGateway, PresenceStore};
pub use value_object::{
    CommentBody, CommentId, ConnectionId, Coordinates, Description, IncidentId, Severity, UserId,
};

#[cfg(test)]
pub use pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::MockIncidentGateway;
