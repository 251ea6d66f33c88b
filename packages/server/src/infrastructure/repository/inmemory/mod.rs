mod incident;
mod presence;

pub use incident::InMemoryIncidentGateway;
pub use presence::InMemoryPresenceStore;
