//! UseCase layer

pub mod connect_connection;
pub mod disconnect_connection;
pub mod error;
pub mod get_incidents;
pub mod get_presence;
mod notify;
pub mod post_comment;
pub mod report_incident;
pub mod update_location;
pub mod upvote_incident;

pub use connect_connection::ConnectConnectionUseCase;
pub use disconnect_connection::DisconnectConnectionUseCase;
pub use error::{
    ConnectError, DisconnectError, GetIncidentError, PostCommentError, ReportIncidentError,
    UpdateLocationError, UpvoteIncidentError,
};
pub use get_incidents::GetIncidentsUseCase;
pub use get_presence::GetPresenceUseCase;
pub use post_comment::PostCommentUseCase;
pub use report_incident::ReportIncidentUseCase;
pub use update_location::UpdateLocationUseCase;
pub use upvote_incident::UpvoteIncidentUseCase;
