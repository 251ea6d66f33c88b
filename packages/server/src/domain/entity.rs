//! Entity 定義
//!
//! - `PresenceRecord`: 接続ごとの最新位置（メモリ上のみ）
//! - `Incident`: 通報された事案（Incident Gateway が所有）
//! - `Comment`: 事案へのコメント

use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{
    error::ValueObjectError,
    value_object::{
        CommentBody, CommentId, ConnectionId, Coordinates, Description, IncidentId, Severity,
        UserId,
    },
};

/// Upvote count at which an incident becomes verified
pub const VERIFICATION_THRESHOLD: u32 = 5;

/// Last-known location of one live connection
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceRecord {
    pub connection_id: ConnectionId,
    pub coordinates: Coordinates,
    pub last_updated: DateTime<Utc>,
}

/// Category of an incident report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentKind {
    Theft,
    Assault,
    Harassment,
    Accident,
    Suspicious,
    Other,
}

impl IncidentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Theft => "theft",
            Self::Assault => "assault",
            Self::Harassment => "harassment",
            Self::Accident => "accident",
            Self::Suspicious => "suspicious",
            Self::Other => "other",
        }
    }
}

impl FromStr for IncidentKind {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "theft" => Ok(Self::Theft),
            "assault" => Ok(Self::Assault),
            "harassment" => Ok(Self::Harassment),
            "accident" => Ok(Self::Accident),
            "suspicious" => Ok(Self::Suspicious),
            "other" => Ok(Self::Other),
            unknown => Err(ValueObjectError::UnknownIncidentKind(unknown.to_string())),
        }
    }
}

/// A reported safety incident
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub id: IncidentId,
    pub kind: IncidentKind,
    pub coordinates: Coordinates,
    pub description: Description,
    pub address: Option<String>,
    pub severity: Option<Severity>,
    pub timestamp: DateTime<Utc>,
    pub verified: bool,
    pub reporter_id: UserId,
    pub upvotes: u32,
}

impl Incident {
    /// Create a freshly reported, unverified incident with no upvotes
    #[allow(clippy::too_many_arguments)]
    pub fn report(
        id: IncidentId,
        kind: IncidentKind,
        coordinates: Coordinates,
        description: Description,
        address: Option<String>,
        severity: Option<Severity>,
        reporter_id: UserId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            coordinates,
            description,
            address,
            severity,
            timestamp,
            verified: false,
            reporter_id,
            upvotes: 0,
        }
    }

    /// Count one upvote.
    ///
    /// Reaching [`VERIFICATION_THRESHOLD`] marks the incident verified in the
    /// same step, so callers never observe the threshold count unverified.
    /// Verification is never revoked.
    pub fn register_upvote(&mut self) {
        self.upvotes = self.upvotes.saturating_add(1);
        if self.upvotes >= VERIFICATION_THRESHOLD {
            self.verified = true;
        }
    }
}

/// Client-supplied part of a new incident report.
///
/// The server fills in the timestamp, verification state and upvotes.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentDraft {
    pub id: Option<IncidentId>,
    pub kind: IncidentKind,
    pub coordinates: Coordinates,
    pub description: Description,
    pub address: Option<String>,
    pub severity: Option<Severity>,
    pub reporter_id: UserId,
}

impl IncidentDraft {
    /// Turn the draft into a stored incident reported at `timestamp`
    pub fn into_incident(self, timestamp: DateTime<Utc>) -> Incident {
        Incident::report(
            self.id.unwrap_or_else(IncidentId::generate),
            self.kind,
            self.coordinates,
            self.description,
            self.address,
            self.severity,
            self.reporter_id,
            timestamp,
        )
    }
}

/// A comment posted on an incident
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub incident_id: IncidentId,
    pub body: CommentBody,
    pub author_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        incident_id: IncidentId,
        body: CommentBody,
        author_id: UserId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CommentId::generate(),
            incident_id,
            body,
            author_id,
            timestamp,
        }
    }
}
