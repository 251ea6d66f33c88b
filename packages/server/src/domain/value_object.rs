//! Value Object 定義
//!
//! ドメイン層で使う不変の値。生成時にバリデーションを行い、
//! 不正な値はドメインに入らないようにします。

use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of an incident identifier
pub const MAX_INCIDENT_ID_LENGTH: usize = 128;
/// Maximum length of a user identifier (reporter / comment author)
pub const MAX_USER_ID_LENGTH: usize = 128;
/// Maximum length of an incident description
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
/// Maximum length of a comment body
pub const MAX_COMMENT_BODY_LENGTH: usize = 1000;

fn require_bounded(
    field: &'static str,
    value: &str,
    max_length: usize,
) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    let length = value.chars().count();
    if length > max_length {
        return Err(ValueObjectError::TooLong {
            field,
            max: max_length,
            actual: length,
        });
    }
    Ok(())
}

/// Identifier of a live WebSocket connection.
///
/// Assigned by the server on accept. A reconnecting client always gets a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::Empty("connection_id"));
        }
        Ok(Self(value))
    }

    /// Generate a fresh random connection id (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated geographic position (WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValueObjectError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ValueObjectError::OutOfRange {
                field: "latitude",
                value: latitude,
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValueObjectError::OutOfRange {
                field: "longitude",
                value: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Identifier of an incident report.
///
/// Clients may choose their own (the web client does), otherwise the server
/// generates a UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncidentId(String);

impl IncidentId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_bounded("incident_id", &value, MAX_INCIDENT_ID_LENGTH)?;
        Ok(Self(value))
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for IncidentId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a comment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentId(String);

impl CommentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Identifier of a reporting user or comment author
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_bounded("user_id", &value, MAX_USER_ID_LENGTH)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-text description attached to an incident
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_bounded("description", &value, MAX_DESCRIPTION_LENGTH)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Body of a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        require_bounded("body", &value, MAX_COMMENT_BODY_LENGTH)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Reporter-assessed severity of an incident.
///
/// Arrives as a JSON number; only whole numbers from 0 to 255 are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Severity(u8);

impl Severity {
    pub fn new(value: f64) -> Result<Self, ValueObjectError> {
        if !value.is_finite() || value.fract() != 0.0 || !(0.0..=255.0).contains(&value) {
            return Err(ValueObjectError::OutOfRange {
                field: "severity",
                value,
            });
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}
