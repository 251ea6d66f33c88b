//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Frames sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    UpdateLocation(LocationPayload),
}

/// Payload of `updateLocation`
///
/// Unknown fields are ignored. Missing or non-numeric coordinates fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationPayload {
    pub latitude: f64,
    pub longitude: f64,
}

/// Frames sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Another connection moved
    LocationUpdate(PeerLocationDto),
    /// Presence snapshot, keyed by connection id
    CurrentUsers(BTreeMap<String, PeerLocationDto>),
    /// Id of the connection that left
    UserDisconnected(String),
    NewIncident(IncidentDto),
    IncidentUpdated(IncidentDto),
    NewComment(CommentDto),
}

/// Position of one connection as seen by its peers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerLocationDto {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
    pub timestamp: DateTime<Utc>,
    pub verified: bool,
    pub reporter_id: String,
    pub upvotes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: String,
    pub incident_id: String,
    pub body: String,
    pub author_id: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_location() {
        // テスト項目: updateLocation フレームがパースできる
        // given (前提条件):
        let text = r#"{"event":"updateLocation","data":{"latitude":1.5,"longitude":-2.25}}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::UpdateLocation(LocationPayload {
                latitude: 1.5,
                longitude: -2.25,
            })
        );
    }

    #[test]
    fn test_parse_update_location_ignores_extra_fields() {
        // テスト項目: 余分なフィールドがあっても無視してパースできる
        // given (前提条件):
        let text = r#"{"event":"updateLocation","data":{"latitude":1,"longitude":2,"id":"spoofed","accuracy":10}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(text);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_update_location_rejects_non_numeric_latitude() {
        // テスト項目: 数値でない緯度はパースエラー
        // given (前提条件):
        let text = r#"{"event":"updateLocation","data":{"latitude":"north","longitude":2}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_update_location_rejects_missing_longitude() {
        // テスト項目: 経度が欠けているとパースエラー
        // given (前提条件):
        let text = r#"{"event":"updateLocation","data":{"latitude":1}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_unknown_event_is_rejected() {
        // テスト項目: 未知のイベント名はパースエラー
        // given (前提条件):
        let text = r#"{"event":"sos","data":{}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_user_disconnected_serializes_bare_id() {
        // テスト項目: userDisconnected のペイロードは接続 ID の文字列そのもの
        // given (前提条件):
        let event = ServerEvent::UserDisconnected("abc".to_string());

        // when (操作):
        let json = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"event": "userDisconnected", "data": "abc"})
        );
    }

    #[test]
    fn test_incident_uses_camel_case_and_type_key() {
        // テスト項目: Incident は camelCase のキーと "type" キーで出力される
        // given (前提条件):
        let dto = IncidentDto {
            id: "inc-1".to_string(),
            kind: "theft".to_string(),
            latitude: 1.0,
            longitude: 2.0,
            description: "Phone snatched".to_string(),
            address: None,
            severity: None,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            verified: false,
            reporter_id: "user-1".to_string(),
            upvotes: 0,
        };

        // when (操作):
        let json = serde_json::to_value(ServerEvent::NewIncident(dto)).unwrap();

        // then (期待する結果):
        assert_eq!(json["event"], "newIncident");
        assert_eq!(json["data"]["type"], "theft");
        assert_eq!(json["data"]["reporterId"], "user-1");
        assert!(json["data"].get("address").is_none());
        assert_eq!(json["data"]["timestamp"], "1970-01-01T00:00:00Z");
    }
}
