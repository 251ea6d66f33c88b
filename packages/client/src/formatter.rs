//! Event formatting utilities for client display.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use crowdguard_server::infrastructure::dto::websocket::{
    CommentDto, IncidentDto, PeerLocationDto, ServerEvent,
};
use crowdguard_shared::time::format_local_time;

const RULE: &str = "============================================================";

/// Event formatter for client display
pub struct EventFormatter;

impl EventFormatter {
    /// Format any server event
    pub fn format_event(event: &ServerEvent) -> String {
        match event {
            ServerEvent::CurrentUsers(users) => Self::format_current_users(users),
            ServerEvent::LocationUpdate(peer) => Self::format_location_update(peer),
            ServerEvent::UserDisconnected(id) => Self::format_user_disconnected(id),
            ServerEvent::NewIncident(incident) => Self::format_incident("New incident", incident),
            ServerEvent::IncidentUpdated(incident) => {
                Self::format_incident("Incident updated", incident)
            }
            ServerEvent::NewComment(comment) => Self::format_comment(comment),
        }
    }

    /// Format the presence snapshot received right after connecting
    ///
    /// # Arguments
    ///
    /// * `users` - Last-known location of every peer, keyed by connection id
    ///
    /// # Returns
    ///
    /// A formatted string listing every peer
    pub fn format_current_users(users: &BTreeMap<String, PeerLocationDto>) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str("People nearby:\n");

        if users.is_empty() {
            output.push_str("(Nobody has shared a location yet)\n");
        } else {
            for peer in users.values() {
                output.push_str(&format!(
                    "{} at ({:.5}, {:.5})\n",
                    peer.id, peer.latitude, peer.longitude
                ));
            }
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    pub fn format_location_update(peer: &PeerLocationDto) -> String {
        format!(
            "\n> {} moved to ({:.5}, {:.5})\n",
            peer.id, peer.latitude, peer.longitude
        )
    }

    pub fn format_user_disconnected(id: &str) -> String {
        format!("\n- {} left\n", id)
    }

    /// Format an incident record
    ///
    /// # Arguments
    ///
    /// * `label` - Headline ("New incident" or "Incident updated")
    /// * `incident` - The full incident record
    pub fn format_incident(label: &str, incident: &IncidentDto) -> String {
        let verified = if incident.verified { " [verified]" } else { "" };
        let mut output = format!(
            "\n\n{}\n{}: {} ({}){}\n{}\n",
            RULE, label, incident.id, incident.kind, verified, incident.description
        );
        if let Some(address) = &incident.address {
            output.push_str(&format!("at {}\n", address));
        }
        output.push_str(&format!(
            "({:.5}, {:.5}) reported at {} by {}, {} upvotes\n{}\n",
            incident.latitude,
            incident.longitude,
            format_local_time(incident.timestamp),
            incident.reporter_id,
            incident.upvotes,
            RULE
        ));
        output
    }

    pub fn format_comment(comment: &CommentDto) -> String {
        format!(
            "\n@{} on {}: {}\nposted at {}\n",
            comment.author_id,
            comment.incident_id,
            comment.body,
            format_local_time(comment.timestamp)
        )
    }

    /// Format a confirmation after a location was sent
    pub fn format_sent_confirmation(
        latitude: f64,
        longitude: f64,
        sent_at: DateTime<Utc>,
    ) -> String {
        format!(
            "location ({:.5}, {:.5}) sent at {}\n",
            latitude,
            longitude,
            format_local_time(sent_at)
        )
    }

    /// Format a raw text frame (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    pub fn format_help() -> String {
        "\nCommands:\n  loc <latitude> <longitude>  share your location\n  help                        show this help\n"
            .to_string()
    }
}
