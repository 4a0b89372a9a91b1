use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of social event a notification reports.
///
/// The wire set is closed but extensible: a value this build does not know
/// deserializes to [`NotificationKind::Unknown`] instead of failing the
/// payload, and the display layer falls back to the server-rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Message,
    #[serde(other)]
    Unknown,
}

/// A single server-generated notification targeting the current user.
/// Immutable once created; only the read flag changes, and only through the
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    /// Server-rendered display text ("New message from Fern Dale", ...)
    pub content: String,
    pub sender_name: String,
    pub sender_handle: String,
    /// Possibly-relative avatar reference; resolve via [`crate::avatar`]
    #[serde(default)]
    pub sender_avatar_ref: Option<String>,
    /// Subject of the event (post id, chat room id, ...); semantics depend on `kind`
    pub related_id: String,
    #[serde(rename = "read", default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Parse a push payload. Unknown fields are ignored for forward
    /// compatibility; a payload missing a required field is an error the
    /// caller logs and drops.
    pub fn from_payload(payload: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(payload)
    }
}
