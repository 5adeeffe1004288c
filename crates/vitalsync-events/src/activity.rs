//! Activity telemetry records.
//!
//! An [`ActivityRecord`] describes one user interaction. Records are
//! immutable once built and are sent fire-and-forget: never buffered,
//! never retried. Extra metadata is flattened into the wire object so
//! the server sees per-kind fields (`duration`, `form_id`, ...) at the
//! top level.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed activity classification tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Primary action pressed.
    Click,
    /// Navigation into a content item.
    ContentClick,
    /// Bookmark toggled.
    Bookmark,
    /// Share toggled.
    Share,
    /// Content item viewed past the visibility threshold.
    View,
    /// Form submitted.
    FormSubmit,
    /// Realtime session established.
    WebsocketConnect,
}

impl ActivityKind {
    /// Wire tag for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Click => "click",
            ActivityKind::ContentClick => "content_click",
            ActivityKind::Bookmark => "bookmark",
            ActivityKind::Share => "share",
            ActivityKind::View => "view",
            ActivityKind::FormSubmit => "form_submit",
            ActivityKind::WebsocketConnect => "websocket_connect",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single telemetry event describing a user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Classification tag.
    #[serde(rename = "type")]
    pub kind: ActivityKind,

    /// Content item the interaction refers to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<i64>,

    /// Per-kind extras, flattened into the wire object.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, Value>,

    /// ISO-8601 timestamp of the interaction.
    pub timestamp: String,
}

impl ActivityRecord {
    /// Create a record for `kind`, stamped with the current time.
    #[must_use]
    pub fn new(kind: ActivityKind) -> Self {
        Self {
            kind,
            content_id: None,
            metadata: serde_json::Map::new(),
            timestamp: now_timestamp(),
        }
    }

    /// Attach a content identifier.
    #[must_use]
    pub fn with_content_id(mut self, content_id: i64) -> Self {
        self.content_id = Some(content_id);
        self
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Override the timestamp (tests and replayed records).
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
#[must_use]
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
