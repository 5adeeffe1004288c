//! Events emitted by the client.

use serde_json::json;

use crate::activity::{now_timestamp, ActivityRecord};
use crate::envelope::{Envelope, EnvelopeError};
use crate::names;

/// An event the client sends to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Fire-and-forget activity telemetry.
    TrackActivity(ActivityRecord),

    /// Ask the server to recompute and push recommendations.
    RequestRecommendations {
        /// Request time, ISO-8601.
        timestamp: String,
    },

    /// Ask for typeahead suggestions for a partial query.
    SearchSuggestions {
        /// Partial query text, already trimmed.
        query: String,
    },

    /// Liveness probe; the server answers with `health_response`.
    HealthCheck,
}

impl ClientEvent {
    /// Create a new TrackActivity event.
    #[must_use]
    pub fn track_activity(record: ActivityRecord) -> Self {
        ClientEvent::TrackActivity(record)
    }

    /// Create a new RequestRecommendations event stamped with the current time.
    #[must_use]
    pub fn request_recommendations() -> Self {
        ClientEvent::RequestRecommendations {
            timestamp: now_timestamp(),
        }
    }

    /// Create a new SearchSuggestions request.
    #[must_use]
    pub fn search_suggestions(query: impl Into<String>) -> Self {
        ClientEvent::SearchSuggestions {
            query: query.into(),
        }
    }

    /// Create a new HealthCheck probe.
    #[must_use]
    pub fn health_check() -> Self {
        ClientEvent::HealthCheck
    }

    /// Wire event name for this event.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientEvent::TrackActivity(_) => names::TRACK_ACTIVITY,
            ClientEvent::RequestRecommendations { .. } => names::REQUEST_RECOMMENDATIONS,
            ClientEvent::SearchSuggestions { .. } => names::SEARCH_SUGGESTIONS,
            ClientEvent::HealthCheck => names::HEALTH_CHECK,
        }
    }

    /// Convert into a wire envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if payload serialization fails.
    pub fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        let envelope = match self {
            ClientEvent::TrackActivity(record) => {
                Envelope::new(names::TRACK_ACTIVITY, serde_json::to_value(record)?)
            }
            ClientEvent::RequestRecommendations { timestamp } => Envelope::new(
                names::REQUEST_RECOMMENDATIONS,
                json!({ "timestamp": timestamp }),
            ),
            ClientEvent::SearchSuggestions { query } => {
                Envelope::new(names::SEARCH_SUGGESTIONS, json!({ "query": query }))
            }
            ClientEvent::HealthCheck => Envelope::bare(names::HEALTH_CHECK),
        };
        Ok(envelope)
    }
}
