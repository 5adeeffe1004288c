//! Events pushed by the server.
//!
//! Payload shapes mirror what the server actually emits. Unrecognized
//! event names map to [`ServerEvent::Unknown`] so a newer server never
//! breaks an older client; a known name with a payload that fails typed
//! decoding is an error the consumer logs and drops.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{Envelope, EnvelopeError};
use crate::names;

/// An AI-generated recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRecommendation {
    /// Short recommendation title.
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Priority label: `low`, `medium`, or `high`.
    #[serde(default)]
    pub priority: String,
    /// Model confidence in [0, 1], when provided.
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A recommended content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecommendation {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub content_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    /// Duration in minutes, when the content has one.
    #[serde(default)]
    pub duration: Option<i64>,
}

/// Full recommendations refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecommendationsUpdate {
    #[serde(default)]
    pub ai_recommendations: Vec<AiRecommendation>,
    #[serde(default)]
    pub content_recommendations: Vec<ContentRecommendation>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A short recommendation entry pushed after significant activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickRecommendation {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub content_type: String,
}

/// Short recommendation list pushed after significant activity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuickRecommendations {
    #[serde(default)]
    pub recommendations: Vec<QuickRecommendation>,
}

/// A single typeahead suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSuggestion {
    /// Suggested text.
    pub text: String,
    /// Suggestion source: `content` or `category`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Category of the suggested content, when the source is content.
    #[serde(default)]
    pub category: Option<String>,
}

/// Typeahead suggestions for the last submitted query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchSuggestions {
    #[serde(default)]
    pub suggestions: Vec<SearchSuggestion>,
}

/// Liveness probe response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Informational server notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusNotice {
    pub msg: String,
}

/// Server-reported error notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
}

/// A server-pushed update delivered over the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Full recommendations refresh.
    RecommendationsUpdate(RecommendationsUpdate),
    /// Short recommendation list.
    QuickRecommendations(QuickRecommendations),
    /// Typeahead suggestions.
    SearchSuggestions(SearchSuggestions),
    /// Liveness probe response.
    HealthCheckResponse(HealthCheckResponse),
    /// Informational notice.
    Status(StatusNotice),
    /// Server-reported error.
    Error(ErrorNotice),
    /// Event name not recognized by this client version.
    Unknown {
        /// Raw event name.
        event: String,
        /// Raw payload.
        data: Value,
    },
}

impl ServerEvent {
    /// Parse a decoded envelope into a typed event.
    ///
    /// # Errors
    ///
    /// Returns an error when the event name is known but the payload does
    /// not match its expected shape.
    pub fn from_envelope(envelope: Envelope) -> Result<Self, EnvelopeError> {
        let Envelope { event, data } = envelope;

        let parsed = match event.as_str() {
            names::RECOMMENDATIONS_UPDATE => {
                ServerEvent::RecommendationsUpdate(serde_json::from_value(data)?)
            }
            names::QUICK_RECOMMENDATIONS => {
                ServerEvent::QuickRecommendations(serde_json::from_value(data)?)
            }
            names::SEARCH_SUGGESTIONS => {
                ServerEvent::SearchSuggestions(serde_json::from_value(data)?)
            }
            names::HEALTH_RESPONSE => {
                ServerEvent::HealthCheckResponse(serde_json::from_value(data)?)
            }
            names::STATUS => ServerEvent::Status(serde_json::from_value(data)?),
            names::ERROR => ServerEvent::Error(serde_json::from_value(data)?),
            _ => ServerEvent::Unknown { event, data },
        };

        Ok(parsed)
    }

    /// Wire event name for this event.
    #[must_use]
    pub fn event_name(&self) -> &str {
        match self {
            ServerEvent::RecommendationsUpdate(_) => names::RECOMMENDATIONS_UPDATE,
            ServerEvent::QuickRecommendations(_) => names::QUICK_RECOMMENDATIONS,
            ServerEvent::SearchSuggestions(_) => names::SEARCH_SUGGESTIONS,
            ServerEvent::HealthCheckResponse(_) => names::HEALTH_RESPONSE,
            ServerEvent::Status(_) => names::STATUS,
            ServerEvent::Error(_) => names::ERROR,
            ServerEvent::Unknown { event, .. } => event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_recommendations_update() {
        let envelope = Envelope::new(
            "recommendations_update",
            json!({
                "ai_recommendations": [
                    {"title": "Sleep earlier", "description": "Aim for 8 hours", "category": "lifestyle", "priority": "high", "confidence": 0.9}
                ],
                "content_recommendations": [
                    {"id": 3, "title": "Beginner yoga", "category": "fitness", "content_type": "video", "description": "A short routine", "difficulty_level": "beginner", "duration": 20}
                ],
                "timestamp": "2024-05-01T12:00:00.000Z"
            }),
        );

        let event = ServerEvent::from_envelope(envelope).unwrap();
        match event {
            ServerEvent::RecommendationsUpdate(update) => {
                assert_eq!(update.ai_recommendations.len(), 1);
                assert_eq!(update.ai_recommendations[0].priority, "high");
                assert_eq!(update.content_recommendations[0].id, 3);
                assert_eq!(update.content_recommendations[0].duration, Some(20));
            }
            other => panic!("Expected RecommendationsUpdate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_with_absent_lists() {
        let envelope = Envelope::new("recommendations_update", json!({}));
        let event = ServerEvent::from_envelope(envelope).unwrap();
        match event {
            ServerEvent::RecommendationsUpdate(update) => {
                assert!(update.ai_recommendations.is_empty());
                assert!(update.content_recommendations.is_empty());
                assert!(update.timestamp.is_none());
            }
            other => panic!("Expected RecommendationsUpdate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_quick_recommendations() {
        let envelope = Envelope::new(
            "quick_recommendations",
            json!({
                "recommendations": [
                    {"id": 1, "title": "Hydration basics", "category": "nutrition", "content_type": "article"}
                ]
            }),
        );

        let event = ServerEvent::from_envelope(envelope).unwrap();
        match event {
            ServerEvent::QuickRecommendations(quick) => {
                assert_eq!(quick.recommendations.len(), 1);
                assert_eq!(quick.recommendations[0].category, "nutrition");
            }
            other => panic!("Expected QuickRecommendations, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_suggestions() {
        let envelope = Envelope::new(
            "search_suggestions",
            json!({
                "suggestions": [
                    {"text": "Sleep hygiene", "type": "content", "category": "lifestyle"},
                    {"text": "mental_health", "type": "category"}
                ]
            }),
        );

        let event = ServerEvent::from_envelope(envelope).unwrap();
        match event {
            ServerEvent::SearchSuggestions(result) => {
                assert_eq!(result.suggestions.len(), 2);
                assert_eq!(result.suggestions[0].kind, "content");
                assert_eq!(result.suggestions[1].category, None);
            }
            other => panic!("Expected SearchSuggestions, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_notices() {
        let status = ServerEvent::from_envelope(Envelope::new(
            "status",
            json!({"msg": "Connected to realtime updates"}),
        ))
        .unwrap();
        assert_eq!(status.event_name(), "status");

        let error = ServerEvent::from_envelope(Envelope::new(
            "error",
            json!({"message": "Failed to process activity"}),
        ))
        .unwrap();
        match error {
            ServerEvent::Error(notice) => assert_eq!(notice.message, "Failed to process activity"),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_is_not_an_error() {
        let envelope = Envelope::new("made_up_event", json!({"anything": true}));
        let event = ServerEvent::from_envelope(envelope).unwrap();
        match event {
            ServerEvent::Unknown { event, data } => {
                assert_eq!(event, "made_up_event");
                assert_eq!(data["anything"], true);
            }
            other => panic!("Expected Unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_known_event_with_malformed_payload_is_an_error() {
        // health_response requires a status field
        let envelope = Envelope::new("health_response", json!({"timestamp": "t"}));
        assert!(ServerEvent::from_envelope(envelope).is_err());

        // suggestions entries require text
        let envelope = Envelope::new(
            "search_suggestions",
            json!({"suggestions": [{"type": "content"}]}),
        );
        assert!(ServerEvent::from_envelope(envelope).is_err());
    }
}
