//! # vitalsync-events
//!
//! Wire event definitions for the VitalSync realtime client.
//!
//! The VitalSync server speaks a named-event protocol: every message is a
//! JSON envelope carrying an event name and a payload object. This crate
//! defines the envelope codec, the outbound client events, the inbound
//! server events, and the activity telemetry records that ride on them.
//!
//! ## Event model
//!
//! - `ClientEvent` - events emitted by the client (`track_activity`,
//!   `request_recommendations`, `search_suggestions`, `health_check`)
//! - `ServerEvent` - server pushes (`recommendations_update`,
//!   `quick_recommendations`, `search_suggestions`, `health_response`,
//!   plus `status`/`error` notices)
//!
//! ## Example
//!
//! ```rust
//! use vitalsync_events::{envelope, ClientEvent, ServerEvent};
//!
//! // Encode an outbound probe
//! let env = ClientEvent::health_check().into_envelope().unwrap();
//! let text = envelope::encode(&env).unwrap();
//!
//! // Decode an inbound push
//! let env = envelope::decode(r#"{"event":"health_response","data":{"status":"healthy"}}"#).unwrap();
//! let event = ServerEvent::from_envelope(env).unwrap();
//! assert_eq!(event.event_name(), "health_response");
//! ```

pub mod activity;
pub mod envelope;
pub mod inbound;
pub mod names;
pub mod outbound;

pub use activity::{now_timestamp, ActivityKind, ActivityRecord};
pub use envelope::{decode, encode, Envelope, EnvelopeError};
pub use inbound::{
    AiRecommendation, ContentRecommendation, ErrorNotice, HealthCheckResponse,
    QuickRecommendation, QuickRecommendations, RecommendationsUpdate, SearchSuggestion,
    SearchSuggestions, ServerEvent, StatusNotice,
};
pub use outbound::ClientEvent;
