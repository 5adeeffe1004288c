//! Wire event names.
//!
//! The server matches on these strings exactly; they are part of the
//! protocol and must not be changed independently of it. Note that
//! `search_suggestions` is used in both directions: the client emits it
//! as a request and the server pushes the result under the same name.

/// Outbound: fire-and-forget activity telemetry.
pub const TRACK_ACTIVITY: &str = "track_activity";

/// Outbound: ask the server to recompute and push recommendations.
pub const REQUEST_RECOMMENDATIONS: &str = "request_recommendations";

/// Outbound request and inbound response: typeahead suggestions.
pub const SEARCH_SUGGESTIONS: &str = "search_suggestions";

/// Outbound: liveness probe.
pub const HEALTH_CHECK: &str = "health_check";

/// Inbound: full recommendations refresh.
pub const RECOMMENDATIONS_UPDATE: &str = "recommendations_update";

/// Inbound: short recommendation list pushed after significant activity.
pub const QUICK_RECOMMENDATIONS: &str = "quick_recommendations";

/// Inbound: liveness probe response.
pub const HEALTH_RESPONSE: &str = "health_response";

/// Inbound: informational server notice.
pub const STATUS: &str = "status";

/// Inbound: server-reported error notice.
pub const ERROR: &str = "error";
