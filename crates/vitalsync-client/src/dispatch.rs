//! Routing of inbound server events to registered callbacks.
//!
//! Each event kind has one handler slot. Registering a handler for a kind
//! replaces the previous one; clearing the slot stops delivery. Events
//! with no registered handler are dropped silently, unknown event names
//! are logged and counted.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use vitalsync_events::{
    ErrorNotice, HealthCheckResponse, QuickRecommendations, RecommendationsUpdate,
    SearchSuggestions, ServerEvent, StatusNotice,
};

use crate::metrics;

type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Dispatches each inbound event to the handler registered for its kind.
///
/// Dispatch is synchronous: the handler runs before the next event is
/// routed, so events are delivered in arrival order.
#[derive(Default)]
pub struct UpdateDispatcher {
    recommendations: RwLock<Option<Handler<RecommendationsUpdate>>>,
    quick_recommendations: RwLock<Option<Handler<QuickRecommendations>>>,
    search_suggestions: RwLock<Option<Handler<SearchSuggestions>>>,
    health_response: RwLock<Option<Handler<HealthCheckResponse>>>,
    status_notice: RwLock<Option<Handler<StatusNotice>>>,
    error_notice: RwLock<Option<Handler<ErrorNotice>>>,
}

impl UpdateDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_recommendations(&self, handler: impl Fn(RecommendationsUpdate) + Send + Sync + 'static) {
        *self.recommendations.write().unwrap() = Some(Arc::new(handler));
    }

    pub fn clear_recommendations(&self) {
        *self.recommendations.write().unwrap() = None;
    }

    pub fn on_quick_recommendations(
        &self,
        handler: impl Fn(QuickRecommendations) + Send + Sync + 'static,
    ) {
        *self.quick_recommendations.write().unwrap() = Some(Arc::new(handler));
    }

    pub fn clear_quick_recommendations(&self) {
        *self.quick_recommendations.write().unwrap() = None;
    }

    pub fn on_search_suggestions(&self, handler: impl Fn(SearchSuggestions) + Send + Sync + 'static) {
        *self.search_suggestions.write().unwrap() = Some(Arc::new(handler));
    }

    pub fn clear_search_suggestions(&self) {
        *self.search_suggestions.write().unwrap() = None;
    }

    pub fn on_health_response(&self, handler: impl Fn(HealthCheckResponse) + Send + Sync + 'static) {
        *self.health_response.write().unwrap() = Some(Arc::new(handler));
    }

    pub fn clear_health_response(&self) {
        *self.health_response.write().unwrap() = None;
    }

    pub fn on_status_notice(&self, handler: impl Fn(StatusNotice) + Send + Sync + 'static) {
        *self.status_notice.write().unwrap() = Some(Arc::new(handler));
    }

    pub fn clear_status_notice(&self) {
        *self.status_notice.write().unwrap() = None;
    }

    pub fn on_error_notice(&self, handler: impl Fn(ErrorNotice) + Send + Sync + 'static) {
        *self.error_notice.write().unwrap() = Some(Arc::new(handler));
    }

    pub fn clear_error_notice(&self) {
        *self.error_notice.write().unwrap() = None;
    }

    /// Routes one event to its registered handler.
    pub fn dispatch(&self, event: ServerEvent) {
        match event {
            ServerEvent::RecommendationsUpdate(update) => {
                Self::deliver("recommendations_update", &self.recommendations, update);
            }
            ServerEvent::QuickRecommendations(update) => {
                Self::deliver("quick_recommendations", &self.quick_recommendations, update);
            }
            ServerEvent::SearchSuggestions(update) => {
                Self::deliver("search_suggestions", &self.search_suggestions, update);
            }
            ServerEvent::HealthCheckResponse(response) => {
                Self::deliver("health_response", &self.health_response, response);
            }
            ServerEvent::Status(notice) => {
                debug!(msg = %notice.msg, "Server status notice");
                Self::deliver("status", &self.status_notice, notice);
            }
            ServerEvent::Error(notice) => {
                warn!(message = %notice.message, "Server reported an error");
                Self::deliver("error", &self.error_notice, notice);
            }
            ServerEvent::Unknown { event, .. } => {
                warn!(event = %event, "Ignoring unknown server event");
                metrics::record_update_unknown();
            }
        }
    }

    fn deliver<T>(name: &'static str, slot: &RwLock<Option<Handler<T>>>, payload: T) {
        // Clone the handler out of the slot so a handler can re-register
        // without deadlocking on the lock it was called under.
        let handler = slot.read().unwrap().clone();
        match handler {
            Some(handler) => handler(payload),
            None => debug!(event = name, "No handler registered, dropping event"),
        }
    }
}

impl std::fmt::Debug for UpdateDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateDispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use vitalsync_events::Envelope;

    use super::*;

    fn update_with_title(title: &str) -> ServerEvent {
        ServerEvent::from_envelope(Envelope::new(
            "recommendations_update",
            json!({
                "ai_recommendations": [{ "title": title }],
                "timestamp": "2025-06-01T00:00:00.000Z",
            }),
        ))
        .unwrap()
    }

    #[test]
    fn test_dispatch_routes_to_registered_handler() {
        let dispatcher = UpdateDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        dispatcher.on_recommendations(move |update| {
            sink.lock().unwrap().push(update.ai_recommendations[0].title.clone());
        });

        dispatcher.dispatch(update_with_title("Sleep more"));
        assert_eq!(*seen.lock().unwrap(), vec!["Sleep more".to_string()]);
    }

    #[test]
    fn test_dispatch_preserves_order() {
        let dispatcher = UpdateDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        dispatcher.on_recommendations(move |update| {
            sink.lock().unwrap().push(update.ai_recommendations[0].title.clone());
        });

        dispatcher.dispatch(update_with_title("first"));
        dispatcher.dispatch(update_with_title("second"));
        dispatcher.dispatch(update_with_title("third"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["first".to_string(), "second".to_string(), "third".to_string()]
        );
    }

    #[test]
    fn test_cleared_handler_is_not_invoked() {
        let dispatcher = UpdateDispatcher::new();
        let seen = Arc::new(Mutex::new(0_u32));

        let sink = Arc::clone(&seen);
        dispatcher.on_recommendations(move |_| *sink.lock().unwrap() += 1);
        dispatcher.dispatch(update_with_title("one"));
        assert_eq!(*seen.lock().unwrap(), 1);

        dispatcher.clear_recommendations();
        dispatcher.dispatch(update_with_title("two"));
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_reregistering_replaces_handler() {
        let dispatcher = UpdateDispatcher::new();
        let first = Arc::new(Mutex::new(0_u32));
        let second = Arc::new(Mutex::new(0_u32));

        let sink = Arc::clone(&first);
        dispatcher.on_recommendations(move |_| *sink.lock().unwrap() += 1);
        let sink = Arc::clone(&second);
        dispatcher.on_recommendations(move |_| *sink.lock().unwrap() += 1);

        dispatcher.dispatch(update_with_title("x"));
        assert_eq!(*first.lock().unwrap(), 0);
        assert_eq!(*second.lock().unwrap(), 1);
    }

    #[test]
    fn test_unknown_event_invokes_nothing() {
        let dispatcher = UpdateDispatcher::new();
        let seen = Arc::new(Mutex::new(0_u32));

        let sink = Arc::clone(&seen);
        dispatcher.on_recommendations(move |_| *sink.lock().unwrap() += 1);

        let event =
            ServerEvent::from_envelope(Envelope::new("mystery", json!({"x": 1}))).unwrap();
        dispatcher.dispatch(event);
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_missing_handler_drops_silently() {
        let dispatcher = UpdateDispatcher::new();
        dispatcher.dispatch(update_with_title("nobody listening"));
    }

    #[test]
    fn test_handler_can_reregister_during_dispatch() {
        let dispatcher = Arc::new(UpdateDispatcher::new());
        let seen = Arc::new(Mutex::new(0_u32));

        let inner = Arc::clone(&dispatcher);
        let sink = Arc::clone(&seen);
        dispatcher.on_recommendations(move |_| {
            *sink.lock().unwrap() += 1;
            inner.clear_recommendations();
        });

        dispatcher.dispatch(update_with_title("first"));
        dispatcher.dispatch(update_with_title("second"));
        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
