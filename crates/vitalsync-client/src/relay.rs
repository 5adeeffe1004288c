//! Relaying of user interactions to the server as activity records.
//!
//! Interactions are classified from structural markers supplied by the
//! embedding application, never from display text, so relabelled buttons
//! keep producing the same activity kinds. Records are sent only while a
//! session is up; anything recorded while disconnected is dropped
//! silently.

use tracing::debug;

use vitalsync_events::{ActivityKind, ActivityRecord, ClientEvent};

use crate::client::Client;
use crate::metrics;

/// Structural markers describing where an interaction came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionMarkers {
    /// The element is a primary action control (a button or its label).
    pub primary_action: bool,
    /// The element links to a content item.
    pub content_link: bool,
    /// The element toggles a bookmark.
    pub bookmark_toggle: bool,
    /// The element toggles a share action.
    pub share_toggle: bool,
}

/// One user interaction as reported by the embedding application.
#[derive(Debug, Clone)]
pub struct Interaction {
    /// Lowercase tag-like label of the source element.
    pub element: String,
    /// Content item the interaction refers to, when one is attached.
    pub content_id: Option<i64>,
    pub markers: InteractionMarkers,
}

impl Interaction {
    #[must_use]
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            content_id: None,
            markers: InteractionMarkers::default(),
        }
    }

    #[must_use]
    pub fn with_content_id(mut self, content_id: i64) -> Self {
        self.content_id = Some(content_id);
        self
    }

    #[must_use]
    pub fn with_markers(mut self, markers: InteractionMarkers) -> Self {
        self.markers = markers;
        self
    }
}

/// Classifies an interaction's markers into an activity kind.
///
/// The first matching marker wins, in declaration order. Interactions
/// matching no marker produce no record at all.
#[must_use]
pub fn classify(markers: InteractionMarkers) -> Option<ActivityKind> {
    if markers.primary_action {
        Some(ActivityKind::Click)
    } else if markers.content_link {
        Some(ActivityKind::ContentClick)
    } else if markers.bookmark_toggle {
        Some(ActivityKind::Bookmark)
    } else if markers.share_toggle {
        Some(ActivityKind::Share)
    } else {
        None
    }
}

/// Builds activity records from interactions and forwards them to the
/// server while connected.
#[derive(Debug, Clone)]
pub struct ActivityRelay {
    client: Client,
}

impl ActivityRelay {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Records a classified interaction.
    pub fn record_interaction(&self, interaction: &Interaction) {
        let kind = match classify(interaction.markers) {
            Some(kind) => kind,
            None => return,
        };

        let mut record =
            ActivityRecord::new(kind).with_metadata("element", interaction.element.as_str());
        if let Some(content_id) = interaction.content_id {
            record = record.with_content_id(content_id);
        }
        self.send(record);
    }

    /// Records that a content item was viewed.
    pub fn record_view(&self, content_id: i64) {
        let record = ActivityRecord::new(ActivityKind::View)
            .with_content_id(content_id)
            .with_metadata("duration", 0);
        self.send(record);
    }

    /// Records a submitted form.
    pub fn record_form_submit(&self, form_id: &str) {
        let record =
            ActivityRecord::new(ActivityKind::FormSubmit).with_metadata("form_id", form_id);
        self.send(record);
    }

    fn send(&self, record: ActivityRecord) {
        if !self.client.state().is_connected() {
            debug!(kind = %record.kind, "Dropping activity, not connected");
            metrics::record_activity_dropped();
            return;
        }
        metrics::record_activity(record.kind.as_str());
        self.client.emit(ClientEvent::track_activity(record));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::sleep;

    use vitalsync_transport::mock::{MockConnector, MockHandle};

    use super::*;
    use crate::config::ClientConfig;
    use crate::state::ConnectionState;

    fn markers(
        primary_action: bool,
        content_link: bool,
        bookmark_toggle: bool,
        share_toggle: bool,
    ) -> InteractionMarkers {
        InteractionMarkers {
            primary_action,
            content_link,
            bookmark_toggle,
            share_toggle,
        }
    }

    #[test]
    fn test_classify_by_marker() {
        assert_eq!(
            classify(markers(true, false, false, false)),
            Some(ActivityKind::Click)
        );
        assert_eq!(
            classify(markers(false, true, false, false)),
            Some(ActivityKind::ContentClick)
        );
        assert_eq!(
            classify(markers(false, false, true, false)),
            Some(ActivityKind::Bookmark)
        );
        assert_eq!(
            classify(markers(false, false, false, true)),
            Some(ActivityKind::Share)
        );
        assert_eq!(classify(markers(false, false, false, false)), None);
    }

    #[test]
    fn test_classify_prefers_primary_action() {
        assert_eq!(
            classify(markers(true, true, true, true)),
            Some(ActivityKind::Click)
        );
        assert_eq!(
            classify(markers(false, true, true, false)),
            Some(ActivityKind::ContentClick)
        );
    }

    fn connected_relay() -> (ActivityRelay, Client, MockHandle) {
        let (connector, handle) = MockConnector::pair();
        let client =
            Client::with_connector(ClientConfig::new("mock://server"), Arc::new(connector));
        let relay = ActivityRelay::new(client.clone());
        (relay, client, handle)
    }

    async fn wait_for_connected(client: &Client) {
        let mut rx = client.watch_status();
        tokio::time::timeout(Duration::from_secs(10), async {
            while !rx.borrow_and_update().state.is_connected() {
                rx.changed().await.expect("status stream closed");
            }
        })
        .await
        .expect("never connected");
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("condition not reached");
    }

    #[tokio::test(start_paused = true)]
    async fn test_interaction_relayed_while_connected() {
        let (relay, client, handle) = connected_relay();
        client.connect().unwrap();
        wait_for_connected(&client).await;
        handle.take_sent();

        let interaction = Interaction::new("button")
            .with_content_id(7)
            .with_markers(markers(false, true, false, false));
        relay.record_interaction(&interaction);

        wait_until(|| !handle.sent().is_empty()).await;
        let sent = handle.sent();
        assert_eq!(sent[0].event, "track_activity");
        assert_eq!(sent[0].data["type"], "content_click");
        assert_eq!(sent[0].data["content_id"], 7);
        assert_eq!(sent[0].data["element"], "button");
        assert!(sent[0].data["timestamp"].is_string());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_sent_while_disconnected() {
        let (relay, client, handle) = connected_relay();
        assert_eq!(client.state(), ConnectionState::Disconnected);

        relay.record_interaction(
            &Interaction::new("button").with_markers(markers(true, false, false, false)),
        );
        relay.record_view(3);
        relay.record_form_submit("signup");

        sleep(Duration::from_millis(50)).await;
        assert!(handle.sent().is_empty());
        assert_eq!(handle.dial_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unclassified_interaction_produces_no_record() {
        let (relay, client, handle) = connected_relay();
        client.connect().unwrap();
        wait_for_connected(&client).await;
        handle.take_sent();

        relay.record_interaction(&Interaction::new("div"));
        sleep(Duration::from_millis(50)).await;
        assert!(handle.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_and_form_records() {
        let (relay, client, handle) = connected_relay();
        client.connect().unwrap();
        wait_for_connected(&client).await;
        handle.take_sent();

        relay.record_view(42);
        relay.record_form_submit("health-profile");

        wait_until(|| handle.sent().len() == 2).await;
        let sent = handle.sent();
        assert_eq!(sent[0].data["type"], "view");
        assert_eq!(sent[0].data["content_id"], 42);
        assert_eq!(sent[0].data["duration"], 0);
        assert_eq!(sent[1].data["type"], "form_submit");
        assert_eq!(sent[1].data["form_id"], "health-profile");
    }
}
