//! Debounced search suggestion requests.
//!
//! Keystrokes arrive far faster than suggestion queries should leave, so
//! submissions wait out a short quiet window and newer input supersedes
//! anything still pending.

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::client::Client;

/// Queries shorter than this never leave the client.
pub const MIN_QUERY_LENGTH: usize = 2;

/// Quiet window between the last keystroke and the request.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounces suggestion requests for a search input.
///
/// [`SuggestionRequester::submit`] is called with the full input text on
/// every keystroke; at most one request per quiet window reaches the
/// server, carrying the latest text.
#[derive(Debug)]
pub struct SuggestionRequester {
    client: Client,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SuggestionRequester {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            pending: Mutex::new(None),
        }
    }

    /// Submits the current input text.
    ///
    /// Cancels any pending request. Text shorter than
    /// [`MIN_QUERY_LENGTH`] characters (after trimming) schedules nothing,
    /// so clearing the input also clears the pending request.
    pub fn submit(&self, query: &str) {
        self.cancel();

        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LENGTH {
            return;
        }

        let client = self.client.clone();
        let query = trimmed.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;
            client.request_search_suggestions(&query);
        });
        *self.pending.lock().unwrap() = Some(handle);
    }

    /// Cancels the pending request, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for SuggestionRequester {
    fn drop(&mut self) {
        self.cancel();
    }
}
