//! Connection state reported by the client.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the realtime connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// No session is up. Covers both idle clients and clients waiting
    /// out a reconnect delay.
    Disconnected,
    /// A dial is in flight.
    Connecting,
    /// A session is established and events flow in both directions.
    Connected,
}

impl ConnectionState {
    /// Returns `true` only for [`ConnectionState::Connected`].
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// A state snapshot with a human-readable reason.
///
/// Published on every status update, not only on state changes: waiting
/// out a reconnect delay updates the reason while the state stays
/// [`ConnectionState::Disconnected`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub reason: String,
    /// Set once the client has given up reconnecting. Reported exactly
    /// once per exhausted retry run.
    pub terminal: bool,
}

impl ConnectionStatus {
    #[must_use]
    pub fn new(state: ConnectionState, reason: impl Into<String>) -> Self {
        Self {
            state,
            reason: reason.into(),
            terminal: false,
        }
    }

    #[must_use]
    pub fn disconnected(reason: impl Into<String>) -> Self {
        Self::new(ConnectionState::Disconnected, reason)
    }

    /// A terminal status: disconnected with no further reconnect attempts.
    #[must_use]
    pub fn terminal(reason: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            reason: reason.into(),
            terminal: true,
        }
    }
}
