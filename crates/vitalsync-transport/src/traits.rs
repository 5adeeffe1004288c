//! Transport abstraction traits for the VitalSync client.
//!
//! These traits define the interface that all transport implementations must
//! provide, allowing the session supervisor to be transport-agnostic.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use vitalsync_events::{Envelope, EnvelopeError};

/// Unique identifier for a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    /// Create a new connection ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random connection ID.
    #[must_use]
    pub fn generate() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        Self(format!("conn_{:x}", timestamp))
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ConnectionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConnectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection was closed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Connecting took longer than the configured timeout.
    #[error("Connect timed out after {0:?}")]
    Timeout(Duration),

    /// Failed to establish a connection.
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    /// Failed to send data.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Failed to receive data.
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    /// Envelope codec error.
    #[error("Envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// A dialer that can open connections to the server.
///
/// Connectors are responsible for the underlying protocol handshake
/// (WebSocket today) and provide a uniform interface to the session
/// supervisor.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection to `url`.
    ///
    /// This method resolves once the transport-level handshake has
    /// completed or failed.
    async fn dial(&self, url: &str) -> Result<Box<dyn Connection>, TransportError>;

    /// Get the connector name (e.g., "websocket").
    fn name(&self) -> &'static str;
}

/// An active connection to the server.
///
/// Connections handle the bidirectional flow of envelopes between the
/// client and the server.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the connection's unique identifier.
    fn id(&self) -> &ConnectionId;

    /// Receive the next envelope from the connection.
    ///
    /// Returns `None` if the connection is closed cleanly.
    async fn recv(&mut self) -> Result<Option<Envelope>, TransportError>;

    /// Send an envelope to the server.
    async fn send(&mut self, envelope: Envelope) -> Result<(), TransportError>;

    /// Close the connection gracefully.
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Check if the connection is still open.
    fn is_open(&self) -> bool;
}

impl fmt::Debug for dyn Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", self.id())
            .field("open", &self.is_open())
            .finish()
    }
}
