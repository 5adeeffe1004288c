//! # vitalsync-transport
//!
//! Transport abstraction layer for the VitalSync realtime client.
//!
//! The client dials a server and exchanges named-event envelopes over the
//! resulting connection. All transports implement the `Connector` and
//! `Connection` traits, keeping the session logic protocol-agnostic:
//!
//! - **WebSocket** - the production transport (`tokio-tungstenite`)
//! - **Mock** - an in-memory transport for deterministic tests
//!
//! ```rust,ignore
//! use vitalsync_transport::{Connection, Connector};
//!
//! async fn drain(mut conn: Box<dyn Connection>) {
//!     while let Ok(Some(envelope)) = conn.recv().await {
//!         // Process envelope
//!     }
//! }
//! ```

pub mod mock;
pub mod traits;

#[cfg(feature = "websocket")]
pub mod websocket;

pub use traits::{Connection, ConnectionId, Connector, TransportError};

#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConfig, WebSocketConnector};
