//! WebSocket connector implementation.
//!
//! This module dials the server with tokio-tungstenite and maps text
//! frames to envelopes. Undecodable inbound messages are dropped with a
//! warning rather than failing the session; a single bad message from
//! the server must not cost the client its connection.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, warn};

use vitalsync_events::{envelope, Envelope};

use crate::traits::{Connection, ConnectionId, Connector, TransportError};

/// WebSocket connector configuration.
#[derive(Debug, Clone)]
pub struct WebSocketConfig {
    /// Maximum time to wait for the handshake to complete.
    pub connect_timeout: Duration,
    /// Maximum inbound message size in bytes.
    pub max_message_size: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(20),
            max_message_size: 64 * 1024, // 64 KB
        }
    }
}

/// WebSocket connector.
#[derive(Debug, Clone, Default)]
pub struct WebSocketConnector {
    config: WebSocketConfig,
}

impl WebSocketConnector {
    /// Create a new WebSocket connector.
    #[must_use]
    pub fn new(config: WebSocketConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    async fn dial(&self, url: &str) -> Result<Box<dyn Connection>, TransportError> {
        let handshake = connect_async(url);
        let (ws_stream, response) = timeout(self.config.connect_timeout, handshake)
            .await
            .map_err(|_| TransportError::Timeout(self.config.connect_timeout))?
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

        debug!(%url, status = %response.status(), "WebSocket handshake completed");

        let conn = WebSocketConnection::new(ws_stream, self.config.max_message_size);
        Ok(Box::new(conn))
    }

    fn name(&self) -> &'static str {
        "websocket"
    }
}

/// A WebSocket connection to the server.
pub struct WebSocketConnection {
    id: ConnectionId,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    open: bool,
    max_message_size: usize,
}

impl WebSocketConnection {
    fn new(stream: WebSocketStream<MaybeTlsStream<TcpStream>>, max_message_size: usize) -> Self {
        Self {
            id: ConnectionId::generate(),
            stream,
            open: true,
            max_message_size,
        }
    }
}

#[async_trait]
impl Connection for WebSocketConnection {
    fn id(&self) -> &ConnectionId {
        &self.id
    }

    async fn recv(&mut self) -> Result<Option<Envelope>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    if text.len() > self.max_message_size {
                        warn!(
                            size = text.len(),
                            max = self.max_message_size,
                            "Dropping oversized message"
                        );
                        continue;
                    }

                    match envelope::decode(&text) {
                        Ok(envelope) => return Ok(Some(envelope)),
                        Err(e) => {
                            warn!(error = %e, "Dropping undecodable message");
                        }
                    }
                }
                Some(Ok(Message::Binary(data))) => {
                    warn!(size = data.len(), "Ignoring unexpected binary message");
                }
                Some(Ok(Message::Ping(data))) => {
                    // Respond to ping with pong
                    if let Err(e) = self.stream.send(Message::Pong(data)).await {
                        warn!("Failed to send pong: {}", e);
                    }
                }
                Some(Ok(Message::Pong(_))) => {
                    // Ignore pong messages
                }
                Some(Ok(Message::Close(_))) => {
                    debug!(connection = %self.id, "Received close frame");
                    self.open = false;
                    return Ok(None);
                }
                Some(Ok(Message::Frame(_))) => {
                    // Raw frame, ignore
                }
                Some(Err(WsError::ConnectionClosed)) => {
                    debug!(connection = %self.id, "Connection closed");
                    self.open = false;
                    return Ok(None);
                }
                Some(Err(e)) => {
                    error!(connection = %self.id, "WebSocket error: {}", e);
                    self.open = false;
                    return Err(TransportError::ReceiveFailed(e.to_string()));
                }
                None => {
                    debug!(connection = %self.id, "WebSocket stream ended");
                    self.open = false;
                    return Ok(None);
                }
            }
        }
    }

    async fn send(&mut self, envelope: Envelope) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::ConnectionClosed);
        }

        let text = envelope::encode(&envelope)?;
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if !self.open {
            return Ok(()); // Already closed
        }
        self.open = false;

        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(TransportError::Other(format!("Failed to close: {}", e))),
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
