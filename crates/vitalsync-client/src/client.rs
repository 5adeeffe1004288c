//! Connection supervision for the realtime client.
//!
//! A background supervisor task owns the connection lifecycle: dialing,
//! session I/O, liveness probes, and reconnecting with exponential backoff.
//! [`Client`] handles are cheap clones that feed the supervisor commands
//! over a channel and observe status through watch and broadcast channels.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use vitalsync_events::{ActivityKind, ActivityRecord, ClientEvent, Envelope, ServerEvent};
use vitalsync_transport::{Connection, Connector, WebSocketConnector};

use crate::backoff::ReconnectPolicy;
use crate::config::ClientConfig;
use crate::dispatch::UpdateDispatcher;
use crate::metrics;
use crate::state::{ConnectionState, ConnectionStatus};

/// Capacity of the status broadcast channel.
const STATUS_EVENTS_CAPACITY: usize = 32;

/// Errors returned by [`Client`] control methods.
#[derive(Debug, Error)]
pub enum ClientError {
    /// `connect` was called while the connection machinery was already up.
    #[error("client is already running")]
    AlreadyRunning,
    /// The supervisor task is gone and can no longer accept commands.
    #[error("client is closed")]
    Closed,
}

enum Command {
    Connect,
    Reconnect,
    Disconnect,
    Emit(ClientEvent),
}

/// How an established session ended.
enum SessionEnd {
    /// Explicit disconnect requested.
    Disconnect,
    /// Reconnect requested; redial immediately.
    Restart,
    /// Session dropped out from under us; reconnect per policy.
    Lost(String),
    /// Every client handle is gone.
    Shutdown,
}

/// Why the connection machine returned control to the supervisor.
enum MachineExit {
    /// Back to idle, keep serving commands.
    Idle,
    /// Every client handle is gone.
    Shutdown,
}

struct ClientInner {
    config: ClientConfig,
    connector: Arc<dyn Connector>,
    dispatcher: UpdateDispatcher,
    status_tx: watch::Sender<ConnectionStatus>,
    status_events: broadcast::Sender<ConnectionStatus>,
    running: AtomicBool,
}

impl ClientInner {
    fn set_status(&self, status: ConnectionStatus) {
        debug!(state = %status.state, reason = %status.reason, "Connection status");
        metrics::set_connected(status.state.is_connected());
        self.status_tx.send_replace(status.clone());
        let _ = self.status_events.send(status);
    }

    fn handle_inbound(&self, envelope: Envelope) {
        match ServerEvent::from_envelope(envelope) {
            Ok(event) => {
                if !matches!(event, ServerEvent::Unknown { .. }) {
                    metrics::record_update(event.event_name());
                }
                self.dispatcher.dispatch(event);
            }
            Err(e) => {
                warn!(error = %e, "Dropping update with malformed payload");
                metrics::record_update_malformed();
            }
        }
    }
}

/// Handle to the realtime client.
///
/// Cheap to clone; all clones control the same connection. The connection
/// itself is driven by a supervisor task spawned in [`Client::new`], so a
/// Tokio runtime must be running when the client is created.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl Client {
    /// Creates a client that connects over WebSocket.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_connector(config, Arc::new(WebSocketConnector::default()))
    }

    /// Creates a client with a custom transport.
    #[must_use]
    pub fn with_connector(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (status_tx, _) = watch::channel(ConnectionStatus::disconnected("not connected"));
        let (status_events, _) = broadcast::channel(STATUS_EVENTS_CAPACITY);

        let inner = Arc::new(ClientInner {
            config,
            connector,
            dispatcher: UpdateDispatcher::new(),
            status_tx,
            status_events,
            running: AtomicBool::new(false),
        });

        // The supervisor holds no command sender, so it shuts down once
        // every Client handle is dropped.
        tokio::spawn(supervise(Arc::clone(&inner), cmd_rx));

        Self { inner, cmd_tx }
    }

    /// Starts the connection machinery.
    ///
    /// Dials immediately and keeps reconnecting with exponential backoff
    /// until an explicit [`Client::disconnect`] or the retry budget runs
    /// out. Returns as soon as the request is queued; watch
    /// [`Client::subscribe_status`] for the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AlreadyRunning`] if the machinery is already
    /// up, or [`ClientError::Closed`] if the supervisor task is gone.
    pub fn connect(&self) -> Result<(), ClientError> {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return Err(ClientError::AlreadyRunning);
        }
        if self.cmd_tx.send(Command::Connect).is_err() {
            self.inner.running.store(false, Ordering::SeqCst);
            return Err(ClientError::Closed);
        }
        Ok(())
    }

    /// Stops the connection and cancels any pending reconnect.
    ///
    /// Idempotent: disconnecting an idle client does nothing.
    pub fn disconnect(&self) {
        let _ = self.cmd_tx.send(Command::Disconnect);
    }

    /// Drops the current session, resets the retry budget, and dials again.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] if the supervisor task is gone.
    pub fn reconnect(&self) -> Result<(), ClientError> {
        self.cmd_tx
            .send(Command::Reconnect)
            .map_err(|_| ClientError::Closed)
    }

    /// Queues an event for the current session.
    ///
    /// Fire-and-forget: if no session is up when the command is processed
    /// the event is dropped.
    pub fn emit(&self, event: ClientEvent) {
        let _ = self.cmd_tx.send(Command::Emit(event));
    }

    /// Asks the server for a fresh set of recommendations.
    ///
    /// Dropped silently unless the client is connected.
    pub fn request_recommendations(&self) {
        if self.state().is_connected() {
            self.emit(ClientEvent::request_recommendations());
        }
    }

    /// Asks the server for suggestions matching a search query.
    ///
    /// Dropped silently unless the client is connected.
    pub fn request_search_suggestions(&self, query: &str) {
        if self.state().is_connected() {
            self.emit(ClientEvent::search_suggestions(query));
        }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.status_tx.borrow().state
    }

    /// Current status snapshot.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.inner.status_tx.borrow().clone()
    }

    /// Subscribes to every status update, in order.
    ///
    /// Subscribers that fall further behind than the channel capacity lose
    /// the oldest updates.
    #[must_use]
    pub fn subscribe_status(&self) -> broadcast::Receiver<ConnectionStatus> {
        self.inner.status_events.subscribe()
    }

    /// Watches the latest status without queueing history.
    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Whether the connection machinery is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Handler registration for inbound server events.
    #[must_use]
    pub fn dispatcher(&self) -> &UpdateDispatcher {
        &self.inner.dispatcher
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.inner.config.url)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Top-level supervisor: waits for a connect request, runs the connection
/// machine, and returns to idle when it stops.
async fn supervise(inner: Arc<ClientInner>, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
    loop {
        match cmd_rx.recv().await {
            Some(Command::Connect) | Some(Command::Reconnect) => {
                inner.running.store(true, Ordering::SeqCst);
                if let MachineExit::Shutdown = run_machine(&inner, &mut cmd_rx).await {
                    return;
                }
            }
            Some(Command::Disconnect) => {
                debug!("Disconnect requested while already disconnected");
            }
            Some(Command::Emit(event)) => {
                debug!(event = event.event_name(), "Dropping event, not connected");
            }
            None => return,
        }
    }
}

/// Connection machine: dial, run the session, back off, repeat.
async fn run_machine(
    inner: &Arc<ClientInner>,
    cmd_rx: &mut mpsc::UnboundedReceiver<Command>,
) -> MachineExit {
    let mut policy = ReconnectPolicy::new(
        inner.config.reconnect.base_delay(),
        inner.config.reconnect.max_attempts,
    );

    'machine: loop {
        inner.set_status(ConnectionStatus::new(ConnectionState::Connecting, "connecting"));

        let dial = inner.connector.dial(&inner.config.url);
        tokio::pin!(dial);

        // Race the dial against control commands.
        let connection = loop {
            tokio::select! {
                result = &mut dial => break result,
                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::Disconnect) => {
                        inner.running.store(false, Ordering::SeqCst);
                        inner.set_status(ConnectionStatus::disconnected("disconnected"));
                        return MachineExit::Idle;
                    }
                    Some(Command::Reconnect) => {
                        policy.reset();
                        continue 'machine;
                    }
                    Some(Command::Connect) => {
                        debug!("Connect requested while already connecting");
                    }
                    Some(Command::Emit(event)) => {
                        debug!(event = event.event_name(), "Dropping event, not connected");
                    }
                    None => return MachineExit::Shutdown,
                },
            }
        };

        match connection {
            Ok(mut conn) => {
                policy.reset();
                metrics::record_connect();
                info!(
                    connector = inner.connector.name(),
                    connection = %conn.id(),
                    "Connected"
                );
                inner.set_status(ConnectionStatus::new(ConnectionState::Connected, "connected"));

                match run_session(inner, cmd_rx, &mut conn).await {
                    SessionEnd::Disconnect => {
                        if let Err(e) = conn.close().await {
                            debug!(error = %e, "Error closing connection");
                        }
                        inner.running.store(false, Ordering::SeqCst);
                        inner.set_status(ConnectionStatus::disconnected("disconnected"));
                        return MachineExit::Idle;
                    }
                    SessionEnd::Restart => {
                        let _ = conn.close().await;
                        policy.reset();
                        continue 'machine;
                    }
                    SessionEnd::Shutdown => {
                        let _ = conn.close().await;
                        return MachineExit::Shutdown;
                    }
                    SessionEnd::Lost(reason) => {
                        warn!(reason = %reason, "Session lost");
                        inner.set_status(ConnectionStatus::disconnected(reason));
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Connect failed");
                metrics::record_connect_failure();
                inner.set_status(ConnectionStatus::disconnected(format!("connect failed: {e}")));
            }
        }

        // Lost session or failed dial: take the next backoff delay, or give
        // up when the budget is spent.
        let delay = match policy.next_delay() {
            Some(delay) => delay,
            None => {
                warn!(
                    attempts = policy.max_attempts(),
                    "Giving up after exhausting reconnect attempts"
                );
                inner.running.store(false, Ordering::SeqCst);
                inner.set_status(ConnectionStatus::terminal(format!(
                    "gave up after {} reconnect attempts",
                    policy.max_attempts()
                )));
                return MachineExit::Idle;
            }
        };

        metrics::record_reconnect_scheduled();
        debug!(
            attempt = policy.attempt(),
            max_attempts = policy.max_attempts(),
            delay_ms = delay.as_millis() as u64,
            "Reconnect scheduled"
        );
        inner.set_status(ConnectionStatus::disconnected(format!(
            "reconnecting in {}s (attempt {}/{})",
            delay.as_secs_f64(),
            policy.attempt(),
            policy.max_attempts()
        )));

        // Wait out the delay while still honoring control commands. A
        // disconnect here cancels the pending dial.
        let wait = sleep(delay);
        tokio::pin!(wait);
        loop {
            tokio::select! {
                _ = &mut wait => break,
                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::Disconnect) => {
                        debug!("Pending reconnect cancelled by disconnect");
                        inner.running.store(false, Ordering::SeqCst);
                        inner.set_status(ConnectionStatus::disconnected("disconnected"));
                        return MachineExit::Idle;
                    }
                    Some(Command::Reconnect) => {
                        policy.reset();
                        break;
                    }
                    Some(Command::Connect) => {
                        debug!("Connect requested while reconnect pending");
                    }
                    Some(Command::Emit(event)) => {
                        debug!(event = event.event_name(), "Dropping event, not connected");
                    }
                    None => return MachineExit::Shutdown,
                },
            }
        }
    }
}

/// Drives one established session until it ends.
async fn run_session(
    inner: &Arc<ClientInner>,
    cmd_rx: &mut mpsc::UnboundedReceiver<Command>,
    conn: &mut Box<dyn Connection>,
) -> SessionEnd {
    // The server expects an initial data request and a connect marker at
    // session start.
    send_event(conn, ClientEvent::request_recommendations()).await;
    send_event(
        conn,
        ClientEvent::track_activity(ActivityRecord::new(ActivityKind::WebsocketConnect)),
    )
    .await;

    let period = inner.config.probe_interval();
    let mut probe = interval_at(Instant::now() + period, period);
    probe.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            inbound = conn.recv() => match inbound {
                Ok(Some(envelope)) => inner.handle_inbound(envelope),
                Ok(None) => {
                    debug!("Connection closed by server");
                    return SessionEnd::Lost("connection closed".to_string());
                }
                Err(e) => {
                    return SessionEnd::Lost(format!("transport error: {e}"));
                }
            },
            _ = probe.tick() => {
                metrics::record_probe();
                send_event(conn, ClientEvent::health_check()).await;
            }
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::Emit(event)) => send_event(conn, event).await,
                Some(Command::Disconnect) => return SessionEnd::Disconnect,
                Some(Command::Reconnect) => return SessionEnd::Restart,
                Some(Command::Connect) => {
                    debug!("Connect requested while already connected");
                }
                None => return SessionEnd::Shutdown,
            },
        }
    }
}

/// Encodes and sends one event. Failures are logged and counted, never
/// surfaced to the session loop.
async fn send_event(conn: &mut Box<dyn Connection>, event: ClientEvent) {
    let name = event.event_name();
    match event.into_envelope() {
        Ok(envelope) => {
            if let Err(e) = conn.send(envelope).await {
                debug!(event = name, error = %e, "Send failed");
                metrics::record_send_failure();
            }
        }
        Err(e) => {
            warn!(event = name, error = %e, "Failed to encode event");
            metrics::record_send_failure();
        }
    }
}
