//! In-memory transport for deterministic tests.
//!
//! [`MockConnector::pair`] returns a connector to hand to the client and a
//! [`MockHandle`] for the test to keep: the handle scripts dial outcomes,
//! injects inbound envelopes, observes outbound traffic, and can sever the
//! live session to simulate a server-side close.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use vitalsync_events::Envelope;

use crate::traits::{Connection, ConnectionId, Connector, TransportError};

struct MockState {
    /// Scripted dial refusals, consumed front-to-back; an empty queue
    /// means the next dial succeeds.
    refusals: Mutex<VecDeque<String>>,
    dials: AtomicUsize,
    dial_times: Mutex<Vec<Instant>>,
    sent: Mutex<Vec<Envelope>>,
    /// Inbound pipe of the current session, if one is live.
    inbound_tx: Mutex<Option<mpsc::UnboundedSender<Envelope>>>,
}

/// Connector half handed to the client under test.
#[derive(Clone)]
pub struct MockConnector {
    state: Arc<MockState>,
}

/// Test-side handle observing and steering the mock transport.
#[derive(Clone)]
pub struct MockHandle {
    state: Arc<MockState>,
}

impl MockConnector {
    /// Create a connector/handle pair sharing one transport state.
    #[must_use]
    pub fn pair() -> (Self, MockHandle) {
        let state = Arc::new(MockState {
            refusals: Mutex::new(VecDeque::new()),
            dials: AtomicUsize::new(0),
            dial_times: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            inbound_tx: Mutex::new(None),
        });

        (
            Self {
                state: Arc::clone(&state),
            },
            MockHandle { state },
        )
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn dial(&self, _url: &str) -> Result<Box<dyn Connection>, TransportError> {
        self.state.dials.fetch_add(1, Ordering::SeqCst);
        self.state.dial_times.lock().unwrap().push(Instant::now());

        if let Some(reason) = self.state.refusals.lock().unwrap().pop_front() {
            return Err(TransportError::ConnectFailed(reason));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        *self.state.inbound_tx.lock().unwrap() = Some(tx);

        Ok(Box::new(MockConnection {
            id: ConnectionId::generate(),
            state: Arc::clone(&self.state),
            inbound_rx: rx,
            open: true,
        }))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

impl MockHandle {
    /// Refuse the next `n` dials with a generic reason.
    pub fn fail_next_dials(&self, n: usize) {
        let mut refusals = self.state.refusals.lock().unwrap();
        for _ in 0..n {
            refusals.push_back("connection refused".to_string());
        }
    }

    /// Refuse the next dial with a specific reason.
    pub fn refuse_next_dial(&self, reason: impl Into<String>) {
        self.state.refusals.lock().unwrap().push_back(reason.into());
    }

    /// Number of dials attempted so far.
    #[must_use]
    pub fn dial_count(&self) -> usize {
        self.state.dials.load(Ordering::SeqCst)
    }

    /// Instants at which dials were attempted.
    #[must_use]
    pub fn dial_times(&self) -> Vec<Instant> {
        self.state.dial_times.lock().unwrap().clone()
    }

    /// Push an inbound envelope into the live session.
    ///
    /// Dropped silently if no session is live.
    pub fn push_inbound(&self, envelope: Envelope) {
        if let Some(tx) = self.state.inbound_tx.lock().unwrap().as_ref() {
            let _ = tx.send(envelope);
        }
    }

    /// Sever the live session, as a server-side close would.
    pub fn close_session(&self) {
        self.state.inbound_tx.lock().unwrap().take();
    }

    /// Whether a session is currently live.
    #[must_use]
    pub fn session_live(&self) -> bool {
        self.state
            .inbound_tx
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Envelopes the client has sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Envelope> {
        self.state.sent.lock().unwrap().clone()
    }

    /// Drain and return the envelopes the client has sent so far.
    pub fn take_sent(&self) -> Vec<Envelope> {
        std::mem::take(&mut *self.state.sent.lock().unwrap())
    }
}

struct MockConnection {
    id: ConnectionId,
    state: Arc<MockState>,
    inbound_rx: mpsc::UnboundedReceiver<Envelope>,
    open: bool,
}

#[async_trait]
impl Connection for MockConnection {
    fn id(&self) -> &ConnectionId {
        &self.id
    }

    async fn recv(&mut self) -> Result<Option<Envelope>, TransportError> {
        match self.inbound_rx.recv().await {
            Some(envelope) => Ok(Some(envelope)),
            None => {
                self.open = false;
                Ok(None)
            }
        }
    }

    async fn send(&mut self, envelope: Envelope) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::ConnectionClosed);
        }
        self.state.sent.lock().unwrap().push(envelope);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.open = false;
        self.state.inbound_tx.lock().unwrap().take();
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
