//! # Transport port and event funnel.
//!
//! [`Transport`] is the seam a real websocket client (or a test double)
//! implements. The engine never touches the wire; it hands the transport a
//! [`TransportSink`] and drives `open`/`close`/`reopen` through the command
//! gateway.
//!
//! [`TransportSink`] is the single entry point for transport callbacks. Its
//! methods are callable from any thread; each performs the bookkeeping that
//! must happen synchronously with the callback (recording the session id,
//! reading the manual-disconnect flag) and then enqueues a
//! [`WorkItem`](crate::dispatch::WorkItem) so everything else runs on the
//! consumer context. Because one sink feeds one FIFO queue, a `connected`
//! lifecycle event is always processed before any notification the transport
//! delivers after it.

use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::{Dispatcher, WorkItem};
use crate::error::TransportError;
use crate::events::{Notification, Topic};
use crate::logging::Logger;

use super::state::{Session, SessionEvent, SessionShared};

/// Port over the physical event connection.
///
/// Implementations own the socket, its framing, and its threads; they report
/// everything through the bound [`TransportSink`].
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Installs the sink the transport must report events through.
    ///
    /// Called exactly once while the engine is built, before `open`.
    fn bind(&self, sink: TransportSink);

    /// Opens the physical connection.
    async fn open(&self) -> Result<(), TransportError>;

    /// Closes the physical connection.
    async fn close(&self) -> Result<(), TransportError>;

    /// Re-establishes the physical connection for the same logical session.
    async fn reopen(&self) -> Result<(), TransportError>;

    /// Current session id as known by the transport, if connected.
    fn session_id(&self) -> Option<Arc<str>>;
}

/// Funnel for transport callbacks.
///
/// Cloneable and thread-safe; the transport may call it from any of its
/// network threads. Events enter the dispatcher queue in call order.
#[derive(Clone)]
pub struct TransportSink {
    dispatcher: Dispatcher,
    shared: Arc<SessionShared>,
    logger: Logger,
}

impl TransportSink {
    pub(crate) fn new(dispatcher: Dispatcher, shared: Arc<SessionShared>, logger: Logger) -> Self {
        Self {
            dispatcher,
            shared,
            logger,
        }
    }

    /// Reports a successful physical connect.
    ///
    /// Records the session id synchronously (a notification may follow
    /// immediately on the same callback thread), clears the
    /// manual-disconnect flag, then enqueues the lifecycle event.
    pub fn connected(&self, session_id: impl Into<Arc<str>>, is_reconnect: bool) {
        let id: Arc<str> = session_id.into();
        self.shared.set_session_id(Some(id.clone()));
        self.shared
            .manual_disconnect
            .store(false, AtomicOrdering::Release);

        let session = Session {
            id,
            is_reconnect,
            connected_at: std::time::SystemTime::now(),
        };
        self.dispatcher
            .enqueue(WorkItem::Session(SessionEvent::Connected { session }));
    }

    /// Reports a physical disconnect.
    ///
    /// Reads the manual-disconnect flag synchronously so the consumer can
    /// tell a requested shutdown from a transport-initiated drop. The flag
    /// itself is cleared on the next successful connect.
    pub fn disconnected(&self) {
        let requested = self
            .shared
            .manual_disconnect
            .load(AtomicOrdering::Acquire);
        self.shared.set_session_id(None);
        self.dispatcher
            .enqueue(WorkItem::Session(SessionEvent::Disconnected { requested }));
    }

    /// Reports that the same logical session was resumed on a new physical
    /// connection.
    pub fn reconnected(&self) {
        self.dispatcher
            .enqueue(WorkItem::Session(SessionEvent::Reconnected));
    }

    /// Reports a transport-level error.
    pub fn error(&self, message: impl Into<String>) {
        self.dispatcher
            .enqueue(WorkItem::Session(SessionEvent::TransportError {
                message: message.into(),
            }));
    }

    /// Delivers a decoded notification frame.
    pub fn notify(&self, topic: Topic, payload: serde_json::Value) {
        self.dispatcher
            .enqueue(WorkItem::Notify(Notification::new(topic, payload)));
    }

    /// Logger shared with the engine, for transport-side diagnostics.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}
