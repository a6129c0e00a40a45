//! # Session identity and lifecycle events.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// One logical live connection to the event transport.
///
/// Created when the transport reports a successful connect, replaced on the
/// next connect, gone while disconnected. `is_reconnect` distinguishes a
/// resumed logical session (subscriptions retained server-side) from a fresh
/// one (everything must be re-created).
#[derive(Clone, Debug)]
pub struct Session {
    /// Opaque server-assigned session id.
    pub id: Arc<str>,
    /// True when this physical connection inherited an existing logical
    /// session.
    pub is_reconnect: bool,
    /// When the transport reported the connect.
    pub connected_at: SystemTime,
}

impl Session {
    /// Creates a session record for a connect callback.
    pub fn new(id: impl Into<Arc<str>>, is_reconnect: bool) -> Self {
        Self {
            id: id.into(),
            is_reconnect,
            connected_at: SystemTime::now(),
        }
    }
}

/// Lifecycle transition reported by the transport, processed on the consumer
/// context.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// The physical connection is up.
    Connected {
        /// The new (or resumed) session.
        session: Session,
    },
    /// The physical connection is down.
    Disconnected {
        /// True when the drop was requested via `disconnect()`; suppresses
        /// the auto-reconnect.
        requested: bool,
    },
    /// The transport re-established the same logical session; subscriptions
    /// are retained server-side, no re-registration happens.
    Reconnected,
    /// The transport reported an error; logged, never escalated to handlers.
    TransportError {
        /// Message supplied by the transport.
        message: String,
    },
}

/// Bookkeeping shared between the adapter (consumer context) and the
/// transport sink (arbitrary producer threads).
///
/// Only these two fields need cross-thread access; everything else the engine
/// owns stays on the consumer context.
#[derive(Default)]
pub(crate) struct SessionShared {
    /// Current session id, recorded synchronously inside the connect
    /// callback so a closely following notification cannot observe a stale
    /// value.
    pub(crate) session_id: Mutex<Option<Arc<str>>>,
    /// Set by `disconnect()` before tearing down the connection; read when
    /// the disconnect callback arrives, cleared on the next successful
    /// connect.
    pub(crate) manual_disconnect: AtomicBool,
}

impl SessionShared {
    pub(crate) fn current_session_id(&self) -> Option<Arc<str>> {
        self.session_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub(crate) fn set_session_id(&self, id: Option<Arc<str>>) {
        *self
            .session_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = id;
    }
}
