//! Session lifecycle: transport port, event funnel, and reconnect policy.
//!
//! One logical **session** survives physical reconnects. The modules here own
//! everything between the physical connection and the dispatcher:
//!
//! - [`state`](self): [`Session`] identity and [`SessionEvent`] lifecycle
//!   transitions
//! - [`Transport`] the port a websocket (or test double) implements
//! - [`TransportSink`] the funnel the transport calls from its network
//!   threads; it records bookkeeping synchronously, then enqueues work
//! - [`SessionAdapter`] connect/disconnect/reconnect policy, including the
//!   manual-disconnect flag that suppresses exactly one auto-reconnect
//!
//! ## Lifecycle
//! ```text
//! Disconnected ── connect() ──► Connecting ── connected(id, fresh) ──► Connected
//!      ▲                                                                  │
//!      │                      requested (manual flag set)                 │
//!      ├──────────────────────────────────────────────◄── disconnected ───┤
//!      │                                                                  │
//!      └── unrequested ──► reconnect() ── reconnected / connected ────────┘
//! ```
//!
//! A **fresh** connect (`is_reconnect == false`) invalidates every cached
//! subscription; a **reconnect** resumes the same logical session and the
//! server retains its subscriptions.

mod adapter;
mod state;
mod transport;

pub use adapter::SessionAdapter;
pub use state::{Session, SessionEvent};
pub use transport::{Transport, TransportSink};

pub(crate) use state::SessionShared;
