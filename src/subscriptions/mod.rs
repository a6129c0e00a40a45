//! Subscription lifecycle: descriptors, registrar port, and the per-session
//! manager.
//!
//! Features *declare* their interest as [`SubscriptionDescriptor`]s; the
//! [`SubscriptionManager`] translates declarations into idempotent
//! create-subscription calls against the [`Registrar`] port, scoped to the
//! current session.
//!
//! ## Rules
//! - One server-side subscription per unique (topic, version, condition)
//!   tuple per session — the first requester wins, later requesters are
//!   skipped (the `owner` field exists for diagnostics only).
//! - A **fresh** connect resets the bookkeeping and re-declares everything; a
//!   **reconnect** declares nothing (the server retains subscriptions for the
//!   same session id).
//! - Create failures are logged with topic context, never retried
//!   automatically, and never block other topics.

mod descriptor;
mod manager;
mod registrar;

pub use descriptor::{SubscriptionDescriptor, SubscriptionKey};
pub use manager::SubscriptionManager;
pub use registrar::{Registrar, SubscriptionHandle, SubscriptionRequest};
