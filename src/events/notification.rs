//! # Raw notification as delivered by the transport.
//!
//! A [`Notification`] pairs a [`Topic`] with the structured payload the
//! transport decoded from the wire frame. Payloads stay untyped
//! (`serde_json::Value`) until a handler translates them into its domain
//! event; a failed translation is that handler's problem alone.
//!
//! ## Ordering guarantees
//! Each notification carries a globally unique sequence number (`seq`) that
//! increases monotonically with creation order. Handlers observe
//! notifications in enqueue order; `seq` lets tests and diagnostics verify it.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use super::topic::Topic;

/// Global sequence counter for notification ordering.
static NOTIFICATION_SEQ: AtomicU64 = AtomicU64::new(0);

/// One server-pushed notification.
#[derive(Clone, Debug)]
pub struct Notification {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock arrival timestamp.
    pub at: SystemTime,
    /// Notification category.
    pub topic: Topic,
    /// Structured payload, shape specific to the topic.
    pub payload: serde_json::Value,
}

impl Notification {
    /// Creates a notification with the current timestamp and next sequence
    /// number.
    pub fn new(topic: Topic, payload: serde_json::Value) -> Self {
        Self {
            seq: NOTIFICATION_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            topic,
            payload,
        }
    }

    /// Decodes the payload into a typed value, mapping decode failures to
    /// [`DispatchError::MalformedPayload`](crate::error::DispatchError).
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, crate::error::DispatchError> {
        serde_json::from_value(self.payload.clone()).map_err(|e| {
            crate::error::DispatchError::MalformedPayload {
                topic: self.topic.to_string(),
                reason: e.to_string(),
            }
        })
    }
}
