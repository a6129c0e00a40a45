//! Inbound events: topics, notifications, and typed payloads.
//!
//! This module groups the event **data model** that flows from the transport
//! through the dispatcher to feature handlers.
//!
//! ## Contents
//! - [`Topic`] and the [`topics`] constants for the known notification
//!   categories
//! - [`Notification`] the raw unit of delivery (topic + structured payload)
//! - typed payload structs ([`FollowPayload`], [`CheerPayload`], …) that
//!   handlers decode from the raw payload
//!
//! ## Quick reference
//! - **Producers**: the transport sink (`TransportSink::notify`).
//! - **Consumers**: the fan-out router
//!   (`HandlerRegistry::route`), which hands each
//!   notification to every handler that declared interest in its topic.

mod notification;
mod payload;
mod topic;

pub use notification::Notification;
pub use payload::{
    CheerPayload, FollowPayload, HypeTrainContribution, HypeTrainPayload, ModerateActionPayload,
    ModerateRaidInfo, RaidPayload, SubscribePayload,
};
pub use topic::{topics, Topic};
