//! Error types used across the engine.
//!
//! The taxonomy mirrors how failures propagate at runtime:
//!
//! - [`ConfigError`] — wiring/identity problems, surfaced synchronously to the
//!   caller (the only errors that ever leave the engine directly).
//! - [`TransportError`] — physical connection failures; logged, drive the
//!   auto-reconnect path, never escalated to feature handlers.
//! - [`SubscriptionError`] — create-subscription contract violations and wire
//!   failures; logged with topic context, never retried automatically.
//! - [`DispatchError`] — a raw payload could not be translated into a domain
//!   event; that single delivery is dropped, routing continues.
//! - [`CommandError`] — terminal state of an outgoing command, delivered to
//!   the caller's error continuation on the consumer context.
//!
//! All types provide `as_label()` for stable snake_case identifiers in
//! logs/metrics.

use thiserror::Error;

/// # Configuration and wiring errors.
///
/// Surfaced synchronously from `connect()` or `EngineBuilder::build()`.
/// Nothing here is retried; the caller must fix the configuration.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Channel identity is missing; `connect()` refuses to start.
    #[error("channel id not set, did you forget to configure the channel?")]
    MissingChannelId,

    /// No transport port was supplied to the builder.
    #[error("no transport configured")]
    MissingTransport,

    /// No subscription registrar port was supplied to the builder.
    #[error("no subscription registrar configured")]
    MissingRegistrar,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingChannelId => "config_missing_channel_id",
            ConfigError::MissingTransport => "config_missing_transport",
            ConfigError::MissingRegistrar => "config_missing_registrar",
        }
    }
}

/// # Physical transport failures.
///
/// Raised by [`Transport`](crate::session::Transport) implementations. An
/// unexpected drop triggers an automatic reconnect unless the disconnect was
/// requested via `disconnect()`.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// Opening the physical connection failed.
    #[error("connect failed: {reason}")]
    ConnectFailed {
        /// Underlying failure description.
        reason: String,
    },

    /// The connection dropped mid-session.
    #[error("connection dropped: {reason}")]
    Dropped {
        /// Underlying failure description.
        reason: String,
    },

    /// Protocol-level error reported by the transport.
    #[error("transport error: {message}")]
    Protocol {
        /// Message supplied by the transport.
        message: String,
    },
}

impl TransportError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::ConnectFailed { .. } => "transport_connect_failed",
            TransportError::Dropped { .. } => "transport_dropped",
            TransportError::Protocol { .. } => "transport_protocol",
        }
    }
}

/// # Subscription lifecycle failures.
///
/// `InvalidRequest` is a contract error caught before anything is sent over
/// the wire. `CreateFailed` is the wire-level outcome; it is logged with the
/// topic/condition context and left to the caller to retry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SubscriptionError {
    /// A required request field was empty.
    #[error("{field} must be set")]
    InvalidRequest {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The registrar rejected or failed the create call.
    #[error("create-subscription failed for {topic}: {reason}")]
    CreateFailed {
        /// Topic of the attempted subscription.
        topic: String,
        /// Underlying failure description.
        reason: String,
    },
}

impl SubscriptionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscriptionError::InvalidRequest { .. } => "subscription_invalid_request",
            SubscriptionError::CreateFailed { .. } => "subscription_create_failed",
        }
    }
}

/// # Internal dispatch failures.
///
/// Returned by a handler when a raw payload cannot be translated into its
/// domain event. Logged as an internal error (distinct from user-code
/// failures); the notification is dropped for that handler only.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Payload did not match the expected shape for the topic.
    #[error("malformed payload for {topic}: {reason}")]
    MalformedPayload {
        /// Topic the payload arrived on.
        topic: String,
        /// Decode failure description.
        reason: String,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::MalformedPayload { .. } => "dispatch_malformed_payload",
        }
    }
}

/// # Terminal outcome of an outgoing command.
///
/// Delivered to the `on_err` continuation passed to
/// [`CommandGateway::submit`](crate::dispatch::CommandGateway::submit).
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum CommandError {
    /// The underlying call completed with an error.
    #[error("command failed: {reason}")]
    Failed {
        /// Underlying failure description.
        reason: String,
    },

    /// The command was cancelled via its
    /// [`CommandTicket`](crate::dispatch::CommandTicket) before completing.
    #[error("command cancelled")]
    Cancelled,
}

impl CommandError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CommandError::Failed { .. } => "command_failed",
            CommandError::Cancelled => "command_cancelled",
        }
    }
}
