//! # The feature handler contract.

use std::sync::Arc;

use crate::config::ChannelConfig;
use crate::dispatch::CommandGateway;
use crate::error::DispatchError;
use crate::events::{Notification, Topic};
use crate::logging::Logger;
use crate::subscriptions::SubscriptionDescriptor;

/// Port over an out-of-band chat connection.
///
/// Becomes available at some point after construction; handlers are told via
/// [`FeatureHandler::on_chat_ready`].
pub trait ChatClient: Send + Sync + 'static {
    /// Sends a chat message to `channel`.
    fn send_message(&self, channel: &str, text: &str);
}

/// Engine collaborators handed to each feature at registration.
#[derive(Clone)]
pub struct FeatureContext {
    /// Gateway for outbound calls; completions come back on the consumer
    /// context.
    pub gateway: CommandGateway,
    /// Feature-visible logger.
    pub logger: Logger,
    /// Channel identity and credentials.
    pub channel: ChannelConfig,
}

/// One pluggable unit of channel behavior.
///
/// Every method runs on the consumer context, one at a time. Implementations
/// keep their state in plain fields; no interior mutability is needed.
pub trait FeatureHandler: Send + 'static {
    /// Stable feature name, used in logs and as the subscription owner.
    fn name(&self) -> &'static str;

    /// Topics this handler wants [`on_notification`](Self::on_notification)
    /// called for.
    fn topics(&self) -> Vec<Topic>;

    /// Called once at registration, before any other method.
    fn on_init(&mut self, _ctx: &FeatureContext) {}

    /// Subscriptions to create for the given session.
    ///
    /// Called on registration (if a session is already live) and again on
    /// every fresh session.
    fn subscriptions(&self, _session_id: &str) -> Vec<SubscriptionDescriptor> {
        vec![]
    }

    /// A fresh (non-reconnect) session was established; per-session state
    /// should be discarded.
    fn on_fresh_session(&mut self, _session_id: &str) {}

    /// The chat connection became available.
    fn on_chat_ready(&mut self, _chat: &Arc<dyn ChatClient>) {}

    /// All features are registered and initial setup is done.
    fn on_post_discovery(&mut self) {}

    /// One notification on a topic this handler declared interest in.
    ///
    /// An `Err` is an internal decoding/handling failure and is logged by the
    /// registry; delivery to other handlers continues either way.
    fn on_notification(&mut self, notification: &Notification) -> Result<(), DispatchError>;
}
