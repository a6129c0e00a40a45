//! # Per-session subscription bookkeeping.
//!
//! [`SubscriptionManager`] owns the "already requested" set for the current
//! session. All mutation happens on the consumer context, so no lock guards
//! the set; the only async boundary is the create call itself, which goes
//! through the [`CommandGateway`](crate::dispatch::CommandGateway) and logs
//! its outcome back on the consumer context.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::ChannelConfig;
use crate::dispatch::CommandGateway;
use crate::logging::Logger;

use super::descriptor::{SubscriptionDescriptor, SubscriptionKey};
use super::registrar::{Registrar, SubscriptionRequest};

/// Translates feature declarations into deduplicated create-subscription
/// calls.
pub struct SubscriptionManager {
    registrar: Arc<dyn Registrar>,
    gateway: CommandGateway,
    logger: Logger,
    channel: ChannelConfig,
    requested: HashSet<SubscriptionKey>,
}

impl SubscriptionManager {
    pub(crate) fn new(
        registrar: Arc<dyn Registrar>,
        gateway: CommandGateway,
        logger: Logger,
        channel: ChannelConfig,
    ) -> Self {
        Self {
            registrar,
            gateway,
            logger,
            channel,
            requested: HashSet::new(),
        }
    }

    /// Clears the per-session bookkeeping.
    ///
    /// Called on every fresh (non-reconnect) connect: the previous session's
    /// subscriptions are gone server-side, so every tuple must be re-created.
    pub fn reset(&mut self) {
        self.requested.clear();
    }

    /// Number of unique tuples requested for the current session.
    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }

    /// Declares a batch of descriptors for `session_id`.
    ///
    /// The key is recorded *before* the create call is issued, guaranteeing
    /// at most one outstanding call per unique tuple per session. Later
    /// requesters of an already-recorded tuple are skipped with an info log
    /// naming the owner.
    pub fn declare(&mut self, descriptors: Vec<SubscriptionDescriptor>, session_id: &Arc<str>) {
        for descriptor in descriptors {
            if !self.requested.insert(descriptor.key()) {
                self.logger.info(format!(
                    "subscription {} already requested this session, skipping (owner={})",
                    descriptor.topic, descriptor.owner
                ));
                continue;
            }
            self.create(descriptor, Arc::clone(session_id));
        }
    }

    fn create(&self, descriptor: SubscriptionDescriptor, session_id: Arc<str>) {
        let request = SubscriptionRequest {
            topic: descriptor.topic.clone(),
            version: descriptor.version.clone(),
            condition: descriptor.condition.clone(),
            session_id,
            client_id: self.channel.client_id.clone(),
            access_token: self.channel.access_token.clone(),
        };

        if let Err(err) = request.validate() {
            self.logger.error(format!(
                "invalid subscription request for {} (owner={}): {err}",
                descriptor.topic, descriptor.owner
            ));
            return;
        }

        let registrar = Arc::clone(&self.registrar);
        let ok_log = self.logger.clone();
        let err_log = self.logger.clone();
        let topic = descriptor.topic.clone();
        let err_topic = descriptor.topic;
        self.gateway.submit(
            async move { registrar.create_subscription(request).await },
            move |handle| {
                ok_log.info(format!("subscription created: {topic} (id={})", handle.id));
            },
            move |err| {
                err_log.error(format!(
                    "create-subscription failed for {err_topic}: {err}"
                ));
            },
        );
    }
}
