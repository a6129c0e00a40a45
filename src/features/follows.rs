//! # Follow tracking.

use crate::error::DispatchError;
use crate::events::{topics, FollowPayload, Notification, Topic};
use crate::handlers::{FeatureContext, FeatureHandler};
use crate::logging::Logger;
use crate::subscriptions::SubscriptionDescriptor;

/// Tracks `channel.follow` notifications for the current session.
pub struct FollowTracker {
    logger: Logger,
    channel_id: String,
    follows_this_session: Vec<FollowPayload>,
    on_follow: Option<Box<dyn FnMut(&FollowPayload) + Send>>,
}

impl FollowTracker {
    pub fn new() -> Self {
        Self {
            logger: Logger::disabled(),
            channel_id: String::new(),
            follows_this_session: Vec::new(),
            on_follow: None,
        }
    }

    /// Registers a callback invoked on the consumer context for each follow.
    #[must_use]
    pub fn with_on_follow(mut self, f: impl FnMut(&FollowPayload) + Send + 'static) -> Self {
        self.on_follow = Some(Box::new(f));
        self
    }

    /// Follows observed since the current fresh session began.
    pub fn follows_this_session(&self) -> &[FollowPayload] {
        &self.follows_this_session
    }
}

impl Default for FollowTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureHandler for FollowTracker {
    fn name(&self) -> &'static str {
        "follows"
    }

    fn topics(&self) -> Vec<Topic> {
        vec![Topic::from(topics::CHANNEL_FOLLOW)]
    }

    fn on_init(&mut self, ctx: &FeatureContext) {
        self.logger = ctx.logger.clone();
        self.channel_id = ctx.channel.channel_id.clone();
    }

    fn subscriptions(&self, _session_id: &str) -> Vec<SubscriptionDescriptor> {
        // channel.follow v2 requires a moderator condition; the broadcaster
        // moderates their own channel.
        vec![
            SubscriptionDescriptor::new(topics::CHANNEL_FOLLOW, "2", self.name())
                .with_condition("broadcaster_user_id", self.channel_id.clone())
                .with_condition("moderator_user_id", self.channel_id.clone()),
        ]
    }

    fn on_fresh_session(&mut self, _session_id: &str) {
        self.follows_this_session.clear();
    }

    fn on_notification(&mut self, notification: &Notification) -> Result<(), DispatchError> {
        let payload: FollowPayload = notification.decode()?;
        self.logger
            .info(format!("new follower: {}", payload.user_name));
        if let Some(cb) = self.on_follow.as_mut() {
            cb(&payload);
        }
        self.follows_this_session.push(payload);
        Ok(())
    }
}
