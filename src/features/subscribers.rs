//! # Subscriber tracking.

use crate::error::DispatchError;
use crate::events::{topics, Notification, SubscribePayload, Topic};
use crate::handlers::{FeatureContext, FeatureHandler};
use crate::logging::Logger;
use crate::subscriptions::SubscriptionDescriptor;

/// Tracks `channel.subscribe` notifications for the current session.
///
/// Gift subs are tallied separately: the gifter is recorded alongside the
/// recipient so gratitude can be routed to the right person.
pub struct SubscriberTracker {
    logger: Logger,
    channel_id: String,
    subscribers_this_session: Vec<SubscribePayload>,
    gifters_this_session: Vec<String>,
    on_subscribe: Option<Box<dyn FnMut(&SubscribePayload) + Send>>,
}

impl SubscriberTracker {
    pub fn new() -> Self {
        Self {
            logger: Logger::disabled(),
            channel_id: String::new(),
            subscribers_this_session: Vec::new(),
            gifters_this_session: Vec::new(),
            on_subscribe: None,
        }
    }

    /// Registers a callback invoked on the consumer context for each sub.
    #[must_use]
    pub fn with_on_subscribe(
        mut self,
        f: impl FnMut(&SubscribePayload) + Send + 'static,
    ) -> Self {
        self.on_subscribe = Some(Box::new(f));
        self
    }

    /// Subscriptions observed since the current fresh session began.
    pub fn subscribers_this_session(&self) -> &[SubscribePayload] {
        &self.subscribers_this_session
    }

    /// Gifters observed since the current fresh session began.
    pub fn gifters_this_session(&self) -> &[String] {
        &self.gifters_this_session
    }
}

impl Default for SubscriberTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureHandler for SubscriberTracker {
    fn name(&self) -> &'static str {
        "subscribers"
    }

    fn topics(&self) -> Vec<Topic> {
        vec![Topic::from(topics::CHANNEL_SUBSCRIBE)]
    }

    fn on_init(&mut self, ctx: &FeatureContext) {
        self.logger = ctx.logger.clone();
        self.channel_id = ctx.channel.channel_id.clone();
    }

    fn subscriptions(&self, _session_id: &str) -> Vec<SubscriptionDescriptor> {
        vec![
            SubscriptionDescriptor::new(topics::CHANNEL_SUBSCRIBE, "1", self.name())
                .with_condition("broadcaster_user_id", self.channel_id.clone()),
        ]
    }

    fn on_fresh_session(&mut self, _session_id: &str) {
        self.subscribers_this_session.clear();
        self.gifters_this_session.clear();
    }

    fn on_notification(&mut self, notification: &Notification) -> Result<(), DispatchError> {
        let payload: SubscribePayload = notification.decode()?;
        if payload.is_gift {
            let gifter = payload
                .gifter_user_name
                .clone()
                .unwrap_or_else(|| "anonymous".to_string());
            self.logger.info(format!(
                "{gifter} gifted a tier {} sub to {}",
                payload.tier, payload.user_name
            ));
            self.gifters_this_session.push(gifter);
        } else {
            self.logger.info(format!(
                "{} subscribed at tier {}",
                payload.user_name, payload.tier
            ));
        }
        if let Some(cb) = self.on_subscribe.as_mut() {
            cb(&payload);
        }
        self.subscribers_this_session.push(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gift_subs_record_gifter() {
        let mut tracker = SubscriberTracker::new();
        let n = Notification::new(
            Topic::from(topics::CHANNEL_SUBSCRIBE),
            json!({
                "user_id": "9",
                "user_name": "ada",
                "tier": "1000",
                "is_gift": true,
                "gifter_user_name": "grace"
            }),
        );
        tracker.on_notification(&n).unwrap();
        assert_eq!(tracker.subscribers_this_session().len(), 1);
        assert_eq!(tracker.gifters_this_session(), ["grace"]);
    }

    #[test]
    fn test_direct_sub_records_no_gifter() {
        let mut tracker = SubscriberTracker::new();
        let n = Notification::new(
            Topic::from(topics::CHANNEL_SUBSCRIBE),
            json!({ "user_id": "9", "user_name": "ada", "tier": "2000" }),
        );
        tracker.on_notification(&n).unwrap();
        assert!(tracker.gifters_this_session().is_empty());
    }
}
