//! # Cheer (bits) tracking.

use crate::error::DispatchError;
use crate::events::{topics, CheerPayload, Notification, Topic};
use crate::handlers::{FeatureContext, FeatureHandler};
use crate::logging::Logger;
use crate::subscriptions::SubscriptionDescriptor;

/// Tracks `channel.cheer` notifications for the current session.
pub struct BitsTracker {
    logger: Logger,
    channel_id: String,
    cheers_this_session: Vec<CheerPayload>,
    on_cheer: Option<Box<dyn FnMut(&CheerPayload) + Send>>,
}

impl BitsTracker {
    pub fn new() -> Self {
        Self {
            logger: Logger::disabled(),
            channel_id: String::new(),
            cheers_this_session: Vec::new(),
            on_cheer: None,
        }
    }

    /// Registers a callback invoked on the consumer context for each cheer.
    #[must_use]
    pub fn with_on_cheer(mut self, f: impl FnMut(&CheerPayload) + Send + 'static) -> Self {
        self.on_cheer = Some(Box::new(f));
        self
    }

    /// Cheers observed since the current fresh session began.
    pub fn cheers_this_session(&self) -> &[CheerPayload] {
        &self.cheers_this_session
    }

    /// Total bits cheered since the current fresh session began.
    pub fn bits_this_session(&self) -> u64 {
        self.cheers_this_session.iter().map(|c| c.bits).sum()
    }
}

impl Default for BitsTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureHandler for BitsTracker {
    fn name(&self) -> &'static str {
        "bits"
    }

    fn topics(&self) -> Vec<Topic> {
        vec![Topic::from(topics::CHANNEL_CHEER)]
    }

    fn on_init(&mut self, ctx: &FeatureContext) {
        self.logger = ctx.logger.clone();
        self.channel_id = ctx.channel.channel_id.clone();
    }

    fn subscriptions(&self, _session_id: &str) -> Vec<SubscriptionDescriptor> {
        vec![
            SubscriptionDescriptor::new(topics::CHANNEL_CHEER, "1", self.name())
                .with_condition("broadcaster_user_id", self.channel_id.clone()),
        ]
    }

    fn on_fresh_session(&mut self, _session_id: &str) {
        self.cheers_this_session.clear();
    }

    fn on_notification(&mut self, notification: &Notification) -> Result<(), DispatchError> {
        let payload: CheerPayload = notification.decode()?;
        let who = payload
            .user_name
            .as_deref()
            .filter(|_| !payload.is_anonymous)
            .unwrap_or("anonymous");
        self.logger
            .info(format!("{who} cheered {} bits", payload.bits));
        if let Some(cb) = self.on_cheer.as_mut() {
            cb(&payload);
        }
        self.cheers_this_session.push(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accumulates_bits() {
        let mut tracker = BitsTracker::new();
        for bits in [100u64, 250] {
            let n = Notification::new(
                Topic::from(topics::CHANNEL_CHEER),
                json!({ "user_id": "9", "user_name": "ada", "bits": bits }),
            );
            tracker.on_notification(&n).unwrap();
        }
        assert_eq!(tracker.cheers_this_session().len(), 2);
        assert_eq!(tracker.bits_this_session(), 350);
    }

    #[test]
    fn test_anonymous_cheer_decodes() {
        let mut tracker = BitsTracker::new();
        let n = Notification::new(
            Topic::from(topics::CHANNEL_CHEER),
            json!({ "user_id": null, "user_name": null, "is_anonymous": true, "bits": 50 }),
        );
        tracker.on_notification(&n).unwrap();
        assert!(tracker.cheers_this_session()[0].is_anonymous);
    }
}
