//! # Hype train tracking.

use crate::error::DispatchError;
use crate::events::{
    topics, HypeTrainContribution, HypeTrainPayload, Notification, Topic,
};
use crate::handlers::{FeatureContext, FeatureHandler};
use crate::logging::Logger;
use crate::subscriptions::SubscriptionDescriptor;

/// Follows a hype train through its begin/progress/end topics.
///
/// State reflects the most recent train: `begin` resets everything,
/// `progress` updates level and totals, `end` freezes the result until the
/// next train begins.
pub struct HypeTrainTracker {
    logger: Logger,
    channel_id: String,
    level: u32,
    total: u64,
    top_contributions: Vec<HypeTrainContribution>,
    last_contribution: Option<HypeTrainContribution>,
    started_at: Option<String>,
    ended_at: Option<String>,
    active: bool,
    on_begin: Option<Box<dyn FnMut(&HypeTrainPayload) + Send>>,
    on_progress: Option<Box<dyn FnMut(&HypeTrainPayload) + Send>>,
    on_end: Option<Box<dyn FnMut(&HypeTrainPayload) + Send>>,
}

impl HypeTrainTracker {
    pub fn new() -> Self {
        Self {
            logger: Logger::disabled(),
            channel_id: String::new(),
            level: 0,
            total: 0,
            top_contributions: Vec::new(),
            last_contribution: None,
            started_at: None,
            ended_at: None,
            active: false,
            on_begin: None,
            on_progress: None,
            on_end: None,
        }
    }

    #[must_use]
    pub fn with_on_begin(mut self, f: impl FnMut(&HypeTrainPayload) + Send + 'static) -> Self {
        self.on_begin = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_on_progress(mut self, f: impl FnMut(&HypeTrainPayload) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_on_end(mut self, f: impl FnMut(&HypeTrainPayload) + Send + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }

    /// Current (or final, once ended) hype train level.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Accumulated contribution total.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// True between a `begin` and its matching `end`.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Top contributors of the current/last train.
    pub fn top_contributions(&self) -> &[HypeTrainContribution] {
        &self.top_contributions
    }

    /// Most recent contribution of the current/last train.
    pub fn last_contribution(&self) -> Option<&HypeTrainContribution> {
        self.last_contribution.as_ref()
    }

    /// When the current/last train started, as reported by the server.
    pub fn started_at(&self) -> Option<&str> {
        self.started_at.as_deref()
    }

    /// When the last train ended; `None` while a train is running.
    pub fn ended_at(&self) -> Option<&str> {
        self.ended_at.as_deref()
    }

    fn absorb(&mut self, payload: &HypeTrainPayload) {
        self.level = payload.level;
        self.total = payload.total;
        self.top_contributions = payload.top_contributions.clone();
        if let Some(last) = &payload.last_contribution {
            self.last_contribution = Some(last.clone());
        }
        if let Some(started) = &payload.started_at {
            self.started_at = Some(started.clone());
        }
    }
}

impl Default for HypeTrainTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureHandler for HypeTrainTracker {
    fn name(&self) -> &'static str {
        "hype_train"
    }

    fn topics(&self) -> Vec<Topic> {
        vec![
            Topic::from(topics::HYPE_TRAIN_BEGIN),
            Topic::from(topics::HYPE_TRAIN_PROGRESS),
            Topic::from(topics::HYPE_TRAIN_END),
        ]
    }

    fn on_init(&mut self, ctx: &FeatureContext) {
        self.logger = ctx.logger.clone();
        self.channel_id = ctx.channel.channel_id.clone();
    }

    fn subscriptions(&self, _session_id: &str) -> Vec<SubscriptionDescriptor> {
        [
            topics::HYPE_TRAIN_BEGIN,
            topics::HYPE_TRAIN_PROGRESS,
            topics::HYPE_TRAIN_END,
        ]
        .into_iter()
        .map(|topic| {
            SubscriptionDescriptor::new(topic, "1", self.name())
                .with_condition("broadcaster_user_id", self.channel_id.clone())
        })
        .collect()
    }

    fn on_fresh_session(&mut self, _session_id: &str) {
        self.level = 0;
        self.total = 0;
        self.top_contributions.clear();
        self.last_contribution = None;
        self.started_at = None;
        self.ended_at = None;
        self.active = false;
    }

    fn on_notification(&mut self, notification: &Notification) -> Result<(), DispatchError> {
        let payload: HypeTrainPayload = notification.decode()?;
        match notification.topic.as_str() {
            topics::HYPE_TRAIN_BEGIN => {
                self.on_fresh_session("");
                self.active = true;
                self.absorb(&payload);
                self.logger.info("hype train started".to_string());
                if let Some(cb) = self.on_begin.as_mut() {
                    cb(&payload);
                }
            }
            topics::HYPE_TRAIN_PROGRESS => {
                self.active = true;
                self.absorb(&payload);
                if let Some(cb) = self.on_progress.as_mut() {
                    cb(&payload);
                }
            }
            topics::HYPE_TRAIN_END => {
                self.active = false;
                self.absorb(&payload);
                self.ended_at = payload.ended_at.clone();
                self.logger.info(format!(
                    "hype train ended at level {} (total {})",
                    self.level, self.total
                ));
                if let Some(cb) = self.on_end.as_mut() {
                    cb(&payload);
                }
            }
            other => {
                return Err(DispatchError::MalformedPayload {
                    topic: other.to_string(),
                    reason: "unexpected topic routed to hype train tracker".into(),
                });
            }
        }
        Ok(())
    }
}
