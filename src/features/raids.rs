//! # Incoming and outgoing raid handling.
//!
//! Incoming raids arrive as `channel.raid` notifications. Outgoing raids are
//! started through the [`RaidApi`] port; their authoritative state is the
//! `channel.moderate` stream, which reports `raid` and `unraid` actions
//! regardless of who initiated them.

use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::{CommandGateway, CommandTicket};
use crate::error::{CommandError, DispatchError};
use crate::events::{
    topics, ModerateActionPayload, ModerateRaidInfo, Notification, RaidPayload, Topic,
};
use crate::handlers::{FeatureContext, FeatureHandler};
use crate::logging::Logger;
use crate::subscriptions::SubscriptionDescriptor;

/// Port over the raid-controlling API collaborator.
#[async_trait]
pub trait RaidApi: Send + Sync + 'static {
    /// Starts a raid from `from_broadcaster_id` to `to_broadcaster_id`.
    async fn start_raid(
        &self,
        from_broadcaster_id: &str,
        to_broadcaster_id: &str,
    ) -> Result<OutgoingRaid, CommandError>;

    /// Cancels the pending raid of `broadcaster_id`.
    async fn cancel_raid(&self, broadcaster_id: &str) -> Result<(), CommandError>;
}

/// Acknowledgement of a started raid.
#[derive(Clone, Debug)]
pub struct OutgoingRaid {
    /// Raid target's broadcaster id.
    pub to_broadcaster_id: String,
}

/// Tracks incoming raids and the channel's pending outgoing raid.
pub struct RaidWatcher {
    api: Arc<dyn RaidApi>,
    gateway: Option<CommandGateway>,
    logger: Logger,
    channel_id: String,
    raids_this_session: Vec<RaidPayload>,
    pending_raid: Option<ModerateRaidInfo>,
    on_raid: Option<Box<dyn FnMut(&RaidPayload) + Send>>,
}

impl RaidWatcher {
    pub fn new(api: Arc<dyn RaidApi>) -> Self {
        Self {
            api,
            gateway: None,
            logger: Logger::disabled(),
            channel_id: String::new(),
            raids_this_session: Vec::new(),
            pending_raid: None,
            on_raid: None,
        }
    }

    /// Registers a callback invoked on the consumer context for each
    /// incoming raid.
    #[must_use]
    pub fn with_on_raid(mut self, f: impl FnMut(&RaidPayload) + Send + 'static) -> Self {
        self.on_raid = Some(Box::new(f));
        self
    }

    /// Incoming raids observed since the current fresh session began.
    pub fn raids_this_session(&self) -> &[RaidPayload] {
        &self.raids_this_session
    }

    /// The channel's currently pending outgoing raid, if any.
    ///
    /// Set and cleared by `channel.moderate` notifications, never by the
    /// start/cancel calls themselves.
    pub fn pending_raid(&self) -> Option<&ModerateRaidInfo> {
        self.pending_raid.as_ref()
    }

    /// Starts a raid to `to_broadcaster_id`.
    ///
    /// Returns `None` when called before registration. The pending state is
    /// not touched here: confirmation arrives via `channel.moderate`.
    pub fn start_raid(&self, to_broadcaster_id: impl Into<String>) -> Option<CommandTicket> {
        let gateway = self.gateway.as_ref()?;
        let api = Arc::clone(&self.api);
        let from = self.channel_id.clone();
        let to = to_broadcaster_id.into();
        let ok_log = self.logger.clone();
        let err_log = self.logger.clone();
        Some(gateway.submit(
            async move { api.start_raid(&from, &to).await },
            move |raid| ok_log.info(format!("raid started toward {}", raid.to_broadcaster_id)),
            move |err| err_log.error(format!("start-raid failed: {err}")),
        ))
    }

    /// Cancels the channel's pending outgoing raid.
    pub fn cancel_raid(&self) -> Option<CommandTicket> {
        let gateway = self.gateway.as_ref()?;
        let api = Arc::clone(&self.api);
        let broadcaster = self.channel_id.clone();
        let ok_log = self.logger.clone();
        let err_log = self.logger.clone();
        Some(gateway.submit(
            async move { api.cancel_raid(&broadcaster).await },
            move |()| ok_log.info("raid cancelled".to_string()),
            move |err| err_log.error(format!("cancel-raid failed: {err}")),
        ))
    }

    fn on_incoming(&mut self, notification: &Notification) -> Result<(), DispatchError> {
        let payload: RaidPayload = notification.decode()?;
        self.logger.info(format!(
            "incoming raid from {} ({} viewers)",
            payload.from_broadcaster_user_name, payload.viewers
        ));
        if let Some(cb) = self.on_raid.as_mut() {
            cb(&payload);
        }
        self.raids_this_session.push(payload);
        Ok(())
    }

    fn on_moderate(&mut self, notification: &Notification) -> Result<(), DispatchError> {
        let payload: ModerateActionPayload = notification.decode()?;
        match payload.action.as_str() {
            "raid" => {
                if let Some(raid) = payload.raid {
                    self.logger
                        .info(format!("outgoing raid pending toward {}", raid.user_name));
                    self.pending_raid = Some(raid);
                }
            }
            "unraid" => {
                self.pending_raid = None;
            }
            _ => {}
        }
        Ok(())
    }
}

impl FeatureHandler for RaidWatcher {
    fn name(&self) -> &'static str {
        "raids"
    }

    fn topics(&self) -> Vec<Topic> {
        vec![
            Topic::from(topics::CHANNEL_RAID),
            Topic::from(topics::CHANNEL_MODERATE),
        ]
    }

    fn on_init(&mut self, ctx: &FeatureContext) {
        self.gateway = Some(ctx.gateway.clone());
        self.logger = ctx.logger.clone();
        self.channel_id = ctx.channel.channel_id.clone();
    }

    fn subscriptions(&self, _session_id: &str) -> Vec<SubscriptionDescriptor> {
        vec![
            SubscriptionDescriptor::new(topics::CHANNEL_RAID, "1", self.name())
                .with_condition("to_broadcaster_user_id", self.channel_id.clone()),
            SubscriptionDescriptor::new(topics::CHANNEL_MODERATE, "2", self.name())
                .with_condition("broadcaster_user_id", self.channel_id.clone())
                .with_condition("moderator_user_id", self.channel_id.clone()),
        ]
    }

    fn on_fresh_session(&mut self, _session_id: &str) {
        self.raids_this_session.clear();
        // A pending raid either fired or expired while we were away; stale
        // state here would block the next start_raid decision.
        self.pending_raid = None;
    }

    fn on_notification(&mut self, notification: &Notification) -> Result<(), DispatchError> {
        match notification.topic.as_str() {
            topics::CHANNEL_RAID => self.on_incoming(notification),
            topics::CHANNEL_MODERATE => self.on_moderate(notification),
            other => Err(DispatchError::MalformedPayload {
                topic: other.to_string(),
                reason: "unexpected topic routed to raid watcher".into(),
            }),
        }
    }
}
