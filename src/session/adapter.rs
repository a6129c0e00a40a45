//! # SessionAdapter: connect/disconnect/reconnect policy.
//!
//! Owns the [`Transport`] port and the shared session bookkeeping. All
//! transport operations are submitted through the
//! [`CommandGateway`](crate::dispatch::CommandGateway) so their completions
//! are logged on the consumer context, matching every other continuation in
//! the system.
//!
//! ## Rules
//! - `connect()` refuses synchronously with [`ConfigError::MissingChannelId`]
//!   when no channel identity is configured; this is the only error the
//!   adapter ever surfaces directly to a caller.
//! - `disconnect()` sets the manual-disconnect flag **before** submitting the
//!   close, so the disconnect callback that follows is classified as
//!   requested and the auto-reconnect is suppressed exactly once.
//! - An unrequested disconnect triggers `reconnect()` automatically; the
//!   engine calls [`SessionAdapter::handle_disconnected`] when it processes
//!   the lifecycle event.

use std::sync::atomic::Ordering as AtomicOrdering;
use std::sync::Arc;

use crate::config::ChannelConfig;
use crate::dispatch::CommandGateway;
use crate::error::ConfigError;
use crate::logging::Logger;

use super::state::SessionShared;
use super::transport::{Transport, TransportSink};

/// Policy layer over the physical transport.
pub struct SessionAdapter {
    transport: Arc<dyn Transport>,
    shared: Arc<SessionShared>,
    gateway: CommandGateway,
    logger: Logger,
    channel: ChannelConfig,
}

impl SessionAdapter {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        shared: Arc<SessionShared>,
        gateway: CommandGateway,
        logger: Logger,
        channel: ChannelConfig,
    ) -> Self {
        Self {
            transport,
            shared,
            gateway,
            logger,
            channel,
        }
    }

    /// Opens the connection.
    ///
    /// Fails synchronously when the channel identity is missing; otherwise
    /// the open request is submitted and its outcome is logged when the
    /// completion loops back through the dispatcher.
    pub fn connect(&self) -> Result<(), ConfigError> {
        if self.channel.channel_id.is_empty() {
            return Err(ConfigError::MissingChannelId);
        }

        let transport = Arc::clone(&self.transport);
        let ok_log = self.logger.clone();
        let err_log = self.logger.clone();
        self.gateway.submit(
            async move { transport.open().await },
            move |()| ok_log.info("transport connection request complete"),
            move |err| err_log.error(format!("transport connection error: {err}")),
        );
        Ok(())
    }

    /// Closes the connection intentionally.
    ///
    /// Sets the manual-disconnect flag first, guaranteeing the disconnect
    /// callback that follows does not trigger an auto-reconnect.
    pub fn disconnect(&self) {
        self.shared
            .manual_disconnect
            .store(true, AtomicOrdering::Release);

        let transport = Arc::clone(&self.transport);
        let ok_log = self.logger.clone();
        let err_log = self.logger.clone();
        self.gateway.submit(
            async move { transport.close().await },
            move |()| ok_log.info("transport disconnect request complete"),
            move |err| err_log.error(format!("transport disconnect error: {err}")),
        );
    }

    /// Re-establishes the connection for the same logical session.
    pub fn reconnect(&self) {
        let transport = Arc::clone(&self.transport);
        let ok_log = self.logger.clone();
        let err_log = self.logger.clone();
        self.gateway.submit(
            async move { transport.reopen().await },
            move |()| ok_log.info("transport reconnection request complete"),
            move |err| err_log.error(format!("transport reconnection error: {err}")),
        );
    }

    /// Current session id, if connected.
    ///
    /// The id recorded by the connect callback wins; before that callback has
    /// fired the transport's own knowledge is used as a fallback.
    pub fn session_id(&self) -> Option<Arc<str>> {
        self.shared
            .current_session_id()
            .or_else(|| self.transport.session_id())
    }

    /// Builds the sink handed to the transport at wiring time.
    pub(crate) fn sink(&self, dispatcher: crate::dispatch::Dispatcher) -> TransportSink {
        TransportSink::new(dispatcher, Arc::clone(&self.shared), self.logger.clone())
    }

    /// Reacts to a processed disconnect lifecycle event.
    ///
    /// Requested drops are final; anything else self-heals via reconnect.
    pub(crate) fn handle_disconnected(&self, requested: bool) {
        if requested {
            self.logger.info("transport disconnected (requested)");
        } else {
            self.logger
                .warning("transport disconnected, requires reconnect");
            self.reconnect();
        }
    }
}
