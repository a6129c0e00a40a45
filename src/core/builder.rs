//! # Engine wiring.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::dispatch::{CommandGateway, WorkQueue};
use crate::error::ConfigError;
use crate::handlers::{ChatClient, FeatureContext, HandlerRegistry};
use crate::logging::{ConsoleLog, LogSink, Logger};
use crate::session::{SessionAdapter, SessionShared, Transport};
use crate::subscriptions::{Registrar, SubscriptionManager};

use super::engine::Engine;

/// Assembles an [`Engine`] from its ports.
///
/// Transport and registrar are mandatory; chat is optional; the log sink
/// defaults to [`ConsoleLog`].
pub struct EngineBuilder {
    cfg: EngineConfig,
    transport: Option<Arc<dyn Transport>>,
    registrar: Option<Arc<dyn Registrar>>,
    chat: Option<Arc<dyn ChatClient>>,
    log_sink: Option<Arc<dyn LogSink>>,
}

impl EngineBuilder {
    /// Starts a builder from the given configuration.
    pub fn new(cfg: EngineConfig) -> Self {
        Self {
            cfg,
            transport: None,
            registrar: None,
            chat: None,
            log_sink: None,
        }
    }

    /// Supplies the transport port (mandatory).
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Supplies the subscription registrar port (mandatory).
    #[must_use]
    pub fn with_registrar(mut self, registrar: Arc<dyn Registrar>) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// Supplies the chat port; handlers are told via `on_chat_ready`.
    #[must_use]
    pub fn with_chat(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Replaces the default console log sink.
    #[must_use]
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Wires everything together.
    ///
    /// Binds the transport to its sink as the last step, so callbacks fired
    /// immediately after `build()` land in a fully-wired queue.
    pub fn build(self) -> Result<Engine, ConfigError> {
        let transport = self.transport.ok_or(ConfigError::MissingTransport)?;
        let registrar = self.registrar.ok_or(ConfigError::MissingRegistrar)?;

        let sink = self
            .log_sink
            .unwrap_or_else(|| Arc::new(ConsoleLog::new()));
        let logger = Logger::new(sink, self.cfg.log_level);

        let (dispatcher, queue) = WorkQueue::channel();
        let gateway = CommandGateway::new(dispatcher.clone(), logger.clone());
        let shared = Arc::new(SessionShared::default());
        let adapter = SessionAdapter::new(
            transport.clone(),
            Arc::clone(&shared),
            gateway.clone(),
            logger.clone(),
            self.cfg.channel.clone(),
        );
        transport.bind(adapter.sink(dispatcher.clone()));

        let registry = HandlerRegistry::new(logger.clone());
        let subscriptions = SubscriptionManager::new(
            registrar,
            gateway.clone(),
            logger.clone(),
            self.cfg.channel.clone(),
        );
        let ctx = FeatureContext {
            gateway: gateway.clone(),
            logger: logger.clone(),
            channel: self.cfg.channel.clone(),
        };

        Ok(Engine::new(
            self.cfg,
            dispatcher,
            queue,
            adapter,
            registry,
            subscriptions,
            gateway,
            self.chat,
            logger,
            ctx,
        ))
    }
}
