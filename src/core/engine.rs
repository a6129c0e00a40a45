//! # The consumer loop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::dispatch::{panic_message, CommandGateway, Dispatcher, WorkItem, WorkQueue};
use crate::error::ConfigError;
use crate::handlers::{ChatClient, FeatureContext, FeatureHandler, HandlerRegistry};
use crate::logging::Logger;
use crate::session::{Session, SessionAdapter, SessionEvent};
use crate::subscriptions::SubscriptionManager;

/// Owns the consumer end of the work queue and every piece of feature state.
///
/// Exactly one context drives the engine, either by awaiting [`Engine::run`]
/// or by calling [`Engine::tick`] from a frame/update loop. All handler
/// methods, gateway continuations, and session processing execute here.
pub struct Engine {
    cfg: EngineConfig,
    dispatcher: Dispatcher,
    queue: WorkQueue,
    adapter: SessionAdapter,
    registry: HandlerRegistry,
    subscriptions: SubscriptionManager,
    gateway: CommandGateway,
    chat: Option<Arc<dyn ChatClient>>,
    session: Option<Session>,
    logger: Logger,
    ctx: FeatureContext,
}

impl Engine {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        cfg: EngineConfig,
        dispatcher: Dispatcher,
        queue: WorkQueue,
        adapter: SessionAdapter,
        registry: HandlerRegistry,
        subscriptions: SubscriptionManager,
        gateway: CommandGateway,
        chat: Option<Arc<dyn ChatClient>>,
        logger: Logger,
        ctx: FeatureContext,
    ) -> Self {
        Self {
            cfg,
            dispatcher,
            queue,
            adapter,
            registry,
            subscriptions,
            gateway,
            chat,
            session: None,
            logger,
            ctx,
        }
    }

    /// Registers a feature handler.
    ///
    /// The handler is initialized immediately; if a session is already live,
    /// its subscriptions are declared right away instead of waiting for the
    /// next fresh connect.
    pub fn register(&mut self, mut handler: Box<dyn FeatureHandler>) {
        handler.on_init(&self.ctx);
        if let Some(session) = &self.session {
            let session_id = Arc::clone(&session.id);
            self.subscriptions
                .declare(handler.subscriptions(&session_id), &session_id);
        }
        if let Some(chat) = &self.chat {
            handler.on_chat_ready(chat);
        }
        self.logger
            .info(format!("registered feature: {}", handler.name()));
        self.registry.push(handler);
    }

    /// Opens the transport connection.
    ///
    /// Fails synchronously only when the channel identity is missing.
    pub fn connect(&self) -> Result<(), ConfigError> {
        self.adapter.connect()
    }

    /// Closes the transport connection intentionally; no reconnect follows.
    pub fn disconnect(&self) {
        self.adapter.disconnect()
    }

    /// Signals that registration and initial setup are complete.
    pub fn post_discovery_setup(&mut self) {
        self.registry.post_discovery();
    }

    /// Announces a (possibly late) chat connection to every handler.
    ///
    /// Handlers registered afterwards are told at registration time.
    pub fn chat_ready(&mut self, chat: Arc<dyn ChatClient>) {
        self.registry.chat_ready(&chat);
        self.chat = Some(chat);
    }

    /// The live session, if connected (as far as the consumer has processed).
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Current session id as the transport layer knows it.
    ///
    /// Unlike [`Engine::session`], this does not wait for the `Connected`
    /// event to be drained; the sink records the id synchronously and the
    /// transport itself is consulted as a fallback.
    pub fn session_id(&self) -> Option<Arc<str>> {
        self.adapter.session_id()
    }

    /// Producer handle into the work queue.
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Gateway for outbound calls issued outside a feature handler.
    pub fn gateway(&self) -> CommandGateway {
        self.gateway.clone()
    }

    /// Drives the consumer loop until `shutdown` fires.
    ///
    /// Items are processed strictly one at a time in arrival order.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    self.logger.info("engine shutting down");
                    return;
                }
                item = self.queue.next() => {
                    match item {
                        Some(item) => self.process(item),
                        None => return,
                    }
                }
            }
        }
    }

    /// Drains up to `drain_batch` pending items without waiting.
    ///
    /// For embedders with their own frame loop; returns the number of items
    /// processed.
    pub fn tick(&mut self) -> usize {
        let mut processed = 0;
        while processed < self.cfg.drain_batch {
            match self.queue.try_next() {
                Some(item) => {
                    self.process(item);
                    processed += 1;
                }
                None => break,
            }
        }
        processed
    }

    fn process(&mut self, item: WorkItem) {
        match item {
            WorkItem::Session(event) => self.process_session_event(event),
            WorkItem::Notify(notification) => self.registry.route(&notification),
            WorkItem::Job(job) => {
                if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
                    self.logger.error(format!(
                        "queued continuation panicked: {}",
                        panic_message(panic.as_ref())
                    ));
                }
            }
        }
    }

    fn process_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected { session } => {
                self.logger.info(format!(
                    "session connected: {} (reconnect={})",
                    session.id, session.is_reconnect
                ));
                let fresh = !session.is_reconnect;
                self.session = Some(session.clone());
                if fresh {
                    self.subscriptions.reset();
                    self.registry.fresh_session(&session.id);
                    let descriptors = self.registry.collect_subscriptions(&session.id);
                    self.subscriptions.declare(descriptors, &session.id);
                }
            }
            SessionEvent::Disconnected { requested } => {
                self.session = None;
                self.adapter.handle_disconnected(requested);
            }
            SessionEvent::Reconnected => {
                // Same logical session: subscriptions are retained
                // server-side, nothing to re-declare.
                self.logger.info("session resumed on a new connection");
            }
            SessionEvent::TransportError { message } => {
                self.logger.error(format!("transport error: {message}"));
            }
        }
    }
}
