//! # Fan-out router over registered feature handlers.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::dispatch::panic_message;
use crate::events::Notification;
use crate::logging::Logger;
use crate::subscriptions::SubscriptionDescriptor;

use super::handler::{ChatClient, FeatureHandler};

/// Owns every registered handler and routes notifications to them.
///
/// Lives on the consumer context; handlers are driven strictly one at a time
/// in registration order.
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn FeatureHandler>>,
    logger: Logger,
}

impl HandlerRegistry {
    pub(crate) fn new(logger: Logger) -> Self {
        Self {
            handlers: Vec::new(),
            logger,
        }
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn push(&mut self, handler: Box<dyn FeatureHandler>) {
        self.handlers.push(handler);
    }

    /// Delivers one notification to every handler whose `topics()` include
    /// its topic, in registration order.
    ///
    /// Two failure classes, both contained:
    /// - `Err(DispatchError)` from a handler is an internal failure (e.g. a
    ///   payload that fails to decode) and is logged as such.
    /// - A panic is a user-code failure; it is caught, logged with the
    ///   handler's name, and the remaining handlers still run.
    pub fn route(&mut self, notification: &Notification) {
        for handler in &mut self.handlers {
            if !handler.topics().contains(&notification.topic) {
                continue;
            }
            let name = handler.name();
            let outcome =
                catch_unwind(AssertUnwindSafe(|| handler.on_notification(notification)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    self.logger.error(format!(
                        "internal error dispatching {} to {name}: {err}",
                        notification.topic
                    ));
                }
                Err(panic) => {
                    self.logger.error(format!(
                        "handler {name} panicked on {}: {}",
                        notification.topic,
                        panic_message(panic.as_ref())
                    ));
                }
            }
        }
    }

    /// Collects subscription declarations from every handler, in
    /// registration order.
    pub fn collect_subscriptions(&self, session_id: &str) -> Vec<SubscriptionDescriptor> {
        self.handlers
            .iter()
            .flat_map(|h| h.subscriptions(session_id))
            .collect()
    }

    pub(crate) fn fresh_session(&mut self, session_id: &str) {
        for handler in &mut self.handlers {
            handler.on_fresh_session(session_id);
        }
    }

    pub(crate) fn chat_ready(&mut self, chat: &Arc<dyn ChatClient>) {
        for handler in &mut self.handlers {
            handler.on_chat_ready(chat);
        }
    }

    pub(crate) fn post_discovery(&mut self) {
        for handler in &mut self.handlers {
            handler.on_post_discovery();
        }
    }
}
