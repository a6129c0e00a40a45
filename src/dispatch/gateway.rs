//! # Outgoing command gateway.
//!
//! Wraps asynchronous outbound calls (start a raid, create a subscription,
//! open the transport) so their continuations always execute on the consumer
//! context — the same context notifications are delivered on. User code never
//! reasons about two concurrency domains.
//!
//! ## Flow
//! ```text
//! submit(fut, on_ok, on_err) ──► tokio::spawn(fut)
//!                                     │ completion (worker thread)
//!                                     ▼
//!                     Dispatcher::enqueue(Job(on_ok / on_err))
//!                                     │
//!                                     ▼
//!                        Engine drain ──► continuation runs
//! ```
//!
//! ## Rules
//! - A failed call routes to `on_err(CommandError::Failed)`.
//! - A panic inside the future is caught, logged, and swallowed; neither
//!   continuation runs (the consumer loop must never die for a broken call).
//! - Cancellation is first-class: [`CommandTicket::cancel`] drops the
//!   in-flight future and delivers `on_err(CommandError::Cancelled)` through
//!   the dispatcher.

use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::CommandError;
use crate::logging::Logger;

use super::queue::Dispatcher;

/// Submits outbound calls and marshals their completions back through the
/// dispatcher.
#[derive(Clone)]
pub struct CommandGateway {
    dispatcher: Dispatcher,
    logger: Logger,
}

impl CommandGateway {
    /// Creates a gateway feeding the given dispatcher.
    pub fn new(dispatcher: Dispatcher, logger: Logger) -> Self {
        Self { dispatcher, logger }
    }

    /// Submits one outbound call.
    ///
    /// Exactly one of `on_ok`/`on_err` runs, on the consumer context, unless
    /// the call panics (logged, swallowed) or the process ends first.
    ///
    /// The returned [`CommandTicket`] cancels the call: the future is dropped
    /// at the next await point and `on_err(CommandError::Cancelled)` is
    /// delivered.
    pub fn submit<T, E, Fut>(
        &self,
        command: Fut,
        on_ok: impl FnOnce(T) + Send + 'static,
        on_err: impl FnOnce(CommandError) + Send + 'static,
    ) -> CommandTicket
    where
        T: Send + 'static,
        E: Display + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let token = CancellationToken::new();
        let guard = token.clone();
        let dispatcher = self.dispatcher.clone();
        let logger = self.logger.clone();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = guard.cancelled() => None,
                res = AssertUnwindSafe(command).catch_unwind() => Some(res),
            };

            match outcome {
                None => {
                    dispatcher.enqueue_job(move || on_err(CommandError::Cancelled));
                }
                Some(Ok(Ok(value))) => {
                    dispatcher.enqueue_job(move || on_ok(value));
                }
                Some(Ok(Err(err))) => {
                    let reason = err.to_string();
                    dispatcher.enqueue_job(move || on_err(CommandError::Failed { reason }));
                }
                Some(Err(panic)) => {
                    logger.error(format!(
                        "outgoing command panicked: {}",
                        panic_message(panic.as_ref())
                    ));
                }
            }
        });

        CommandTicket { token }
    }
}

/// Handle to one in-flight outbound call.
pub struct CommandTicket {
    token: CancellationToken,
}

impl CommandTicket {
    /// Cancels the call; its `on_err` continuation receives
    /// [`CommandError::Cancelled`].
    ///
    /// Idempotent; cancelling after completion has no effect.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once `cancel()` was called.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{WorkItem, WorkQueue};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn drain_jobs(queue: &mut WorkQueue) -> usize {
        let mut n = 0;
        while let Some(item) = queue.try_next() {
            if let WorkItem::Job(job) = item {
                job();
                n += 1;
            }
        }
        n
    }

    #[tokio::test]
    async fn test_success_routed_through_dispatcher() {
        let (dispatcher, mut queue) = WorkQueue::channel();
        let gateway = CommandGateway::new(dispatcher, Logger::disabled());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        gateway.submit(
            async { Ok::<_, CommandError>(41 + 1) },
            move |v| s.lock().unwrap().push(v),
            |_| panic!("unexpected error path"),
        );

        tokio::time::sleep(Duration::from_millis(20)).await;
        // Continuation must not have run yet: it is queued, not inline.
        assert!(seen.lock().unwrap().is_empty());

        assert_eq!(drain_jobs(&mut queue), 1);
        assert_eq!(*seen.lock().unwrap(), vec![42]);
    }

    #[tokio::test]
    async fn test_failure_maps_to_command_error() {
        let (dispatcher, mut queue) = WorkQueue::channel();
        let gateway = CommandGateway::new(dispatcher, Logger::disabled());
        let errs = Arc::new(Mutex::new(Vec::new()));

        let e = Arc::clone(&errs);
        gateway.submit(
            async { Err::<(), _>(crate::error::TransportError::Protocol {
                message: "boom".into(),
            }) },
            |_| panic!("unexpected success path"),
            move |err| e.lock().unwrap().push(err.to_string()),
        );

        tokio::time::sleep(Duration::from_millis(20)).await;
        drain_jobs(&mut queue);

        let errs = errs.lock().unwrap();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("boom"));
    }

    #[tokio::test]
    async fn test_cancel_delivers_cancelled() {
        let (dispatcher, mut queue) = WorkQueue::channel();
        let gateway = CommandGateway::new(dispatcher, Logger::disabled());
        let errs = Arc::new(Mutex::new(Vec::new()));

        let e = Arc::clone(&errs);
        let ticket = gateway.submit(
            async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok::<(), CommandError>(())
            },
            |_| panic!("unexpected success path"),
            move |err| e.lock().unwrap().push(err.as_label()),
        );

        ticket.cancel();
        assert!(ticket.is_cancelled());

        tokio::time::sleep(Duration::from_millis(20)).await;
        drain_jobs(&mut queue);

        assert_eq!(*errs.lock().unwrap(), vec!["command_cancelled"]);
    }

    #[tokio::test]
    async fn test_panicking_command_is_swallowed() {
        let (dispatcher, mut queue) = WorkQueue::channel();
        let gateway = CommandGateway::new(dispatcher, Logger::disabled());

        gateway.submit(
            async {
                panic!("command blew up");
                #[allow(unreachable_code)]
                Ok::<(), CommandError>(())
            },
            |_| panic!("unexpected success path"),
            |_| panic!("unexpected error path"),
        );

        tokio::time::sleep(Duration::from_millis(20)).await;
        // Neither continuation was queued.
        assert_eq!(drain_jobs(&mut queue), 0);
    }
}
