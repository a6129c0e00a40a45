//! # Single-consumer work queue.
//!
//! [`Dispatcher`] is the cloneable producer handle; [`WorkQueue`] the single
//! consumer end. Together they decouple network callback threads from the one
//! context feature state lives on.
//!
//! ## Rules
//! - `enqueue()` is callable from any thread, returns immediately, and never
//!   panics on the caller's behalf (a closed queue drops the item).
//! - Items are delivered strictly in enqueue order. No priority, no
//!   cancellation; an item runs exactly once or not at all if the process
//!   ends first.
//! - The queue exists from construction, so work enqueued before the consumer
//!   loop starts is buffered, not lost.

use tokio::sync::mpsc;

use crate::events::Notification;
use crate::session::SessionEvent;

/// Deferred unit of execution owned by the queue.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// One unit of work drained by the consumer loop.
pub enum WorkItem {
    /// Session lifecycle transition from the transport.
    Session(SessionEvent),
    /// Inbound notification to fan out to handlers.
    Notify(Notification),
    /// Arbitrary continuation (gateway completions, user-enqueued work).
    Job(Job),
}

impl std::fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkItem::Session(ev) => f.debug_tuple("Session").field(ev).finish(),
            WorkItem::Notify(n) => f.debug_tuple("Notify").field(&n.topic).finish(),
            WorkItem::Job(_) => f.write_str("Job(..)"),
        }
    }
}

/// Cloneable producer handle into the work queue.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<WorkItem>,
}

impl Dispatcher {
    /// Enqueues one work item.
    ///
    /// Never blocks; if the consumer is gone the item is silently dropped
    /// (the process is shutting down).
    pub fn enqueue(&self, item: WorkItem) {
        let _ = self.tx.send(item);
    }

    /// Enqueues a plain closure to run on the consumer context.
    pub fn enqueue_job(&self, job: impl FnOnce() + Send + 'static) {
        self.enqueue(WorkItem::Job(Box::new(job)));
    }
}

/// Single consumer end of the work queue.
pub struct WorkQueue {
    rx: mpsc::UnboundedReceiver<WorkItem>,
}

impl WorkQueue {
    /// Creates the producer/consumer pair.
    pub fn channel() -> (Dispatcher, WorkQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Dispatcher { tx }, WorkQueue { rx })
    }

    /// Awaits the next item; `None` when every producer handle is dropped.
    pub async fn next(&mut self) -> Option<WorkItem> {
        self.rx.recv().await
    }

    /// Takes the next item without waiting, if one is queued.
    pub fn try_next(&mut self) -> Option<WorkItem> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    use crate::events::Topic;

    #[tokio::test]
    async fn test_fifo_order_preserved() {
        let (dispatcher, mut queue) = WorkQueue::channel();
        for i in 0..5u64 {
            dispatcher.enqueue(WorkItem::Notify(Notification::new(
                Topic::from("t"),
                json!({ "i": i }),
            )));
        }

        let mut seen = Vec::new();
        while let Some(WorkItem::Notify(n)) = queue.try_next() {
            seen.push(n.payload["i"].as_u64().unwrap());
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_enqueue_before_consumer_is_buffered() {
        let (dispatcher, mut queue) = WorkQueue::channel();
        let hits = Arc::new(Mutex::new(0));

        // Producer runs before anyone drains.
        let h = Arc::clone(&hits);
        dispatcher.enqueue_job(move || *h.lock().unwrap() += 1);

        match queue.next().await {
            Some(WorkItem::Job(job)) => job(),
            other => panic!("expected job, got {other:?}"),
        }
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_cross_thread_enqueue() {
        let (dispatcher, mut queue) = WorkQueue::channel();
        let d = dispatcher.clone();
        std::thread::spawn(move || {
            d.enqueue_job(|| {});
        })
        .join()
        .unwrap();

        assert!(matches!(queue.next().await, Some(WorkItem::Job(_))));
    }

    #[test]
    fn test_enqueue_after_consumer_dropped_is_silent() {
        let (dispatcher, queue) = WorkQueue::channel();
        drop(queue);
        // Must not panic.
        dispatcher.enqueue_job(|| {});
    }
}
