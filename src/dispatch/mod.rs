//! Cross-thread dispatch: the single-consumer work queue and the outgoing
//! command gateway.
//!
//! Everything that mutates feature or session state funnels through one FIFO
//! queue drained on one consumer context; the only concurrent-safe primitive
//! in the crate is this queue.
//!
//! ## Contents
//! - [`WorkItem`], [`Dispatcher`], [`WorkQueue`] — the producer/consumer pair
//! - [`CommandGateway`], [`CommandTicket`] — outbound async calls whose
//!   completions re-enter through the queue
//!
//! ## Diagram
//! ```text
//! Producers (any thread):                       Consumer (one context):
//!   TransportSink ──┐
//!   CommandGateway ─┼──► Dispatcher ──► [FIFO queue] ──► Engine::run / tick
//!   user code ──────┘    (enqueue,                          │
//!                         never blocks)            per-item panic boundary
//! ```

mod gateway;
mod queue;

pub use gateway::{CommandGateway, CommandTicket};
pub(crate) use gateway::panic_message;
pub use queue::{Dispatcher, Job, WorkItem, WorkQueue};
