//! Feature handlers and the fan-out router.
//!
//! A feature is a self-contained unit of channel behavior (follow tracking,
//! raid management, ...). Features implement [`FeatureHandler`] and are
//! registered with the engine; the [`HandlerRegistry`] fans notifications out
//! to every interested handler on the consumer context.
//!
//! ## Rules
//! - Handler methods are synchronous and take `&mut self`: all handler state
//!   lives on the consumer context and needs no locking. Long-running work
//!   goes through the [`CommandGateway`](crate::dispatch::CommandGateway).
//! - Delivery is in registration order and isolated: one handler returning
//!   an error or panicking never starves the others.

mod handler;
mod registry;

pub use handler::{ChatClient, FeatureContext, FeatureHandler};
pub use registry::HandlerRegistry;
