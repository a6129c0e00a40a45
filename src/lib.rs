//! # streamvisor
//!
//! Event-dispatch and subscription-lifecycle engine for channel overlays and
//! bots: it sits between a reconnecting event transport and pluggable feature
//! handlers, and guarantees that every piece of feature state is only ever
//! touched from one consumer context.
//!
//! ## Architecture
//! ```text
//!  network threads                        consumer context
//! ┌────────────────┐  enqueue   ┌──────────────────────────────────┐
//! │ Transport ─► TransportSink ─┼─► WorkQueue ─► Engine::run/tick  │
//! └────────────────┘            │        │                         │
//! ┌────────────────┐            │        ├─ SessionEvent ─► policy │
//! │ CommandGateway │ completions│        ├─ Notification ─► router │
//! │ (tokio::spawn) ─────────────┼─►      └─ Job ─► continuation    │
//! └────────────────┘            └──────────────────────────────────┘
//! ```
//!
//! - **[`dispatch`]** — the single-consumer FIFO queue and the outgoing
//!   command gateway whose completions loop back through it.
//! - **[`session`]** — the transport port, lifecycle events, and the
//!   connect/disconnect/reconnect policy.
//! - **[`subscriptions`]** — declarative subscription descriptors and the
//!   per-session dedupe manager over the registrar port.
//! - **[`handlers`]** — the feature handler contract and the fan-out router
//!   with per-handler failure isolation.
//! - **[`events`]** — topics, notifications, and typed payloads.
//! - **[`features`]** — ready-made trackers (follows, bits, subscribers,
//!   hype trains, raids).
//! - **[`core`]** — the builder and the engine's consumer loop.
//!
//! ## Quick start
//! ```rust,no_run
//! use std::sync::Arc;
//! use streamvisor::{
//!     ChannelConfig, Engine, EngineBuilder, EngineConfig, FollowTracker,
//! };
//! # use streamvisor::{Registrar, Transport};
//! # async fn demo(transport: Arc<dyn Transport>, registrar: Arc<dyn Registrar>) {
//! let cfg = EngineConfig {
//!     channel: ChannelConfig {
//!         channel_id: "141981764".into(),
//!         channel_name: "twitchdev".into(),
//!         client_id: "client".into(),
//!         access_token: "token".into(),
//!     },
//!     ..EngineConfig::default()
//! };
//!
//! let mut engine: Engine = EngineBuilder::new(cfg)
//!     .with_transport(transport)
//!     .with_registrar(registrar)
//!     .build()
//!     .unwrap();
//!
//! engine.register(Box::new(FollowTracker::new()));
//! engine.connect().unwrap();
//!
//! let shutdown = tokio_util::sync::CancellationToken::new();
//! engine.run(shutdown).await;
//! # }
//! ```

pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod features;
pub mod handlers;
pub mod logging;
pub mod session;
pub mod subscriptions;

pub use config::{ChannelConfig, EngineConfig};
pub use crate::core::{Engine, EngineBuilder};
pub use dispatch::{CommandGateway, CommandTicket, Dispatcher, WorkItem, WorkQueue};
pub use error::{CommandError, ConfigError, DispatchError, SubscriptionError, TransportError};
pub use events::{topics, Notification, Topic};
pub use features::{
    BitsTracker, FollowTracker, HypeTrainTracker, OutgoingRaid, RaidApi, RaidWatcher,
    SubscriberTracker,
};
pub use handlers::{ChatClient, FeatureContext, FeatureHandler, HandlerRegistry};
pub use logging::{ConsoleLog, LogLevel, LogSink, Logger};
pub use session::{Session, SessionAdapter, SessionEvent, Transport, TransportSink};
pub use subscriptions::{
    Registrar, SubscriptionDescriptor, SubscriptionHandle, SubscriptionManager,
    SubscriptionRequest,
};
