//! Engine assembly and the consumer loop.
//!
//! [`EngineBuilder`] wires the ports (transport, registrar, chat, log sink)
//! into an [`Engine`]; the engine owns the work queue's consumer end and is
//! the only place feature state is ever touched.
//!
//! ## Diagram
//! ```text
//! EngineBuilder ──build()──► Engine
//!                              │ run(token) / tick()
//!                              ▼
//!                  drain queue ──► SessionEvent ──► adapter + subscriptions
//!                              ├─► Notification ──► HandlerRegistry::route
//!                              └─► Job ──► continuation (panic-contained)
//! ```

mod builder;
mod engine;

pub use builder::EngineBuilder;
pub use engine::Engine;
