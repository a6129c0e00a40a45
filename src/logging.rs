//! # Injected logging collaborator.
//!
//! Every component receives a [`Logger`] at construction instead of reaching
//! for process-wide static state. A `Logger` pairs a shared [`LogSink`] with a
//! maximum [`LogLevel`]; messages above the configured level are discarded
//! before they reach the sink.
//!
//! ## Severity tiers
//! ```text
//! None < Error < Warning < Info
//! ```
//! A logger configured at `Warning` emits errors and warnings, drops info.
//! `None` silences the sink entirely.
//!
//! ## Implementing a custom sink
//! ```rust
//! use streamvisor::{LogLevel, LogSink, Logger};
//!
//! struct Collector;
//!
//! impl LogSink for Collector {
//!     fn write(&self, level: LogLevel, message: &str) {
//!         // forward to your own log pipeline
//!         let _ = (level, message);
//!     }
//! }
//!
//! let logger = Logger::new(std::sync::Arc::new(Collector), LogLevel::Info);
//! logger.info("engine ready");
//! ```

use std::sync::Arc;

/// Severity tier for log output.
///
/// Ordering follows declaration order: `None < Error < Warning < Info`.
/// A [`Logger`] emits a message when its configured level is at or above the
/// message's level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// No output at all.
    None,
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warning,
    /// Everything, including informational messages.
    Info,
}

/// Destination for log output.
///
/// Implementations must be callable from any thread; the engine logs from the
/// consumer context but producers (gateway completions, transport callbacks)
/// may log from worker tasks.
pub trait LogSink: Send + Sync + 'static {
    /// Writes one message at the given severity.
    fn write(&self, level: LogLevel, message: &str);
}

/// Cheap cloneable handle over a shared [`LogSink`] with level filtering.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    level: LogLevel,
}

impl Logger {
    /// Creates a logger writing to `sink`, filtered at `level`.
    pub fn new(sink: Arc<dyn LogSink>, level: LogLevel) -> Self {
        Self { sink, level }
    }

    /// Creates a logger that discards everything.
    ///
    /// Useful as a default before a component is wired into the engine.
    pub fn disabled() -> Self {
        Self {
            sink: Arc::new(NullSink),
            level: LogLevel::None,
        }
    }

    /// Returns the configured maximum level.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Logs an informational message.
    pub fn info(&self, message: impl AsRef<str>) {
        self.write(LogLevel::Info, message.as_ref());
    }

    /// Logs a warning.
    pub fn warning(&self, message: impl AsRef<str>) {
        self.write(LogLevel::Warning, message.as_ref());
    }

    /// Logs an error.
    pub fn error(&self, message: impl AsRef<str>) {
        self.write(LogLevel::Error, message.as_ref());
    }

    fn write(&self, level: LogLevel, message: &str) {
        if self.level >= level {
            self.sink.write(level, message);
        }
    }
}

/// Sink that prints to stdout/stderr.
///
/// Errors and warnings go to stderr, info to stdout. Intended for demos and
/// local runs; production embedders usually supply their own sink.
#[derive(Default)]
pub struct ConsoleLog;

impl ConsoleLog {
    /// Construct a new [`ConsoleLog`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for ConsoleLog {
    fn write(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => eprintln!("[streamvisor][error] {message}"),
            LogLevel::Warning => eprintln!("[streamvisor][warn] {message}"),
            LogLevel::Info => println!("[streamvisor] {message}"),
            LogLevel::None => {}
        }
    }
}

struct NullSink;

impl LogSink for NullSink {
    fn write(&self, _level: LogLevel, _message: &str) {}
}
