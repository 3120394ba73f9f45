//! # levelled
//!
//! Structured logging on top of `tracing`, with a severity threshold that can
//! be changed while the program runs.
//!
//! This crate provides:
//! - Six severities: `debug`, `info`, `warn`, `error`, `fatal`, `panic`
//! - Loggers built from a fixed base configuration plus functional options
//! - Console and JSON encodings, stdout for normal and stderr for error-class events
//! - Named child loggers and bound fields
//! - A process-wide default logger at `info`
//!
//! ## Quick Start
//!
//! ```rust
//! use levelled::{logger, new_logger};
//!
//! // The default logger needs no setup
//! logger().info("Application started");
//!
//! // Or build one and move its threshold later
//! let log = new_logger("warn", []).expect("Failed to build logger");
//! log.info("suppressed");
//! log.change_level("info").expect("info is a valid level");
//! log.info("written");
//! ```

pub mod error;
mod format;
mod gate;
pub mod global;
pub mod level;
pub mod logger;
pub mod options;
mod sink;

pub use error::{LoggerError, Result};
pub use global::logger;
pub use level::{
    AtomicSeverity, Severity, LEVEL_DEBUG, LEVEL_ERROR, LEVEL_FATAL, LEVEL_INFO, LEVEL_PANIC, LEVEL_WARN,
};
pub use logger::{new_logger, new_logger_with_name, FieldValue, Logger};
pub use options::{Encoding, LoggerConfig, LoggerOption, ENCODING_CONSOLE, ENCODING_JSON};
