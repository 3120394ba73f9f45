//! # Logger
//!
//! A [`Logger`] is a `tracing` dispatcher with a fixed layout and a severity
//! threshold that can be moved at runtime.
//!
//! Each logger owns its own [`Dispatch`], so building one never touches the
//! process-wide `tracing` default. Events reach it in two ways:
//!
//! - the leveled methods ([`Logger::info`], [`Logger::warn`], ...), which
//!   take a message and record where they were called from;
//! - [`Logger::in_scope`], which runs a closure with the logger as the
//!   current dispatcher, so plain `tracing` macros with structured fields
//!   and spans go through it.
//!
//! ## Example
//!
//! ```rust
//! use levelled::new_logger_with_name;
//!
//! let logger = new_logger_with_name("worker", "info", []).expect("Failed to build logger");
//! logger.info("started");
//! logger.debug("not shown at info");
//!
//! logger.change_level("debug").expect("debug is a valid level");
//! logger.in_scope(|| tracing::debug!(job = 7, "picked up job"));
//!
//! let uploads = logger.named("uploads").with_fields([("bucket", "media")]);
//! uploads.warn("slow upload");
//! ```

use std::fmt;
use std::panic::Location;
use std::process;
use std::sync::Arc;

use serde_json::Value;
use tracing::{Dispatch, Level, Span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

use crate::error::{LoggerError, Result};
use crate::format::EventFormat;
use crate::gate::SeverityGate;
use crate::level::{AtomicSeverity, Severity, FATAL_TARGET, PANIC_TARGET};
use crate::options::{self, Encoding, LoggerConfig, LoggerOption};
use crate::sink::{self, SeverityRouter};

/// Value of a field bound to a logger.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue
{
    /// Text
    Str(String),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
}

impl From<&str> for FieldValue
{
    fn from(value: &str) -> Self
    {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue
{
    fn from(value: String) -> Self
    {
        FieldValue::Str(value)
    }
}

impl From<i64> for FieldValue
{
    fn from(value: i64) -> Self
    {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue
{
    fn from(value: i32) -> Self
    {
        FieldValue::Int(i64::from(value))
    }
}

impl From<u64> for FieldValue
{
    fn from(value: u64) -> Self
    {
        FieldValue::Uint(value)
    }
}

impl From<u32> for FieldValue
{
    fn from(value: u32) -> Self
    {
        FieldValue::Uint(u64::from(value))
    }
}

impl From<f64> for FieldValue
{
    fn from(value: f64) -> Self
    {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue
{
    fn from(value: bool) -> Self
    {
        FieldValue::Bool(value)
    }
}

impl From<&FieldValue> for Value
{
    fn from(value: &FieldValue) -> Self
    {
        match value {
            FieldValue::Str(s) => Value::from(s.as_str()),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Uint(u) => Value::from(*u),
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::Bool(b) => Value::from(*b),
        }
    }
}

impl fmt::Display for FieldValue
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Uint(u) => write!(f, "{u}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Name and bound fields of one logger handle, stored in the extensions of
/// the handle's span.
#[derive(Debug)]
pub(crate) struct LoggerContext
{
    pub(crate) name: String,
    pub(crate) fields: Vec<(String, FieldValue)>,
}

/// What a logger and all of its children share.
#[derive(Debug)]
struct Core
{
    dispatch: Dispatch,
    threshold: Arc<AtomicSeverity>,
}

/// Structured logger with a runtime-adjustable threshold.
///
/// Cloning is cheap and yields a handle to the same logger. Children made
/// with [`Logger::named`] or [`Logger::with_fields`] share the threshold of
/// the logger they come from.
#[derive(Debug, Clone)]
pub struct Logger
{
    core: Arc<Core>,
    context: Arc<LoggerContext>,
    span: Span,
}

/// Build a logger that emits events at `level` and above.
///
/// Equivalent to [`new_logger_with_name`] with an empty name.
///
/// ## Errors
///
/// - [`LoggerError::Sink`](crate::LoggerError::Sink) if an output path cannot be opened
/// - [`LoggerError::InvalidSinkPath`](crate::LoggerError::InvalidSinkPath) if an output path names no file
/// - [`LoggerError::InvalidInitialLevel`](crate::LoggerError::InvalidInitialLevel) if `level` is not a
///   level name; the error carries the built logger at threshold `info`
pub fn new_logger(level: &str, options: impl IntoIterator<Item = LoggerOption>) -> Result<Logger>
{
    new_logger_with_name("", level, options)
}

/// Build a logger that tags every event with `name`.
///
/// `options` are applied in order on top of the base configuration: console
/// encoding, ISO-8601 timestamps, coloured level, caller, stdout for normal
/// severities and stderr for error-class ones.
///
/// The logger is fully built before `level` is applied, so an invalid level
/// is reported after any sink error, together with the logger itself.
///
/// ## Errors
///
/// Same as [`new_logger`].
pub fn new_logger_with_name(name: &str, level: &str, options: impl IntoIterator<Item = LoggerOption>) -> Result<Logger>
{
    let config = options::configure(options);
    let logger = Logger::build(name, config)?;
    match logger.change_level(level) {
        Ok(()) => Ok(logger),
        Err(_) => Err(LoggerError::InvalidInitialLevel {
            level: level.to_string(),
            logger: Box::new(logger),
        }),
    }
}

impl Logger
{
    fn build(name: &str, config: LoggerConfig) -> Result<Self>
    {
        let output = match config.output_writer {
            Some(writer) => writer,
            None => sink::open_paths(&config.output_paths)?,
        };
        let error_output = match config.error_output_writer {
            Some(writer) => writer,
            None => sink::open_paths(&config.error_output_paths)?,
        };

        let threshold = Arc::new(AtomicSeverity::default());
        let ansi = config.color && config.encoding == Encoding::Console;

        let layer = tracing_subscriber::fmt::layer()
            .event_format(EventFormat::new(config.encoding, config.caller, config.stacktrace, config.time_format))
            .with_ansi(ansi)
            .with_writer(SeverityRouter::new(output, error_output))
            .with_filter(SeverityGate::new(Arc::clone(&threshold)));

        let core = Arc::new(Core {
            dispatch: Dispatch::new(Registry::default().with(layer)),
            threshold,
        });

        Ok(Self::with_context(
            core,
            LoggerContext {
                name: name.to_string(),
                fields: config.fields,
            },
        ))
    }

    /// New handle on `core` whose span carries `context`.
    fn with_context(core: Arc<Core>, context: LoggerContext) -> Self
    {
        let context = Arc::new(context);
        let span = tracing::dispatcher::with_default(&core.dispatch, || tracing::span!(parent: None, Level::ERROR, "logger"));

        span.with_subscriber(|(id, dispatch)| {
            if let Some(span) = dispatch.downcast_ref::<Registry>().and_then(|registry| registry.span(id)) {
                span.extensions_mut().insert(Arc::clone(&context));
            }
        });

        Self { core, context, span }
    }

    /// Set the threshold from a level name.
    ///
    /// Takes effect for every later event on this logger, its clones and its
    /// children, including those emitting from other threads.
    ///
    /// ## Errors
    ///
    /// [`LoggerError::InvalidLevel`](crate::LoggerError::InvalidLevel) if
    /// `level` is not exactly one of `debug`, `info`, `warn`, `error`,
    /// `fatal`, `panic`. The threshold is left unchanged.
    pub fn change_level(&self, level: &str) -> Result<()>
    {
        let severity = level.parse::<Severity>()?;
        self.set_level(severity);
        Ok(())
    }

    /// Set the threshold.
    pub fn set_level(&self, severity: Severity)
    {
        self.core.threshold.store(severity);
    }

    /// Current threshold.
    #[must_use]
    pub fn level(&self) -> Severity
    {
        self.core.threshold.load()
    }

    /// Would an event at `severity` be written right now?
    #[must_use]
    pub fn enabled(&self, severity: Severity) -> bool
    {
        self.core.threshold.enabled(severity)
    }

    /// Name written with every event; empty for an unnamed logger.
    #[must_use]
    pub fn name(&self) -> &str
    {
        &self.context.name
    }

    /// Fields written with every event, in binding order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FieldValue)]
    {
        &self.context.fields
    }

    /// The underlying `tracing` dispatcher.
    #[must_use]
    pub fn dispatch(&self) -> &Dispatch
    {
        &self.core.dispatch
    }

    /// Child logger whose name is this one's with `.suffix` appended.
    ///
    /// An empty suffix returns a clone.
    #[must_use]
    pub fn named(&self, suffix: &str) -> Self
    {
        if suffix.is_empty() {
            return self.clone();
        }
        let name = if self.context.name.is_empty() {
            suffix.to_string()
        } else {
            format!("{}.{suffix}", self.context.name)
        };
        Self::with_context(
            Arc::clone(&self.core),
            LoggerContext {
                name,
                fields: self.context.fields.clone(),
            },
        )
    }

    /// Child logger that adds `fields` to every event.
    #[must_use]
    pub fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut bound = self.context.fields.clone();
        bound.extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self::with_context(
            Arc::clone(&self.core),
            LoggerContext {
                name: self.context.name.clone(),
                fields: bound,
            },
        )
    }

    /// Run `f` with this logger as the current `tracing` dispatcher.
    ///
    /// `tracing` macros called inside `f` are filtered by this logger's
    /// threshold and carry its name and bound fields.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T
    {
        tracing::dispatcher::with_default(&self.core.dispatch, || self.span.in_scope(f))
    }

    /// Make this logger the process-wide `tracing` default.
    ///
    /// Events emitted outside [`Logger::in_scope`] are then gated and laid out
    /// by this logger, without its name or bound fields.
    ///
    /// ## Errors
    ///
    /// [`LoggerError::Install`](crate::LoggerError::Install) if a global
    /// default is already set.
    pub fn install(&self) -> Result<()>
    {
        tracing::dispatcher::set_global_default(self.core.dispatch.clone())?;
        Ok(())
    }

    /// Emit `message` at `severity`.
    ///
    /// Only writes the event; `fatal` and `panic` termination belong to
    /// [`Logger::fatal`] and [`Logger::panic`].
    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl fmt::Display)
    {
        if !self.enabled(severity) {
            return;
        }
        let caller = Caller(Location::caller());
        self.in_scope(|| match severity {
            Severity::Debug => tracing::debug!(levelled.caller = %caller, "{message}"),
            Severity::Info => tracing::info!(levelled.caller = %caller, "{message}"),
            Severity::Warn => tracing::warn!(levelled.caller = %caller, "{message}"),
            Severity::Error => tracing::error!(levelled.caller = %caller, "{message}"),
            Severity::Fatal => tracing::event!(target: FATAL_TARGET, Level::ERROR, levelled.caller = %caller, "{message}"),
            Severity::Panic => tracing::event!(target: PANIC_TARGET, Level::ERROR, levelled.caller = %caller, "{message}"),
        });
    }

    /// Emit at `debug`.
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display)
    {
        self.log(Severity::Debug, message);
    }

    /// Emit at `info`.
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display)
    {
        self.log(Severity::Info, message);
    }

    /// Emit at `warn`.
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display)
    {
        self.log(Severity::Warn, message);
    }

    /// Emit at `error`.
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display)
    {
        self.log(Severity::Error, message);
    }

    /// Emit at `fatal`, then exit the process with status 1.
    ///
    /// The process exits even when the threshold suppresses the event.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) -> !
    {
        self.log(Severity::Fatal, message);
        process::exit(1)
    }

    /// Emit at `panic`, then panic with `message`.
    ///
    /// The thread panics even when the threshold suppresses the event.
    #[track_caller]
    pub fn panic(&self, message: impl fmt::Display) -> !
    {
        let message = message.to_string();
        self.log(Severity::Panic, &message);
        panic!("{message}")
    }
}

/// `file:line` of a leveled call.
struct Caller(&'static Location<'static>);

impl fmt::Display for Caller
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}:{}", self.0.file(), self.0.line())
    }
}
