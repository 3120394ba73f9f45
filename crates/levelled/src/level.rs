//! # Severities
//!
//! The six severities a [`Logger`](crate::Logger) understands, and the atomic
//! cell that holds a logger's current threshold.
//!
//! `tracing` only knows five levels, so `fatal` and `panic` events are emitted
//! at `ERROR` under dedicated targets. [`Severity::of`] recovers the exact
//! severity from an event's metadata, which is all a filter or a writer gets
//! to see.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{Level, Metadata};

use crate::error::LoggerError;

/// Level name `debug`
pub const LEVEL_DEBUG: &str = "debug";
/// Level name `info`
pub const LEVEL_INFO: &str = "info";
/// Level name `warn`
pub const LEVEL_WARN: &str = "warn";
/// Level name `error`
pub const LEVEL_ERROR: &str = "error";
/// Level name `fatal`
pub const LEVEL_FATAL: &str = "fatal";
/// Level name `panic`
pub const LEVEL_PANIC: &str = "panic";

/// Target carried by events emitted through [`Logger::fatal`](crate::Logger::fatal).
pub const FATAL_TARGET: &str = "levelled::fatal";
/// Target carried by events emitted through [`Logger::panic`](crate::Logger::panic).
pub const PANIC_TARGET: &str = "levelled::panic";

/// Event severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity
{
    /// Diagnostic detail, off by default
    Debug = 0,
    /// Normal operation (default threshold)
    Info = 1,
    /// Something unexpected but recoverable
    Warn = 2,
    /// An operation failed
    Error = 3,
    /// Emitted, then the process exits
    Fatal = 4,
    /// Emitted, then the calling thread panics
    Panic = 5,
}

impl Severity
{
    /// Every severity, least severe first.
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
        Severity::Panic,
    ];

    /// The lowercase name accepted by [`Logger::change_level`](crate::Logger::change_level).
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self {
            Severity::Debug => LEVEL_DEBUG,
            Severity::Info => LEVEL_INFO,
            Severity::Warn => LEVEL_WARN,
            Severity::Error => LEVEL_ERROR,
            Severity::Fatal => LEVEL_FATAL,
            Severity::Panic => LEVEL_PANIC,
        }
    }

    /// The capitalized label written into the level field.
    #[must_use]
    pub const fn label(self) -> &'static str
    {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
            Severity::Panic => "PANIC",
        }
    }

    /// Error-class severities go to the error output.
    #[must_use]
    pub const fn is_error_class(self) -> bool
    {
        matches!(self, Severity::Error | Severity::Fatal | Severity::Panic)
    }

    /// Severity of a `tracing` event or span, judged from its metadata alone.
    ///
    /// `TRACE` counts as `debug`, since there is nothing below it.
    #[must_use]
    pub fn of(metadata: &Metadata<'_>) -> Self
    {
        match *metadata.level() {
            Level::ERROR => match metadata.target() {
                FATAL_TARGET => Severity::Fatal,
                PANIC_TARGET => Severity::Panic,
                _ => Severity::Error,
            },
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }

    const fn from_u8(raw: u8) -> Self
    {
        match raw {
            0 => Severity::Debug,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            4 => Severity::Fatal,
            _ => Severity::Panic,
        }
    }
}

impl From<Severity> for Level
{
    fn from(severity: Severity) -> Self
    {
        match severity {
            Severity::Debug => Level::DEBUG,
            Severity::Info => Level::INFO,
            Severity::Warn => Level::WARN,
            Severity::Error | Severity::Fatal | Severity::Panic => Level::ERROR,
        }
    }
}

impl FromStr for Severity
{
    type Err = LoggerError;

    /// Exact, case-sensitive match against the six level names.
    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s {
            LEVEL_DEBUG => Ok(Severity::Debug),
            LEVEL_INFO => Ok(Severity::Info),
            LEVEL_WARN => Ok(Severity::Warn),
            LEVEL_ERROR => Ok(Severity::Error),
            LEVEL_FATAL => Ok(Severity::Fatal),
            LEVEL_PANIC => Ok(Severity::Panic),
            _ => Err(LoggerError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for Severity
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

/// Threshold cell shared by a logger and its children.
///
/// Stores the severity as its `u8` discriminant, so a load can never observe
/// anything but one of the six values.
#[derive(Debug)]
pub struct AtomicSeverity(AtomicU8);

impl AtomicSeverity
{
    /// Create a cell holding `severity`.
    #[must_use]
    pub const fn new(severity: Severity) -> Self
    {
        Self(AtomicU8::new(severity as u8))
    }

    /// Current threshold.
    pub fn load(&self) -> Severity
    {
        Severity::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Replace the threshold.
    pub fn store(&self, severity: Severity)
    {
        self.0.store(severity as u8, Ordering::Release);
    }

    /// Would an event at `severity` pass the current threshold?
    pub fn enabled(&self, severity: Severity) -> bool
    {
        severity >= self.load()
    }
}

impl Default for AtomicSeverity
{
    fn default() -> Self
    {
        Self::new(Severity::Info)
    }
}
