//! # Logger Options
//!
//! Base configuration of a [`Logger`](crate::Logger) and the functional
//! options that adjust it before it is built.
//!
//! Options are applied in the order they are given, each one seeing the
//! result of the previous:
//!
//! ```rust
//! use levelled::options::{with_caller, with_encoding, Encoding};
//! use levelled::new_logger;
//!
//! let logger = new_logger("debug", [with_encoding(Encoding::Json), with_caller(false)])
//!     .expect("Failed to build logger");
//! logger.debug("ready");
//! ```
//!
//! ## Environment Variables
//!
//! [`from_env`] reads:
//!
//! - `LEVELLED_LOG_ENCODING`: `console` or `json`
//! - `LEVELLED_LOG_OUTPUT`: comma separated output paths (`stdout`, `stderr` or files)
//! - `LEVELLED_LOG_COLOR`: `0`/`false`/`off` disables ANSI colour
//!
//! `LEVELLED_LOG_LEVEL` holds the initial threshold; see [`env_level`].

use std::env;
use std::fmt;
use std::str::FromStr;

use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter};

use crate::error::LoggerError;
use crate::logger::FieldValue;

/// Encoding name `console`
pub const ENCODING_CONSOLE: &str = "console";
/// Encoding name `json`
pub const ENCODING_JSON: &str = "json";

/// Path naming standard output
pub const STDOUT: &str = "stdout";
/// Path naming standard error
pub const STDERR: &str = "stderr";

/// ISO-8601 with milliseconds and numeric offset
pub const ISO8601: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Environment variable holding the encoding
pub const ENV_ENCODING: &str = "LEVELLED_LOG_ENCODING";
/// Environment variable holding the output paths
pub const ENV_OUTPUT: &str = "LEVELLED_LOG_OUTPUT";
/// Environment variable toggling colour
pub const ENV_COLOR: &str = "LEVELLED_LOG_COLOR";
/// Environment variable holding the initial level
pub const ENV_LEVEL: &str = "LEVELLED_LOG_LEVEL";

/// Event encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding
{
    /// Tab separated, human-readable (default)
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

impl Encoding
{
    /// Identifier of this encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self {
            Encoding::Console => ENCODING_CONSOLE,
            Encoding::Json => ENCODING_JSON,
        }
    }
}

impl FromStr for Encoding
{
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s {
            ENCODING_CONSOLE => Ok(Encoding::Console),
            ENCODING_JSON => Ok(Encoding::Json),
            _ => Err(LoggerError::InvalidEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for Encoding
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

/// Everything needed to build a logger.
///
/// Start from [`LoggerConfig::default`] and adjust it with [`LoggerOption`]s.
pub struct LoggerConfig
{
    /// Event encoding
    pub encoding: Encoding,
    /// Sinks for `debug`, `info` and `warn` events
    pub output_paths: Vec<String>,
    /// Sinks for `error`, `fatal` and `panic` events
    pub error_output_paths: Vec<String>,
    /// Colour the level field (console only)
    pub color: bool,
    /// Write the caller's source location
    pub caller: bool,
    /// Attach a stack trace to error-class events
    pub stacktrace: bool,
    /// chrono format string for the timestamp
    pub time_format: String,
    /// Fields bound to the root logger
    pub fields: Vec<(String, FieldValue)>,
    pub(crate) output_writer: Option<BoxMakeWriter>,
    pub(crate) error_output_writer: Option<BoxMakeWriter>,
}

impl Default for LoggerConfig
{
    fn default() -> Self
    {
        Self {
            encoding: Encoding::Console,
            output_paths: vec![STDOUT.to_string()],
            error_output_paths: vec![STDERR.to_string()],
            color: true,
            caller: true,
            stacktrace: true,
            time_format: ISO8601.to_string(),
            fields: Vec::new(),
            output_writer: None,
            error_output_writer: None,
        }
    }
}

impl fmt::Debug for LoggerConfig
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("LoggerConfig")
            .field("encoding", &self.encoding)
            .field("output_paths", &self.output_paths)
            .field("error_output_paths", &self.error_output_paths)
            .field("color", &self.color)
            .field("caller", &self.caller)
            .field("stacktrace", &self.stacktrace)
            .field("time_format", &self.time_format)
            .field("fields", &self.fields)
            .field("output_writer", &self.output_writer.is_some())
            .field("error_output_writer", &self.error_output_writer.is_some())
            .finish()
    }
}

/// One adjustment to a [`LoggerConfig`].
///
/// Any closure over the config can be turned into an option, so callers are
/// not limited to the constructors in this module.
pub struct LoggerOption(Box<dyn FnOnce(&mut LoggerConfig) + Send>);

impl LoggerOption
{
    /// Wrap a closure as an option.
    pub fn new(apply: impl FnOnce(&mut LoggerConfig) + Send + 'static) -> Self
    {
        Self(Box::new(apply))
    }

    pub(crate) fn apply(self, config: &mut LoggerConfig)
    {
        (self.0)(config);
    }
}

impl fmt::Debug for LoggerOption
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str("LoggerOption")
    }
}

/// Apply `options` in order on top of the base configuration.
pub fn configure(options: impl IntoIterator<Item = LoggerOption>) -> LoggerConfig
{
    let mut config = LoggerConfig::default();
    for option in options {
        option.apply(&mut config);
    }
    config
}

/// Use `encoding` for every event.
#[must_use]
pub fn with_encoding(encoding: Encoding) -> LoggerOption
{
    LoggerOption::new(move |config| config.encoding = encoding)
}

/// Send normal-severity events to `paths`.
pub fn with_output_paths<I, P>(paths: I) -> LoggerOption
where
    I: IntoIterator<Item = P>,
    P: Into<String>,
{
    let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
    LoggerOption::new(move |config| config.output_paths = paths)
}

/// Send error-class events to `paths`.
pub fn with_error_output_paths<I, P>(paths: I) -> LoggerOption
where
    I: IntoIterator<Item = P>,
    P: Into<String>,
{
    let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
    LoggerOption::new(move |config| config.error_output_paths = paths)
}

/// Write normal-severity events to `make_writer` instead of the output paths.
pub fn with_writer<M>(make_writer: M) -> LoggerOption
where
    M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    LoggerOption::new(move |config| config.output_writer = Some(BoxMakeWriter::new(make_writer)))
}

/// Write error-class events to `make_writer` instead of the error output paths.
pub fn with_error_writer<M>(make_writer: M) -> LoggerOption
where
    M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    LoggerOption::new(move |config| config.error_output_writer = Some(BoxMakeWriter::new(make_writer)))
}

/// Toggle ANSI colour on the level field.
#[must_use]
pub fn with_color(color: bool) -> LoggerOption
{
    LoggerOption::new(move |config| config.color = color)
}

/// Toggle the caller field.
#[must_use]
pub fn with_caller(caller: bool) -> LoggerOption
{
    LoggerOption::new(move |config| config.caller = caller)
}

/// Toggle the stack trace on `error`, `fatal` and `panic` events.
#[must_use]
pub fn with_stacktrace(stacktrace: bool) -> LoggerOption
{
    LoggerOption::new(move |config| config.stacktrace = stacktrace)
}

/// Format timestamps with a chrono format string.
pub fn with_time_format(format: impl Into<String>) -> LoggerOption
{
    let format = format.into();
    LoggerOption::new(move |config| config.time_format = format)
}

/// Bind `fields` to the root logger, after any already bound.
pub fn with_fields<I, K, V>(fields: I) -> LoggerOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    let fields: Vec<(String, FieldValue)> = fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    LoggerOption::new(move |config| config.fields.extend(fields))
}

/// Read encoding, outputs and colour from `LEVELLED_LOG_*` variables.
///
/// Unset or unparsable variables leave the configuration as it is.
#[must_use]
pub fn from_env() -> LoggerOption
{
    let encoding = env::var(ENV_ENCODING).ok().and_then(|s| Encoding::from_str(s.trim()).ok());
    let output = env::var(ENV_OUTPUT).ok().map(|s| split_paths(&s));
    let color = env::var(ENV_COLOR).ok().and_then(|s| parse_switch(&s));

    LoggerOption::new(move |config| {
        if let Some(encoding) = encoding {
            config.encoding = encoding;
        }
        if let Some(paths) = output {
            config.output_paths = paths;
        }
        if let Some(color) = color {
            config.color = color;
        }
    })
}

/// Initial level from `LEVELLED_LOG_LEVEL`, or `default` when unset.
///
/// The value is returned unvalidated so that a typo reaches
/// [`new_logger`](crate::new_logger) and is reported there.
#[must_use]
pub fn env_level(default: &str) -> String
{
    env::var(ENV_LEVEL).map_or_else(|_| default.to_string(), |s| s.trim().to_string())
}

fn split_paths(raw: &str) -> Vec<String>
{
    raw.split(',').map(str::trim).filter(|p| !p.is_empty()).map(String::from).collect()
}

fn parse_switch(raw: &str) -> Option<bool>
{
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_encoding_from_str()
    {
        assert_eq!(Encoding::from_str("console").unwrap(), Encoding::Console);
        assert_eq!(Encoding::from_str("json").unwrap(), Encoding::Json);
        assert!(Encoding::from_str("JSON").is_err());
        assert!(Encoding::from_str("pretty").is_err());
    }

    #[test]
    fn test_default_config()
    {
        let config = LoggerConfig::default();
        assert_eq!(config.encoding, Encoding::Console);
        assert_eq!(config.output_paths, vec!["stdout"]);
        assert_eq!(config.error_output_paths, vec!["stderr"]);
        assert!(config.color);
        assert!(config.caller);
        assert!(config.stacktrace);
        assert_eq!(config.time_format, ISO8601);
    }

    #[test]
    fn test_options_apply_in_order()
    {
        let config = configure([
            with_encoding(Encoding::Json),
            with_output_paths(["a.log"]),
            with_output_paths(["b.log", "stdout"]),
            with_fields([("service", "api")]),
            with_fields([("shard", 3_i64)]),
        ]);
        assert_eq!(config.encoding, Encoding::Json);
        assert_eq!(config.output_paths, vec!["b.log", "stdout"]);
        assert_eq!(config.fields.len(), 2);
        assert_eq!(config.fields[0].0, "service");
        assert_eq!(config.fields[1].1, FieldValue::Int(3));
    }

    #[test]
    fn test_custom_closure_option()
    {
        let config = configure([LoggerOption::new(|config| config.error_output_paths.clear())]);
        assert!(config.error_output_paths.is_empty());
    }

    #[test]
    fn test_split_paths()
    {
        assert_eq!(split_paths("stdout, /tmp/a.log,,"), vec!["stdout", "/tmp/a.log"]);
        assert!(split_paths("").is_empty());
    }

    #[test]
    fn test_parse_switch()
    {
        assert_eq!(parse_switch("0"), Some(false));
        assert_eq!(parse_switch("Off"), Some(false));
        assert_eq!(parse_switch("true"), Some(true));
        assert_eq!(parse_switch("maybe"), None);
    }
}
