//! # Error Types
//!
//! Everything that can go wrong while building or reconfiguring a logger.

use thiserror::Error;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing_appender::rolling::InitError;

use crate::logger::Logger;

/// Logger construction and configuration error
///
/// Only [`LoggerError::Sink`] and [`LoggerError::InvalidSinkPath`] mean the
/// logger could not be built. The other variants are input problems that
/// leave any existing logger untouched.
#[derive(Error, Debug)]
pub enum LoggerError
{
    /// Level name outside `debug/info/warn/error/fatal/panic`
    ///
    /// The threshold keeps its previous value.
    #[error("log level only be debug/info/warn/error/fatal/panic, got {0:?}")]
    InvalidLevel(String),

    /// The logger was built but its initial level name was not recognized
    ///
    /// The logger is handed back at the default threshold, `info`.
    #[error("log level only be debug/info/warn/error/fatal/panic, got {level:?}")]
    InvalidInitialLevel
    {
        /// The rejected level name
        level: String,
        /// The logger, at threshold `info`
        logger: Box<Logger>,
    },

    /// Encoding name other than `console` or `json`
    #[error("log encoding only be console/json, got {0:?}")]
    InvalidEncoding(String),

    /// An output path could not be opened
    #[error("build logger: open sink {path:?}: {source}")]
    Sink
    {
        /// The path as given in the configuration
        path: String,
        /// Why the file appender refused it
        #[source]
        source: InitError,
    },

    /// An output path that names no file
    #[error("build logger: open sink {0:?}: path has no file name")]
    InvalidSinkPath(String),

    /// A global `tracing` dispatcher is already installed
    #[error("install logger: {0}")]
    Install(#[from] SetGlobalDefaultError),
}

impl LoggerError
{
    /// The logger carried by [`LoggerError::InvalidInitialLevel`], if any.
    #[must_use]
    pub fn into_logger(self) -> Option<Logger>
    {
        match self {
            LoggerError::InvalidInitialLevel { logger, .. } => Some(*logger),
            _ => None,
        }
    }
}

/// Result alias for logger operations
pub type Result<T> = std::result::Result<T, LoggerError>;

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_invalid_level_lists_valid_names()
    {
        let message = LoggerError::InvalidLevel("bogus".to_string()).to_string();
        assert!(message.contains("debug/info/warn/error/fatal/panic"));
        assert!(message.contains("bogus"));
    }

    #[test]
    fn test_invalid_sink_path_display()
    {
        let message = LoggerError::InvalidSinkPath(String::new()).to_string();
        assert!(message.contains("no file name"));
    }

    #[test]
    fn test_into_logger_only_for_initial_level()
    {
        assert!(LoggerError::InvalidLevel("bogus".to_string()).into_logger().is_none());
    }

    #[test]
    fn test_invalid_encoding_display()
    {
        let message = LoggerError::InvalidEncoding("xml".to_string()).to_string();
        assert!(message.contains("console/json"));
        assert!(message.contains("xml"));
    }
}
