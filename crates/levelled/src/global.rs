//! Process-wide default logger.
//!
//! Prefer passing a [`Logger`] (or a child of it) to the code that needs one.
//! The default exists for code that has no way to be handed a logger.

use once_cell::sync::Lazy;

use crate::level::LEVEL_INFO;
use crate::logger::{new_logger, Logger};

static DEFAULT: Lazy<Logger> = Lazy::new(|| match new_logger(LEVEL_INFO, []) {
    Ok(logger) => logger,
    Err(e) => panic!("create logger: {e}"),
});

/// The process-wide default logger.
///
/// Built on first access with threshold `info` and the base configuration.
/// Every caller gets the same logger, so [`Logger::change_level`] on it is
/// seen everywhere.
///
/// ## Panics
///
/// If the logger cannot be built. Nothing else can be expected to work
/// without it.
pub fn logger() -> &'static Logger
{
    &DEFAULT
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::level::Severity;

    #[test]
    fn test_default_logger_is_shared()
    {
        assert!(std::ptr::eq(logger(), logger()));
        assert_eq!(logger().name(), "");
        assert_eq!(logger().level(), Severity::Info);
    }
}
