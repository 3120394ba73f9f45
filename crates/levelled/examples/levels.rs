//! Example demonstrating how to use levelled
//!
//! This example shows:
//!
//! 1. Using the process-wide default logger
//! 2. Building a named logger and moving its threshold
//! 3. Structured fields through `tracing` macros
//! 4. Child loggers with bound fields
//!
//! Set LEVELLED_LOG_ENCODING=json for JSON output.

use levelled::options::{env_level, from_env};
use levelled::{logger, new_logger_with_name, LoggerError, Severity};

fn main()
{
    // Method 1: the default logger is ready without setup (threshold: info)
    logger().info("Application started");
    logger().debug("Not shown at the default threshold");

    // Method 2: a named logger configured from the environment
    let log = match new_logger_with_name("example", &env_level("info"), [from_env()]) {
        Ok(log) => log,
        Err(LoggerError::InvalidInitialLevel { level, logger }) => {
            eprintln!("Ignoring unknown level {level:?}");
            *logger
        }
        Err(e) => {
            eprintln!("Failed to build logger: {e}");
            std::process::exit(1);
        }
    };

    log.warn("This is a warning message");
    log.info("This is an info message");
    log.debug("This is a debug message (set LEVELLED_LOG_LEVEL=debug to see)");

    // Move the threshold at runtime
    if let Err(e) = log.change_level("debug") {
        log.error(e);
    }
    log.debug("Debug is visible now");

    // Structured logging with fields
    log.in_scope(|| tracing::info!(user_id = 12345, action = "login", "User logged in"));

    // Using spans for context
    log.in_scope(|| {
        let span = tracing::info_span!("process_upload", id = 42);
        let _guard = span.enter();
        tracing::info!("Reading chunk");
        tracing::debug!(bytes = 4096, "Chunk read");
    });

    // Child loggers share the threshold
    let uploads = log.named("uploads").with_fields([("bucket", "media")]);
    log.set_level(Severity::Error);
    uploads.warn("Suppressed: parent moved the threshold to error");
    uploads.error("Upload failed");

    // Unknown level names are rejected and leave the threshold alone
    if let Err(e) = log.change_level("verbose") {
        log.error(format!("Level change rejected: {e}"));
    }

    log.error("Application finished");
}
