//! Installing a logger as the global `tracing` default
//!
//! Kept in its own test binary: a global default can be set once per process.

mod common;

use common::capture;
use levelled::LoggerError;

#[test]
fn test_install_routes_bare_macros_and_refuses_second_install()
{
    let captured = capture("warn", vec![]);
    captured.logger.install().unwrap();

    tracing::info!("below threshold");
    tracing::warn!(code = 7, "bare warning");

    let lines = captured.out.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("bare warning"));
    assert!(lines[0].contains(r#"{"code":7}"#));

    let second = capture("info", vec![]);
    assert!(matches!(second.logger.install(), Err(LoggerError::Install(_))));
}
