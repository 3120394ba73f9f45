//! End-to-end runs of the `levelled` binary

use std::process::{Command, Output};

use serde_json::Value;

fn levelled(args: &[&str]) -> Command
{
    let mut command = Command::new(env!("CARGO_BIN_EXE_levelled"));
    command
        .args(args)
        .env_remove("LEVELLED_LOG_LEVEL")
        .env_remove("LEVELLED_LOG_ENCODING")
        .env_remove("LEVELLED_LOG_OUTPUT")
        .env_remove("LEVELLED_LOG_COLOR");
    command
}

fn run(command: &mut Command) -> Output
{
    command.output().expect("Failed to run levelled")
}

#[test]
fn test_fatal_exits_even_when_suppressed()
{
    let output = run(&mut levelled(&["--no-color", "--threshold", "panic", "emit", "fatal", "x"]));
    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("FATAL"));
}

#[test]
fn test_fatal_is_written_before_exit()
{
    let output = run(&mut levelled(&["--no-color", "emit", "fatal", "disk", "gone"]));
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.lines().next().unwrap().contains("FATAL"));
    assert!(stderr.contains("disk gone"));
}

#[test]
fn test_encoding_from_environment()
{
    let output = run(levelled(&["emit", "info", "hello"]).env("LEVELLED_LOG_ENCODING", "json"));
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(value["level"], "INFO");
    assert_eq!(value["message"], "hello");
}

#[test]
fn test_threshold_from_environment()
{
    let output = run(levelled(&["--no-color", "emit", "info", "hidden"]).env("LEVELLED_LOG_LEVEL", "warn"));
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_threshold_falls_back_to_info()
{
    let output = run(&mut levelled(&["--no-color", "--threshold", "verbose", "emit", "info", "shown"]));
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("verbose"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("shown"));
}
