//! Threshold changes racing with emission

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use common::capture;
use levelled::Severity;

#[test]
fn test_change_level_while_emitting()
{
    let captured = capture("info", vec![]);
    let logger = &captured.logger;
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..2_000 {
                let level = if i % 2 == 0 { "debug" } else { "error" };
                logger.change_level(level).unwrap();
            }
            done.store(true, Ordering::Release);
        });

        s.spawn(|| {
            let mut observed = 0_u32;
            while !done.load(Ordering::Acquire) || observed < 100 {
                let level = logger.level();
                assert!(matches!(level, Severity::Info | Severity::Debug | Severity::Error), "torn threshold {level:?}");
                logger.info("tick");
                observed += 1;
            }
        });
    });

    // Every line that made it out is a complete info event.
    for line in captured.out.lines() {
        assert!(line.contains("INFO") && line.ends_with("tick"), "{line}");
    }
    assert!(captured.err.lines().is_empty());
}

#[test]
fn test_many_children_emit_concurrently()
{
    let captured = capture("info", vec![]);

    thread::scope(|s| {
        for worker in 0..4 {
            let child = captured.logger.named(&format!("worker-{worker}"));
            s.spawn(move || {
                for _ in 0..50 {
                    child.info("step");
                }
            });
        }
    });

    let lines = captured.out.lines();
    assert_eq!(lines.len(), 200);
    for worker in 0..4 {
        let tag = format!("\tworker-{worker}\t");
        assert_eq!(lines.iter().filter(|l| l.contains(&tag)).count(), 50);
    }
}
