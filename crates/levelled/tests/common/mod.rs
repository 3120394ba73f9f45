//! Shared helpers for integration tests

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use levelled::options::{with_color, with_error_writer, with_stacktrace, with_writer};
use levelled::{new_logger, new_logger_with_name, Logger, LoggerOption};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory sink that can be handed to a logger and read back afterwards
#[derive(Clone, Default)]
pub struct SharedBuffer
{
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer
{
    fn lock(&self) -> MutexGuard<'_, Vec<u8>>
    {
        self.bytes.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn contents(&self) -> String
    {
        String::from_utf8(self.lock().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String>
    {
        self.contents().lines().map(String::from).collect()
    }

    pub fn clear(&self)
    {
        self.lock().clear();
    }
}

impl io::Write for SharedBuffer
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>
    {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()>
    {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer
{
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer
    {
        self.clone()
    }
}

/// Normal and error-class output of one logger
pub struct Captured
{
    pub logger: Logger,
    pub out: SharedBuffer,
    pub err: SharedBuffer,
}

impl Captured
{
    /// Everything written, normal output first
    pub fn all_lines(&self) -> Vec<String>
    {
        let mut lines = self.out.lines();
        lines.extend(self.err.lines());
        lines
    }

    /// Whether either stream contains `needle`
    pub fn contains(&self, needle: &str) -> bool
    {
        self.out.contents().contains(needle) || self.err.contents().contains(needle)
    }
}

fn capture_options(out: &SharedBuffer, err: &SharedBuffer, extra: Vec<LoggerOption>) -> Vec<LoggerOption>
{
    let mut options = vec![
        with_writer(out.clone()),
        with_error_writer(err.clone()),
        with_color(false),
        with_stacktrace(false),
    ];
    options.extend(extra);
    options
}

/// Logger at `level` writing into two buffers, without colour or stack traces
pub fn capture(level: &str, extra: Vec<LoggerOption>) -> Captured
{
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let logger = new_logger(level, capture_options(&out, &err, extra)).unwrap();
    Captured { logger, out, err }
}

/// Named logger at `level` writing into two buffers, without colour or stack traces
pub fn capture_named(name: &str, level: &str, extra: Vec<LoggerOption>) -> Captured
{
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let logger = new_logger_with_name(name, level, capture_options(&out, &err, extra)).unwrap();
    Captured { logger, out, err }
}
