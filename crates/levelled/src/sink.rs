//! Output sinks.
//!
//! Turns configured paths into `MakeWriter`s and routes each event to the
//! normal or error-class stream by its severity.

use std::io;
use std::path::Path;

use tracing::Metadata;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter, MakeWriterExt};

use crate::error::LoggerError;
use crate::level::Severity;
use crate::options::{STDERR, STDOUT};

/// Open every path and write to all of them in order.
///
/// An empty list discards output.
pub(crate) fn open_paths(paths: &[String]) -> Result<BoxMakeWriter, LoggerError>
{
    let mut writers = paths.iter().map(|path| open_path(path));
    let Some(first) = writers.next() else {
        return Ok(BoxMakeWriter::new(io::sink));
    };

    let mut combined = first?;
    for writer in writers {
        combined = BoxMakeWriter::new(combined.and(writer?));
    }
    Ok(combined)
}

fn open_path(path: &str) -> Result<BoxMakeWriter, LoggerError>
{
    match path {
        STDOUT => Ok(BoxMakeWriter::new(io::stdout)),
        STDERR => Ok(BoxMakeWriter::new(io::stderr)),
        _ => open_file(path).map(BoxMakeWriter::new),
    }
}

/// Append to `path`, creating it and its directory if needed. Never rotates.
fn open_file(path: &str) -> Result<RollingFileAppender, LoggerError>
{
    let file = Path::new(path);
    let directory = file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = match file.file_name() {
        Some(name) if !name.is_empty() => name.to_string_lossy().into_owned(),
        _ => return Err(LoggerError::InvalidSinkPath(path.to_string())),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|source| LoggerError::Sink {
            path: path.to_string(),
            source,
        })
}

/// Picks the error output for error-class events and the normal output for
/// everything else.
pub(crate) struct SeverityRouter
{
    output: BoxMakeWriter,
    error_output: BoxMakeWriter,
}

impl SeverityRouter
{
    pub(crate) fn new(output: BoxMakeWriter, error_output: BoxMakeWriter) -> Self
    {
        Self { output, error_output }
    }
}

impl<'a> MakeWriter<'a> for SeverityRouter
{
    type Writer = Box<dyn io::Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer
    {
        self.output.make_writer()
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer
    {
        if Severity::of(meta).is_error_class() {
            self.error_output.make_writer_for(meta)
        } else {
            self.output.make_writer_for(meta)
        }
    }
}
