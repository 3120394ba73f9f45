//! Event layout.
//!
//! Console:
//!
//! ```text
//! 2026-10-19T09:14:03.271+0200	INFO	worker	src/main.rs:42	job started	{"job":7}
//! ```
//!
//! JSON:
//!
//! ```text
//! {"level":"INFO","ts":"2026-10-19T09:14:03.271+0200","logger":"worker","caller":"src/main.rs:42","message":"job started","job":7}
//! ```
//!
//! Empty parts (no name, caller disabled, no fields) are left out.
//!
//! `error`, `fatal` and `panic` events also carry a stack trace: on the lines
//! after the event in console output, under `stacktrace` in JSON.

use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::level::Severity;
use crate::logger::LoggerContext;
use crate::options::Encoding;

/// Field through which the leveled methods pass their caller's location.
pub(crate) const CALLER_FIELD: &str = "levelled.caller";

const MESSAGE_FIELD: &str = "message";

const LEVEL_KEY: &str = "level";
const TIME_KEY: &str = "ts";
const NAME_KEY: &str = "logger";
const CALLER_KEY: &str = "caller";
const MESSAGE_KEY: &str = "message";
const STACKTRACE_KEY: &str = "stacktrace";

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone)]
pub(crate) struct EventFormat
{
    encoding: Encoding,
    caller: bool,
    stacktrace: bool,
    time_format: String,
}

impl EventFormat
{
    pub(crate) fn new(encoding: Encoding, caller: bool, stacktrace: bool, time_format: String) -> Self
    {
        Self {
            encoding,
            caller,
            stacktrace,
            time_format,
        }
    }

    fn timestamp(&self) -> String
    {
        chrono::Local::now().format(&self.time_format).to_string()
    }
}

impl<S, N> FormatEvent<S, N> for EventFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result
    {
        // Event fields overwrite bound fields of the same name. Neither may
        // replace the fixed keys of a JSON line.
        let meta = event.metadata();
        let severity = Severity::of(meta);

        let mut recorded = RecordedFields::default();
        event.record(&mut recorded);

        let context = logger_context(ctx);
        let name = context.as_deref().map_or("", |c| c.name.as_str());

        let caller = if self.caller {
            recorded
                .caller
                .take()
                .map(|caller| short_path(&caller).to_string())
                .or_else(|| meta.file().map(|file| format!("{}:{}", short_path(file), meta.line().unwrap_or(0))))
        } else {
            None
        };

        let mut fields = Map::new();
        if let Some(context) = &context {
            for (key, value) in &context.fields {
                fields.insert(key.clone(), Value::from(value));
            }
        }
        fields.extend(recorded.fields);

        let message = recorded.message.unwrap_or_default();
        let stacktrace = (self.stacktrace && severity.is_error_class()).then(capture_stacktrace);

        match self.encoding {
            Encoding::Console => {
                if writer.has_ansi_escapes() {
                    write!(writer, "{}\t{}{}{RESET}", self.timestamp(), color(severity), severity.label())?;
                } else {
                    write!(writer, "{}\t{}", self.timestamp(), severity.label())?;
                }
                if !name.is_empty() {
                    write!(writer, "\t{name}")?;
                }
                if let Some(caller) = caller {
                    write!(writer, "\t{caller}")?;
                }
                write!(writer, "\t{message}")?;
                if !fields.is_empty() {
                    write!(writer, "\t{}", Value::Object(fields))?;
                }
                writeln!(writer)?;
                if let Some(stacktrace) = stacktrace {
                    writeln!(writer, "{stacktrace}")?;
                }
                Ok(())
            }
            Encoding::Json => {
                let mut object = Map::new();
                object.insert(LEVEL_KEY.to_string(), Value::from(severity.label()));
                object.insert(TIME_KEY.to_string(), Value::from(self.timestamp()));
                if !name.is_empty() {
                    object.insert(NAME_KEY.to_string(), Value::from(name));
                }
                if let Some(caller) = caller {
                    object.insert(CALLER_KEY.to_string(), Value::from(caller));
                }
                object.insert(MESSAGE_KEY.to_string(), Value::from(message));
                if let Some(stacktrace) = stacktrace {
                    object.insert(STACKTRACE_KEY.to_string(), Value::from(stacktrace));
                }
                for (key, value) in fields {
                    object.entry(key).or_insert(value);
                }
                writeln!(writer, "{}", Value::Object(object))
            }
        }
    }
}

/// Nearest logger context on the event's span stack.
fn logger_context<S, N>(ctx: &FmtContext<'_, S, N>) -> Option<Arc<LoggerContext>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    ctx.event_scope()?.find_map(|span| {
        let extensions = span.extensions();
        extensions.get::<Arc<LoggerContext>>().cloned()
    })
}

/// Stack of the emitting thread, regardless of `RUST_BACKTRACE`.
fn capture_stacktrace() -> String
{
    Backtrace::force_capture().to_string().trim_end().to_string()
}

fn color(severity: Severity) -> &'static str
{
    match severity {
        Severity::Debug => "\x1b[35m",
        Severity::Info => "\x1b[34m",
        Severity::Warn => "\x1b[33m",
        Severity::Error | Severity::Fatal | Severity::Panic => "\x1b[31m",
    }
}

/// Last directory plus file name.
fn short_path(file: &str) -> &str
{
    let mut separators = file.rmatch_indices(['/', '\\']);
    match (separators.next(), separators.next()) {
        (Some(_), Some((index, _))) => &file[index + 1..],
        _ => file,
    }
}

/// Event fields, with the message and caller pulled out.
#[derive(Default)]
struct RecordedFields
{
    message: Option<String>,
    caller: Option<String>,
    fields: Map<String, Value>,
}

impl RecordedFields
{
    fn insert(&mut self, field: &Field, value: Value)
    {
        match field.name() {
            MESSAGE_FIELD => self.message = Some(into_text(value)),
            CALLER_FIELD => self.caller = Some(into_text(value)),
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

fn into_text(value: Value) -> String
{
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

impl Visit for RecordedFields
{
    fn record_f64(&mut self, field: &Field, value: f64)
    {
        self.insert(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64)
    {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64)
    {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool)
    {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str)
    {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug)
    {
        self.insert(field, Value::String(format!("{value:?}")));
    }
}
