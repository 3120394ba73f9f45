//! Per-layer filter backed by a logger's threshold cell.

use std::sync::Arc;

use tracing::subscriber::Interest;
use tracing::Metadata;
use tracing_subscriber::layer::{Context, Filter};

use crate::level::{AtomicSeverity, Severity};

/// Lets an event through when its severity reaches the current threshold.
///
/// Spans always pass: they carry the logger context the formatter looks up,
/// and they produce no output of their own.
#[derive(Debug, Clone)]
pub(crate) struct SeverityGate
{
    threshold: Arc<AtomicSeverity>,
}

impl SeverityGate
{
    pub(crate) fn new(threshold: Arc<AtomicSeverity>) -> Self
    {
        Self { threshold }
    }
}

impl<S> Filter<S> for SeverityGate
{
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool
    {
        meta.is_span() || self.threshold.enabled(Severity::of(meta))
    }

    // The threshold moves at runtime, so no callsite may cache a verdict.
    fn callsite_enabled(&self, _meta: &'static Metadata<'static>) -> Interest
    {
        Interest::sometimes()
    }
}
