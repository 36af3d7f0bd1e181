//! Diagnostic channel between resolvers and the host.
//!
//! Reports are one-way, human-readable messages tagged with a severity and
//! an optional source position. They ride alongside the structured outcome,
//! never inside it: a failed resolution is an `Error` outcome *plus*
//! whatever ERROR-severity reports the resolver chose to emit, and
//! warnings/info never affect the outcome at all.
//!
//! Emission through a [`ReportSink`] is synchronous in the emitting thread,
//! so for a single resolution call the order a collector observes is the
//! order the resolver emitted. The contract requires every report intended
//! for a call to be emitted before that call's terminal event.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::contents::Position;

/// Severity attached to a resolver diagnostic.
///
/// Declaration order doubles as the `Ord` order, most severe first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ReportSeverity {
    Error,
    Warning,
    Info,
    Debug,
}

impl fmt::Display for ReportSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportSeverity::Error => "error",
            ReportSeverity::Warning => "warning",
            ReportSeverity::Info => "info",
            ReportSeverity::Debug => "debug",
        };
        f.write_str(label)
    }
}

/// One diagnostic emitted through the report channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub severity: ReportSeverity,
    pub message: String,
    /// Source location the message points at, when the resolver knows one.
    pub position: Option<Position>,
}

impl Report {
    pub fn new(
        severity: ReportSeverity,
        message: impl Into<String>,
        position: Option<Position>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            position,
        }
    }
}

/// Where resolver diagnostics go.
///
/// Cloneable handle over a shared handler; clones feed the same place, so a
/// resolver is free to move one onto its background thread. The handler is
/// invoked inline on the emitting thread and must therefore be cheap and
/// thread-safe.
#[derive(Clone)]
pub struct ReportSink {
    handler: Arc<dyn Fn(&Report) + Send + Sync>,
}

impl ReportSink {
    /// Wrap a handler invoked once per emitted report.
    pub fn new(handler: impl Fn(&Report) + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// A sink that discards everything. Useful when the host has no
    /// diagnostics surface for a call.
    pub fn ignore() -> Self {
        Self::new(|_report| {})
    }

    /// Forward a pre-built report.
    pub fn emit(&self, report: &Report) {
        (self.handler)(report);
    }

    /// Build and emit a report.
    pub fn report(&self, severity: ReportSeverity, message: &str, position: Option<Position>) {
        self.emit(&Report::new(severity, message, position));
    }

    pub fn error(&self, message: &str, position: Option<Position>) {
        self.report(ReportSeverity::Error, message, position);
    }

    pub fn warning(&self, message: &str, position: Option<Position>) {
        self.report(ReportSeverity::Warning, message, position);
    }

    pub fn info(&self, message: &str, position: Option<Position>) {
        self.report(ReportSeverity::Info, message, position);
    }

    pub fn debug(&self, message: &str, position: Option<Position>) {
        self.report(ReportSeverity::Debug, message, position);
    }
}

impl fmt::Debug for ReportSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportSink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn collecting_sink() -> (ReportSink, Arc<Mutex<Vec<Report>>>) {
        let collected = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::clone(&collected);
        let sink = ReportSink::new(move |report| store.lock().push(report.clone()));
        (sink, collected)
    }

    #[test]
    fn test_emission_order_is_observation_order() {
        let (sink, collected) = collecting_sink();
        sink.warning("missing lib", Some(Position::new(3, 5)));
        sink.error("fail", None);
        sink.debug("probe", None);

        let reports = collected.lock();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].severity, ReportSeverity::Warning);
        assert_eq!(reports[0].message, "missing lib");
        assert_eq!(reports[0].position, Some(Position::new(3, 5)));
        assert_eq!(reports[1].severity, ReportSeverity::Error);
        assert_eq!(reports[2].severity, ReportSeverity::Debug);
    }

    #[test]
    fn test_clones_feed_the_same_handler() {
        let (sink, collected) = collecting_sink();
        let clone = sink.clone();
        sink.info("from original", None);
        clone.info("from clone", None);
        assert_eq!(collected.lock().len(), 2);
    }

    #[test]
    fn test_ignore_sink_swallows_reports() {
        let sink = ReportSink::ignore();
        sink.error("nobody listens", None);
        sink.debug("still nobody", Some(Position::new(1, 1)));
    }

    #[test]
    fn test_severity_display_and_order() {
        assert_eq!(ReportSeverity::Warning.to_string(), "warning");
        assert!(ReportSeverity::Error < ReportSeverity::Debug);
    }

    #[test]
    fn test_emit_forwards_prebuilt_report() {
        let (sink, collected) = collecting_sink();
        let report = Report::new(ReportSeverity::Info, "prebuilt", None);
        sink.emit(&report);
        assert_eq!(collected.lock()[0], report);
    }
}
