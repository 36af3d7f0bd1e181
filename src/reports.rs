//! Order-preserving collection of resolver diagnostics.
//!
//! A [`ReportLog`] is the host's standard report destination: its sink
//! records every report in emission order for the UI/result surface and
//! forwards each one to `tracing` at the matching level. One log per
//! resolution call keeps the buffers independent; clones share the same
//! buffer, so a log can follow a sink onto a resolver's thread.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use script_deps::report::{Report, ReportSeverity, ReportSink};

/// Thread-safe, order-preserving collector for resolver diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ReportLog {
    entries: Arc<Mutex<Vec<Report>>>,
}

impl ReportLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records into this log and mirrors to `tracing`.
    pub fn sink(&self) -> ReportSink {
        let entries = Arc::clone(&self.entries);
        ReportSink::new(move |report| {
            forward_to_tracing(report);
            entries.lock().push(report.clone());
        })
    }

    /// Copy of everything collected so far, in emission order.
    pub fn snapshot(&self) -> Vec<Report> {
        self.entries.lock().clone()
    }

    /// Drain the log, leaving it empty.
    pub fn take(&self) -> Vec<Report> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Whether any collected report carries ERROR severity.
    pub fn has_errors(&self) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|report| report.severity == ReportSeverity::Error)
    }
}

fn forward_to_tracing(report: &Report) {
    let rendered = match report.position {
        Some(position) => format!("{} at {}", report.message, position),
        None => report.message.clone(),
    };
    match report.severity {
        ReportSeverity::Error => error!(source = "resolver", "{}", rendered),
        ReportSeverity::Warning => warn!(source = "resolver", "{}", rendered),
        ReportSeverity::Info => info!(source = "resolver", "{}", rendered),
        ReportSeverity::Debug => debug!(source = "resolver", "{}", rendered),
    }
}
