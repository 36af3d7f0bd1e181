//! Ready-made resolvers for wiring hosts and writing tests.
//!
//! [`FnResolver`] lifts a plain closure into the protocol and keeps its
//! faults contained; [`StaticResolver`] answers from preloaded data,
//! synchronously or from a background thread, which makes both halves of
//! the protocol easy to stage in tests.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};

use script_deps::completion::ResultCallback;
use script_deps::contents::ScriptContents;
use script_deps::deps::ResolvedDependencies;
use script_deps::report::{Report, ReportSink};
use script_deps::resolver::{Environment, ScriptDependenciesResolver};
use script_deps::result::{ResultOrAsync, ValueOrError};

use crate::driver::panic_message;

/// Synchronous resolver backed by a closure.
///
/// The closure's `Err` and panics both surface as a synchronous `Error`
/// outcome, so a buggy closure cannot unwind into the host.
pub struct FnResolver<F> {
    f: F,
}

impl<F> FnResolver<F>
where
    F: Fn(&ScriptContents, Option<&Environment>, &ReportSink) -> Result<Option<ResolvedDependencies>>
        + Send
        + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ScriptDependenciesResolver for FnResolver<F>
where
    F: Fn(&ScriptContents, Option<&Environment>, &ReportSink) -> Result<Option<ResolvedDependencies>>
        + Send
        + Sync,
{
    fn resolve(
        &self,
        script: &ScriptContents,
        environment: Option<&Environment>,
        report: &ReportSink,
        _on_result: ResultCallback<Option<ResolvedDependencies>>,
    ) -> ResultOrAsync<Option<ResolvedDependencies>> {
        let outcome =
            match panic::catch_unwind(AssertUnwindSafe(|| (self.f)(script, environment, report))) {
                Ok(Ok(deps)) => ValueOrError::Value(deps),
                Ok(Err(err)) => ValueOrError::Error(err),
                Err(payload) => ValueOrError::Error(anyhow!(
                    "resolver function panicked: {}",
                    panic_message(payload.as_ref())
                )),
            };
        ResultOrAsync::Result(outcome)
    }
}

impl<F> fmt::Debug for FnResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResolver").finish_non_exhaustive()
    }
}

/// Resolver that replays preloaded dependencies, reports, or a forced
/// error.
///
/// Without a background delay it answers synchronously, emitting its
/// queued reports first. With one, it returns `Async` and stages the same
/// sequence from a spawned thread, reports strictly before the completion
/// callback.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    dependencies: Option<ResolvedDependencies>,
    force_error: Option<String>,
    reports: Vec<Report>,
    background_delay: Option<Duration>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dependencies(mut self, dependencies: ResolvedDependencies) -> Self {
        self.dependencies = Some(dependencies);
        self
    }

    /// Make every call fail with `message` instead of answering.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.force_error = Some(message.into());
        self
    }

    /// Queue a report to emit before the terminal event.
    pub fn with_report(mut self, report: Report) -> Self {
        self.reports.push(report);
        self
    }

    /// Answer from a background thread after `delay` instead of
    /// synchronously.
    pub fn with_background_delay(mut self, delay: Duration) -> Self {
        self.background_delay = Some(delay);
        self
    }

    fn outcome(&self) -> ValueOrError<Option<ResolvedDependencies>> {
        match &self.force_error {
            Some(message) => ValueOrError::Error(anyhow!("{message}")),
            None => ValueOrError::Value(self.dependencies.clone()),
        }
    }
}

impl ScriptDependenciesResolver for StaticResolver {
    fn resolve(
        &self,
        _script: &ScriptContents,
        _environment: Option<&Environment>,
        report: &ReportSink,
        on_result: ResultCallback<Option<ResolvedDependencies>>,
    ) -> ResultOrAsync<Option<ResolvedDependencies>> {
        match self.background_delay {
            Some(delay) => {
                let reports = self.reports.clone();
                let force_error = self.force_error.clone();
                let dependencies = self.dependencies.clone();
                let sink = report.clone();
                thread::spawn(move || {
                    thread::sleep(delay);
                    for queued in &reports {
                        sink.emit(queued);
                    }
                    let outcome = match force_error {
                        Some(message) => ValueOrError::Error(anyhow!("{message}")),
                        None => ValueOrError::Value(dependencies),
                    };
                    on_result.complete(outcome);
                });
                ResultOrAsync::Async
            }
            None => {
                for queued in &self.reports {
                    report.emit(queued);
                }
                ResultOrAsync::Result(self.outcome())
            }
        }
    }
}
