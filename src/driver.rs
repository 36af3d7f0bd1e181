//! Drives one resolver call to a settled outcome.
//!
//! [`drive_resolution`] is the host-side half of the resolver protocol: it
//! invokes [`ScriptDependenciesResolver::resolve`], captures panics into
//! errors, and collapses the two-mode return (synchronous result or async
//! handoff) into a single blocking `Result`. Waits on the async path are
//! bounded by `SCRIPT_HOST_RESOLVE_TIMEOUT_MS` (milliseconds, default
//! 30000).

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::debug;

use script_deps::completion::{self, WaitOutcome};
use script_deps::contents::ScriptContents;
use script_deps::deps::ResolvedDependencies;
use script_deps::error::is_not_implemented;
use script_deps::report::ReportSink;
use script_deps::resolver::{Environment, ScriptDependenciesResolver};
use script_deps::result::{ResultOrAsync, ValueOrError};

use crate::env_utils;

/// Environment variable bounding the wait for an async completion, in
/// milliseconds.
pub const RESOLVE_TIMEOUT_ENV: &str = "SCRIPT_HOST_RESOLVE_TIMEOUT_MS";

const DEFAULT_RESOLVE_TIMEOUT_MS: u64 = 30_000;

/// Host policy for a single resolution.
#[derive(Debug, Clone)]
pub struct ResolutionConfig {
    /// How long to wait for the completion callback after an async handoff.
    pub wait_timeout: Duration,
    /// Treat a not-implemented answer as "no dependencies" instead of an
    /// error.
    pub not_implemented_is_empty: bool,
}

impl ResolutionConfig {
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Surface not-implemented answers as errors instead of mapping them
    /// to an absent result.
    pub fn strict_not_implemented(mut self) -> Self {
        self.not_implemented_is_empty = false;
        self
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_millis(env_utils::env_u64_or(
                RESOLVE_TIMEOUT_ENV,
                DEFAULT_RESOLVE_TIMEOUT_MS,
            )),
            not_implemented_is_empty: true,
        }
    }
}

/// Invoke `resolver` on `script` and block until the outcome settles.
///
/// A synchronous return settles immediately; `Async` blocks on the
/// completion callback for up to `config.wait_timeout`. A panic inside the
/// resolver is captured and returned as an error rather than unwinding
/// into the host, and a callback the resolver kept alive past a
/// synchronous return is sealed so a late completion cannot land.
pub fn drive_resolution(
    resolver: &dyn ScriptDependenciesResolver,
    script: &ScriptContents,
    environment: Option<&Environment>,
    report: &ReportSink,
    config: &ResolutionConfig,
) -> Result<Option<ResolvedDependencies>> {
    let (on_result, handle) = completion::channel();

    let returned = panic::catch_unwind(AssertUnwindSafe(|| {
        resolver.resolve(script, environment, report, on_result)
    }));

    match returned {
        Err(payload) => Err(anyhow!(
            "resolver panicked during resolve: {}",
            panic_message(payload.as_ref())
        )),
        Ok(ResultOrAsync::Result(outcome)) => {
            handle.mark_synchronous();
            settle(outcome, config)
        }
        Ok(ResultOrAsync::Async) => {
            debug!(
                timeout_ms = config.wait_timeout.as_millis() as u64,
                "waiting for async resolver completion"
            );
            match handle.wait(config.wait_timeout) {
                WaitOutcome::Completed(outcome) => settle(outcome, config),
                WaitOutcome::CallbackDropped => Err(anyhow!(
                    "resolver abandoned the call without delivering a result"
                )),
                WaitOutcome::TimedOut => Err(anyhow!(
                    "no completion callback within {:?}",
                    config.wait_timeout
                )),
            }
        }
    }
}

fn settle(
    outcome: ValueOrError<Option<ResolvedDependencies>>,
    config: &ResolutionConfig,
) -> Result<Option<ResolvedDependencies>> {
    match outcome {
        ValueOrError::Value(deps) => Ok(deps),
        ValueOrError::Error(err) if config.not_implemented_is_empty && is_not_implemented(&err) => {
            debug!("resolver reported not-implemented, treating as no dependencies");
            Ok(None)
        }
        ValueOrError::Error(err) => Err(err),
    }
}

/// Best-effort text out of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
