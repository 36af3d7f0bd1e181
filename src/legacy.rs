//! Adapter from the callback protocol to the old blocking-future shape.
//!
//! Hosts that still consume [`BlockingFuture`] call [`legacy_future_for`]
//! instead of porting: the adapter drives any
//! [`ScriptDependenciesResolver`] and packages the outcome the way the
//! legacy surface expects. Errors do not cross the legacy boundary as
//! errors; they land in the report sink as `error` diagnostics and the
//! future settles to "no dependencies." The not-implemented marker stays
//! silent, matching its "zero additional dependencies" meaning.
//!
//! `get` on a still-pending future blocks, but never forever: the wait is
//! capped by `SCRIPT_HOST_LEGACY_GET_TIMEOUT_MS` (milliseconds, default
//! 30000) so a wedged resolver cannot park a host thread for good.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use script_deps::completion::{self, CompletionHandle, WaitOutcome};
use script_deps::contents::ScriptContents;
use script_deps::deps::ResolvedDependencies;
use script_deps::error::is_not_implemented;
use script_deps::future::{BlockingFuture, ImmediateFuture};
use script_deps::report::ReportSink;
use script_deps::resolver::{Environment, ScriptDependenciesResolver};
use script_deps::result::{ResultOrAsync, ValueOrError};

use crate::driver::panic_message;
use crate::env_utils;

/// Environment variable capping how long a legacy `get` blocks, in
/// milliseconds.
pub const LEGACY_GET_TIMEOUT_ENV: &str = "SCRIPT_HOST_LEGACY_GET_TIMEOUT_MS";

const DEFAULT_LEGACY_GET_TIMEOUT_MS: u64 = 30_000;

/// Run `resolver` for `script` and expose the outcome as a blocking
/// future.
///
/// A synchronous resolver return yields an already-settled
/// [`ImmediateFuture`]; an async handoff yields a future whose `get`
/// blocks until the completion callback fires. `previous_dependencies`
/// is accepted for callers of the old surface but the adapter does not
/// forward it anywhere.
pub fn legacy_future_for(
    resolver: &dyn ScriptDependenciesResolver,
    script: &ScriptContents,
    environment: Option<&Environment>,
    report: &ReportSink,
    previous_dependencies: Option<&ResolvedDependencies>,
) -> Box<dyn BlockingFuture<Option<ResolvedDependencies>> + Send> {
    if previous_dependencies.is_some() {
        debug!("previous dependencies hint ignored by legacy adapter");
    }

    let (on_result, handle) = completion::channel();
    let returned = panic::catch_unwind(AssertUnwindSafe(|| {
        resolver.resolve(script, environment, report, on_result)
    }));

    match returned {
        Err(payload) => {
            report.error(
                &format!(
                    "resolver panicked during resolve: {}",
                    panic_message(payload.as_ref())
                ),
                None,
            );
            Box::new(ImmediateFuture::new(None))
        }
        Ok(ResultOrAsync::Result(outcome)) => {
            handle.mark_synchronous();
            match outcome {
                ValueOrError::Value(deps) => Box::new(ImmediateFuture::new(deps)),
                ValueOrError::Error(err) => {
                    if !is_not_implemented(&err) {
                        report.error(&format!("dependency resolution failed: {err:#}"), None);
                    }
                    Box::new(ImmediateFuture::new(None))
                }
            }
        }
        Ok(ResultOrAsync::Async) => Box::new(PendingFuture::new(handle, report.clone())),
    }
}

/// Blocking view over an in-flight async resolution.
///
/// The terminal outcome is memoized on first observation so repeated
/// `get` calls agree; a timed-out wait is not terminal and memoizes
/// nothing.
#[derive(Debug)]
struct PendingFuture {
    handle: CompletionHandle<Option<ResolvedDependencies>>,
    report: ReportSink,
    settled: Mutex<Option<Option<ResolvedDependencies>>>,
    get_ceiling: Duration,
}

impl PendingFuture {
    fn new(handle: CompletionHandle<Option<ResolvedDependencies>>, report: ReportSink) -> Self {
        Self {
            handle,
            report,
            settled: Mutex::new(None),
            get_ceiling: Duration::from_millis(env_utils::env_u64_or(
                LEGACY_GET_TIMEOUT_ENV,
                DEFAULT_LEGACY_GET_TIMEOUT_MS,
            )),
        }
    }

    /// Wait up to `timeout` for the terminal outcome. `Some` carries the
    /// settled value; `None` means still pending.
    ///
    /// The settled-state mutex is held across the wait so concurrent
    /// callers serialize instead of racing for the one delivery.
    fn wait_settled(&self, timeout: Duration) -> Option<Option<ResolvedDependencies>> {
        let mut settled = self.settled.lock();
        if let Some(value) = settled.as_ref() {
            return Some(value.clone());
        }

        match self.handle.wait(timeout) {
            WaitOutcome::Completed(ValueOrError::Value(deps)) => {
                *settled = Some(deps.clone());
                Some(deps)
            }
            WaitOutcome::Completed(ValueOrError::Error(err)) => {
                if !is_not_implemented(&err) {
                    self.report
                        .error(&format!("dependency resolution failed: {err:#}"), None);
                }
                *settled = Some(None);
                Some(None)
            }
            WaitOutcome::CallbackDropped => {
                self.report.error(
                    "resolver abandoned the call without delivering a result",
                    None,
                );
                *settled = Some(None);
                Some(None)
            }
            WaitOutcome::TimedOut => None,
        }
    }
}

impl BlockingFuture<Option<ResolvedDependencies>> for PendingFuture {
    fn get(&self) -> Option<ResolvedDependencies> {
        match self.wait_settled(self.get_ceiling) {
            Some(value) => value,
            None => {
                self.report.error(
                    &format!(
                        "dependency resolution still pending after {:?}, returning no dependencies",
                        self.get_ceiling
                    ),
                    None,
                );
                None
            }
        }
    }

    fn get_timeout(&self, timeout: Duration) -> Option<ResolvedDependencies> {
        self.wait_settled(timeout).flatten()
    }

    fn cancel(&self, _interrupt_if_running: bool) -> bool {
        false
    }

    fn is_done(&self) -> bool {
        !self.handle.is_pending()
    }

    fn is_cancelled(&self) -> bool {
        false
    }
}
