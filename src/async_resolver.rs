//! Bridge from async/await resolvers onto the callback protocol.
//!
//! Resolver authors who live in tokio implement
//! [`AsyncScriptDependenciesResolver`] and wrap it in
//! [`AsyncResolverBridge`]; the bridge returns `Async` from every call and
//! completes the callback from a spawned task, so hosts drive it exactly
//! like any other resolver.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::FutureExt;
use tokio::runtime::Handle;

use script_deps::completion::ResultCallback;
use script_deps::contents::ScriptContents;
use script_deps::deps::ResolvedDependencies;
use script_deps::report::ReportSink;
use script_deps::resolver::{Environment, ScriptDependenciesResolver};
use script_deps::result::{ResultOrAsync, ValueOrError};

use crate::driver::panic_message;

/// A dependencies resolver written against async/await.
///
/// Parameters are owned so the returned future carries no borrows into
/// the spawned task.
#[async_trait]
pub trait AsyncScriptDependenciesResolver: Send + Sync {
    async fn resolve(
        &self,
        script: ScriptContents,
        environment: Option<Environment>,
        report: ReportSink,
    ) -> Result<Option<ResolvedDependencies>>;
}

/// Adapts an [`AsyncScriptDependenciesResolver`] to
/// [`ScriptDependenciesResolver`].
///
/// The callback fires exactly once per call: a normal return completes it
/// with the value or error, and a panic inside the future is caught and
/// completed as an error.
pub struct AsyncResolverBridge<R> {
    inner: Arc<R>,
    runtime: Handle,
}

impl<R: AsyncScriptDependenciesResolver + 'static> AsyncResolverBridge<R> {
    /// Bridge onto the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics outside a runtime context; use [`Self::with_handle`] there.
    pub fn new(inner: R) -> Self {
        Self::with_handle(inner, Handle::current())
    }

    pub fn with_handle(inner: R, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(inner),
            runtime,
        }
    }
}

impl<R: AsyncScriptDependenciesResolver + 'static> ScriptDependenciesResolver
    for AsyncResolverBridge<R>
{
    fn resolve(
        &self,
        script: &ScriptContents,
        environment: Option<&Environment>,
        report: &ReportSink,
        on_result: ResultCallback<Option<ResolvedDependencies>>,
    ) -> ResultOrAsync<Option<ResolvedDependencies>> {
        let inner = Arc::clone(&self.inner);
        let script = script.clone();
        let environment = environment.cloned();
        let report = report.clone();

        self.runtime.spawn(async move {
            let fut = inner.resolve(script, environment, report);
            let outcome = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(deps)) => ValueOrError::Value(deps),
                Ok(Err(err)) => ValueOrError::Error(err),
                Err(payload) => ValueOrError::Error(anyhow!(
                    "async resolver panicked: {}",
                    panic_message(payload.as_ref())
                )),
            };
            on_result.complete(outcome);
        });

        ResultOrAsync::Async
    }
}

impl<R> fmt::Debug for AsyncResolverBridge<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncResolverBridge").finish_non_exhaustive()
    }
}
