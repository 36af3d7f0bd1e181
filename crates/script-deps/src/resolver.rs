//! The resolver contract.
//!
//! This module defines [`ScriptDependenciesResolver`], the interface a
//! pluggable resolver implements to tell a script host what external
//! libraries a script needs. The interesting part is the completion
//! protocol, not the resolution logic: a call may finish synchronously
//! with an immediate outcome, or asynchronously with a guaranteed single
//! later callback.
//!
//! For one resolution call:
//!
//! ```text
//! CALLED ──returns Result(Value | Error)──▶ DONE    (callback never fires)
//! CALLED ──returns Async──▶ PENDING ──callback fires once──▶ DONE
//! ```
//!
//! No other transition is legal. The `on_result` callback is a move-only
//! value, so firing it twice is unrepresentable; the host side detects a
//! dropped-unfired callback instead of hanging. All reports intended for
//! a call must be emitted before its terminal event.
//!
//! # Example
//!
//! ```
//! use script_deps::completion::ResultCallback;
//! use script_deps::contents::ScriptContents;
//! use script_deps::deps::ResolvedDependencies;
//! use script_deps::report::ReportSink;
//! use script_deps::resolver::{Environment, ScriptDependenciesResolver};
//! use script_deps::result::{ResultOrAsync, ValueOrError};
//!
//! struct ClasspathResolver;
//!
//! impl ScriptDependenciesResolver for ClasspathResolver {
//!     fn resolve(
//!         &self,
//!         script: &ScriptContents,
//!         _environment: Option<&Environment>,
//!         report: &ReportSink,
//!         _on_result: ResultCallback<Option<ResolvedDependencies>>,
//!     ) -> ResultOrAsync<Option<ResolvedDependencies>> {
//!         // Synchronous path: compute and return, never touch on_result.
//!         let jars: Vec<std::path::PathBuf> = script
//!             .annotations()
//!             .iter()
//!             .filter(|annotation| annotation.is("DependsOn"))
//!             .flat_map(|annotation| annotation.arguments.iter())
//!             .map(|artifact| format!("libs/{artifact}.jar").into())
//!             .collect();
//!         report.info(&format!("mapped {} artifacts", jars.len()), None);
//!         ResultOrAsync::Result(ValueOrError::Value(Some(
//!             ResolvedDependencies::new().with_classpath(jars),
//!         )))
//!     }
//! }
//!
//! let (on_result, handle) = script_deps::completion::channel();
//! let script = ScriptContents::new()
//!     .with_annotation(script_deps::contents::ScriptAnnotation::new(
//!         "DependsOn",
//!         vec!["guava".to_string()],
//!     ));
//! let returned = ClasspathResolver.resolve(&script, None, &ReportSink::ignore(), on_result);
//! assert!(!returned.is_async());
//! handle.mark_synchronous();
//! ```

use std::collections::HashMap;

use crate::completion::ResultCallback;
use crate::contents::ScriptContents;
use crate::deps::ResolvedDependencies;
use crate::error::not_implemented;
use crate::future::{BlockingFuture, ImmediateFuture};
use crate::report::ReportSink;
use crate::result::{ResultOrAsync, ValueOrError};

/// Arbitrary host-supplied configuration passed through to resolvers:
/// working directory, repository URLs, classpath hints, whatever the host
/// and resolver agree on. This layer attaches no meaning to the keys.
pub type Environment = HashMap<String, serde_json::Value>;

/// The contract between a script host and a pluggable dependency resolver.
///
/// `Send + Sync` so hosts can share resolvers behind `Arc` across threads.
///
/// ## Implementation obligations
///
/// - Return `Result(..)` **or** `Async`, never both behaviors: after a
///   synchronous `Result` return the callback must not fire; after `Async`
///   it must fire exactly once, eventually.
/// - Capture every fault of the synchronous path into
///   `Result(Error(..))`; nothing unwinds past this call. Faults of the
///   background path go through `on_result` as an `Error` outcome.
/// - Emit all reports for a call before its terminal event. `report` and
///   `on_result` may be invoked from any resolver-chosen thread.
/// - A resolver with no logic returns
///   `Result(Error(not_implemented()))`; hosts treat that as "zero
///   additional dependencies," not as failure.
pub trait ScriptDependenciesResolver: Send + Sync {
    /// Determine the external dependencies of `script`.
    ///
    /// `environment` is optional host configuration; `report` is the
    /// diagnostic channel; `on_result` must be completed exactly once if
    /// and only if this call returns [`ResultOrAsync::Async`].
    fn resolve(
        &self,
        script: &ScriptContents,
        environment: Option<&Environment>,
        report: &ReportSink,
        on_result: ResultCallback<Option<ResolvedDependencies>>,
    ) -> ResultOrAsync<Option<ResolvedDependencies>>;

    /// Old blocking-future entry point, retained for callers that have not
    /// moved to the callback protocol.
    ///
    /// The default body is itself part of the contract: an unimplemented
    /// legacy path yields an immediate absent result, "no dependencies
    /// resolved," not an error. `previous_dependencies` is a hint from the
    /// prior resolution that incremental resolvers may use to
    /// short-circuit; ignoring it is always legal.
    #[deprecated(note = "blocking-future convention; implement `resolve` instead")]
    fn resolve_legacy(
        &self,
        script: &ScriptContents,
        environment: Option<&Environment>,
        report: &ReportSink,
        previous_dependencies: Option<&ResolvedDependencies>,
    ) -> Box<dyn BlockingFuture<Option<ResolvedDependencies>> + Send> {
        let _ = (script, environment, report, previous_dependencies);
        Box::new(ImmediateFuture::new(None))
    }
}

/// The resolver a host falls back to when nothing real is registered.
///
/// Every call answers synchronously with the not-implemented marker and
/// touches neither the report sink nor the callback: the callback is
/// dropped unfired, and the synchronous return is the terminal event.
/// A host that sees the marker knows no real resolver ran.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResolver;

impl ScriptDependenciesResolver for NoOpResolver {
    fn resolve(
        &self,
        _script: &ScriptContents,
        _environment: Option<&Environment>,
        _report: &ReportSink,
        _on_result: ResultCallback<Option<ResolvedDependencies>>,
    ) -> ResultOrAsync<Option<ResolvedDependencies>> {
        ResultOrAsync::Result(ValueOrError::Error(not_implemented()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion;
    use crate::error::is_not_implemented;
    use crate::report::Report;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn counting_sink() -> (ReportSink, Arc<Mutex<Vec<Report>>>) {
        let collected = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::clone(&collected);
        (
            ReportSink::new(move |report| store.lock().push(report.clone())),
            collected,
        )
    }

    #[test]
    fn test_noop_resolver_answers_not_implemented() {
        let (sink, collected) = counting_sink();
        let count = Arc::new(AtomicUsize::new(0));
        let fired = Arc::clone(&count);
        let on_result = ResultCallback::from_fn(move |_outcome| {
            fired.fetch_add(1, Ordering::SeqCst);
        });

        let returned = NoOpResolver.resolve(
            &ScriptContents::new(),
            Some(&Environment::new()),
            &sink,
            on_result,
        );

        match returned {
            ResultOrAsync::Result(ValueOrError::Error(err)) => {
                assert!(is_not_implemented(&err));
            }
            other => panic!("expected synchronous error, got {:?}", other),
        }

        // Bounded wait: the callback must stay silent.
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(collected.lock().is_empty());
    }

    /// A minimal synchronous implementation, the shape most real
    /// resolvers start from.
    struct FixedResolver {
        classpath: &'static str,
    }

    impl ScriptDependenciesResolver for FixedResolver {
        fn resolve(
            &self,
            _script: &ScriptContents,
            _environment: Option<&Environment>,
            _report: &ReportSink,
            _on_result: ResultCallback<Option<ResolvedDependencies>>,
        ) -> ResultOrAsync<Option<ResolvedDependencies>> {
            let deps = ResolvedDependencies::new().with_classpath(vec![self.classpath.into()]);
            ResultOrAsync::Result(ValueOrError::Value(Some(deps)))
        }
    }

    #[test]
    fn test_sync_resolver_through_trait_object() {
        let resolver: Arc<dyn ScriptDependenciesResolver> =
            Arc::new(FixedResolver { classpath: "a.jar" });
        let (on_result, handle) = completion::channel();

        let returned = resolver.resolve(
            &ScriptContents::new().with_text("@DependsOn(\"a\")"),
            None,
            &ReportSink::ignore(),
            on_result,
        );

        let outcome = returned.into_outcome().expect("synchronous return");
        let deps = outcome
            .into_result()
            .expect("value outcome")
            .expect("present payload");
        assert_eq!(deps.classpath, vec![std::path::PathBuf::from("a.jar")]);

        // Synchronous return means the handle never completes.
        handle.mark_synchronous();
        assert!(handle.try_take().is_none());
    }

    #[test]
    #[allow(deprecated)]
    fn test_default_legacy_path_yields_immediate_absent() {
        let resolver = FixedResolver { classpath: "a.jar" };
        let future = resolver.resolve_legacy(
            &ScriptContents::new(),
            None,
            &ReportSink::ignore(),
            None,
        );

        assert!(future.is_done());
        assert!(!future.is_cancelled());
        assert_eq!(future.get(), None);
        assert_eq!(future.get_timeout(Duration::from_secs(5)), None);
        assert!(!future.cancel(true));
    }

    #[test]
    fn test_resolver_is_shareable_across_threads() {
        let resolver: Arc<dyn ScriptDependenciesResolver> =
            Arc::new(FixedResolver { classpath: "b.jar" });
        let cloned = Arc::clone(&resolver);

        let worker = std::thread::spawn(move || {
            let (on_result, _handle) = completion::channel();
            let returned =
                cloned.resolve(&ScriptContents::new(), None, &ReportSink::ignore(), on_result);
            returned.into_outcome().is_some()
        });

        assert!(worker.join().expect("worker thread"));
    }
}
