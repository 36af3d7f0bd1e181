//! Async handoff and completion tests
//!
//! Test coverage areas:
//! - Background completion from resolver-owned threads
//! - Exactly-once callback delivery and report-before-completion ordering
//! - Host policy when the callback never fires or is dropped
//! - The tokio bridge, driven end to end through the harness

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use script_deps::completion::{self, ResultCallback, WaitOutcome};
use script_deps::contents::ScriptContents;
use script_deps::deps::ResolvedDependencies;
use script_deps::report::{Report, ReportSeverity, ReportSink};
use script_deps::resolver::{Environment, ScriptDependenciesResolver};
use script_deps::result::ResultOrAsync;

use script_host::async_resolver::{AsyncResolverBridge, AsyncScriptDependenciesResolver};
use script_host::driver::ResolutionConfig;
use script_host::harness::ResolutionHarness;
use script_host::reports::ReportLog;
use script_host::resolvers::StaticResolver;

fn sample_deps() -> ResolvedDependencies {
    ResolvedDependencies::new().with_classpath(vec![PathBuf::from("libs/ktor-client.jar")])
}

// =============================================================================
// Background Threads
// =============================================================================

#[test]
fn test_background_completion_through_harness() {
    let resolver = StaticResolver::new()
        .with_dependencies(sample_deps())
        .with_report(Report::new(ReportSeverity::Info, "downloading metadata", None))
        .with_background_delay(Duration::from_millis(20));
    let harness = ResolutionHarness::new().with_resolver("kts", Arc::new(resolver));

    let result = harness.resolve("kts", &ScriptContents::new(), None);
    assert!(result.is_success());
    assert_eq!(result.dependencies, Some(sample_deps()));
    assert_eq!(result.reports.len(), 1);
    assert_eq!(result.reports[0].message, "downloading metadata");
}

#[test]
fn test_callback_fires_exactly_once() {
    let resolver = StaticResolver::new()
        .with_dependencies(sample_deps())
        .with_background_delay(Duration::from_millis(300));

    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let callback = ResultCallback::from_fn(move |_outcome| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let started = Instant::now();
    let returned = resolver.resolve(&ScriptContents::new(), None, &ReportSink::ignore(), callback);
    assert!(returned.is_async());
    // The call hands off; it does not ride along with the background work.
    assert!(started.elapsed() < Duration::from_millis(200));

    thread::sleep(Duration::from_millis(600));
    // Completing consumes the callback, so once is all it can ever be.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reports_observed_before_completion_wakes_waiter() {
    let resolver = StaticResolver::new()
        .with_dependencies(sample_deps())
        .with_report(Report::new(ReportSeverity::Debug, "cache probe", None))
        .with_background_delay(Duration::from_millis(20));
    let log = ReportLog::new();
    let sink = log.sink();
    let (on_result, handle) = completion::channel();

    resolver.resolve(&ScriptContents::new(), None, &sink, on_result);

    match handle.wait(Duration::from_secs(5)) {
        WaitOutcome::Completed(_) => {
            // Everything the worker emitted is already visible here.
            assert_eq!(log.len(), 1);
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

// =============================================================================
// Host Policy for a Callback That Never Comes
// =============================================================================

#[test]
fn test_harness_times_out_on_silent_resolver() {
    struct StallingResolver {
        stash: Arc<Mutex<Option<ResultCallback<Option<ResolvedDependencies>>>>>,
    }

    impl ScriptDependenciesResolver for StallingResolver {
        fn resolve(
            &self,
            _script: &ScriptContents,
            _environment: Option<&Environment>,
            _report: &ReportSink,
            on_result: ResultCallback<Option<ResolvedDependencies>>,
        ) -> ResultOrAsync<Option<ResolvedDependencies>> {
            *self.stash.lock() = Some(on_result);
            ResultOrAsync::Async
        }
    }

    let stash = Arc::new(Mutex::new(None));
    let harness = ResolutionHarness::new()
        .with_resolver(
            "kts",
            Arc::new(StallingResolver {
                stash: Arc::clone(&stash),
            }),
        )
        .with_config(ResolutionConfig::default().with_wait_timeout(Duration::from_millis(50)));

    let result = harness.resolve("kts", &ScriptContents::new(), None);
    assert!(!result.is_success());
    let message = result.error.unwrap().to_string();
    assert!(message.contains("no completion callback"));
}

#[test]
fn test_harness_reports_abandoned_callback() {
    struct AbandoningResolver;

    impl ScriptDependenciesResolver for AbandoningResolver {
        fn resolve(
            &self,
            _script: &ScriptContents,
            _environment: Option<&Environment>,
            _report: &ReportSink,
            on_result: ResultCallback<Option<ResolvedDependencies>>,
        ) -> ResultOrAsync<Option<ResolvedDependencies>> {
            drop(on_result);
            ResultOrAsync::Async
        }
    }

    let harness = ResolutionHarness::new()
        .with_resolver("kts", Arc::new(AbandoningResolver))
        .with_config(ResolutionConfig::default().with_wait_timeout(Duration::from_secs(5)));

    let result = harness.resolve("kts", &ScriptContents::new(), None);
    assert!(!result.is_success());
    let message = result.error.unwrap().to_string();
    assert!(message.contains("abandoned"));
}

// =============================================================================
// Tokio Bridge End to End
// =============================================================================

struct DelayedAsyncResolver {
    deps: ResolvedDependencies,
    delay: Duration,
}

#[async_trait]
impl AsyncScriptDependenciesResolver for DelayedAsyncResolver {
    async fn resolve(
        &self,
        _script: ScriptContents,
        _environment: Option<Environment>,
        report: ReportSink,
    ) -> Result<Option<ResolvedDependencies>> {
        tokio::time::sleep(self.delay).await;
        report.info("fetched from artifact cache", None);
        Ok(Some(self.deps.clone()))
    }
}

struct PanickingAsyncResolver;

#[async_trait]
impl AsyncScriptDependenciesResolver for PanickingAsyncResolver {
    async fn resolve(
        &self,
        _script: ScriptContents,
        _environment: Option<Environment>,
        _report: ReportSink,
    ) -> Result<Option<ResolvedDependencies>> {
        panic!("pom parser bug");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_bridge_through_harness() {
    let bridge = AsyncResolverBridge::new(DelayedAsyncResolver {
        deps: sample_deps(),
        delay: Duration::from_millis(20),
    });
    let harness = ResolutionHarness::new()
        .with_resolver("kts", Arc::new(bridge))
        .with_config(ResolutionConfig::default().with_wait_timeout(Duration::from_secs(5)));

    // The harness blocks, so keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || {
        harness.resolve("kts", &ScriptContents::new(), None)
    })
    .await
    .unwrap();

    assert!(result.is_success());
    assert_eq!(result.dependencies, Some(sample_deps()));
    assert_eq!(result.reports.len(), 1);
    assert_eq!(result.reports[0].message, "fetched from artifact cache");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_bridge_panic_settles_as_error() {
    let bridge = AsyncResolverBridge::new(PanickingAsyncResolver);
    let harness = ResolutionHarness::new()
        .with_resolver("kts", Arc::new(bridge))
        .with_config(ResolutionConfig::default().with_wait_timeout(Duration::from_secs(5)));

    let result = tokio::task::spawn_blocking(move || {
        harness.resolve("kts", &ScriptContents::new(), None)
    })
    .await
    .unwrap();

    assert!(!result.is_success());
    let message = result.error.unwrap().to_string();
    assert!(message.contains("pom parser bug"));
}
