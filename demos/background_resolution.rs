//! Background Resolution - The Async Half of the Protocol
//!
//! Shows a resolver that answers from a tokio task instead of inline:
//!
//! 1. Write a resolver against async/await
//! 2. Bridge it onto the callback protocol
//! 3. Resolve through the harness, blocking wait included
//! 4. Watch the raw handoff: Async return, reports, then exactly one
//!    completion
//!
//! Run with: cargo run --example background_resolution

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use script_deps::completion::{self, WaitOutcome};
use script_deps::contents::{ScriptAnnotation, ScriptContents};
use script_deps::deps::ResolvedDependencies;
use script_deps::report::ReportSink;
use script_deps::resolver::{Environment, ScriptDependenciesResolver};
use script_host::async_resolver::{AsyncResolverBridge, AsyncScriptDependenciesResolver};
use script_host::harness::ResolutionHarness;
use script_host::reports::ReportLog;

/// Pretends to consult a remote repository before answering.
struct RepositoryResolver {
    delay: Duration,
}

#[async_trait]
impl AsyncScriptDependenciesResolver for RepositoryResolver {
    async fn resolve(
        &self,
        script: ScriptContents,
        _environment: Option<Environment>,
        report: ReportSink,
    ) -> Result<Option<ResolvedDependencies>> {
        report.info("contacting repository", None);
        tokio::time::sleep(self.delay).await;

        let jars: Vec<PathBuf> = script
            .annotations()
            .iter()
            .filter(|annotation| annotation.is("DependsOn"))
            .flat_map(|annotation| annotation.arguments.iter())
            .map(|artifact| PathBuf::from(format!("cache/{artifact}.jar")))
            .collect();
        report.info(&format!("downloaded {} artifacts", jars.len()), None);

        Ok(Some(ResolvedDependencies::new().with_classpath(jars)))
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║                    Background Resolution Example                     ║");
    println!("║                                                                      ║");
    println!("║  An async resolver completing the callback from a tokio task         ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    // =========================================================================
    // Step 1: Async Resolver, Bridged
    // =========================================================================
    // RepositoryResolver only knows async/await. AsyncResolverBridge makes
    // it speak the callback protocol: every call returns Async and the
    // callback fires from a spawned task.

    println!("Step 1: Bridging the async resolver onto the protocol...\n");

    let bridge = AsyncResolverBridge::new(RepositoryResolver {
        delay: Duration::from_millis(150),
    });
    let harness = ResolutionHarness::new().with_resolver("main.kts", Arc::new(bridge));

    let script = ScriptContents::new().with_annotation(ScriptAnnotation::new(
        "DependsOn",
        vec!["ktor-client".to_string(), "kotlinx-serialization".to_string()],
    ));

    // =========================================================================
    // Step 2: Resolve Through the Harness
    // =========================================================================
    // The harness blocks until the callback fires, so run it on the
    // blocking pool and leave the async workers to the resolver task.

    println!("Step 2: Resolving through the harness...\n");

    let script_for_harness = script.clone();
    let result = tokio::task::spawn_blocking(move || {
        harness.resolve("main.kts", &script_for_harness, None)
    })
    .await?;

    for report in &result.reports {
        println!("   [{}] {}", report.severity, report.message);
    }
    let deps = result.into_dependencies()?.unwrap_or_default();
    println!("   Classpath:");
    for entry in &deps.classpath {
        println!("     - {}", entry.display());
    }

    // =========================================================================
    // Step 3: The Raw Handoff
    // =========================================================================
    // Same bridge, no harness: the call returns Async immediately, reports
    // arrive while we wait, and the callback completes exactly once.

    println!("\nStep 3: Watching the raw protocol handoff...\n");

    let bridge = AsyncResolverBridge::new(RepositoryResolver {
        delay: Duration::from_millis(150),
    });
    let log = ReportLog::new();
    let (on_result, handle) = completion::channel();

    let returned = bridge.resolve(&script, None, &log.sink(), on_result);
    println!("   resolve() returned: Async = {}", returned.is_async());
    println!("   still pending:      {}", handle.is_pending());

    // Blocking wait; the resolver task runs on the second worker thread.
    let outcome = tokio::task::spawn_blocking(move || handle.wait(Duration::from_secs(5))).await?;
    match outcome {
        WaitOutcome::Completed(outcome) => {
            let deps = outcome.into_result()?.unwrap_or_default();
            println!("   completed with {} classpath entries", deps.classpath.len());
        }
        other => println!("   unexpected wait outcome: {:?}", other),
    }
    for report in &log.snapshot() {
        println!("   [{}] {}", report.severity, report.message);
    }

    println!("\nDone.");
    Ok(())
}
