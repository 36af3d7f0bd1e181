//! Annotation Resolver - Your First Script Resolution
//!
//! This is the simplest example - no network access required.
//! It demonstrates the core pieces of the resolver protocol:
//!
//! 1. Register a resolver for a script kind
//! 2. Describe a script (annotations plus source text)
//! 3. Resolve it and read back dependencies and reports
//! 4. See the not-implemented policy for unregistered kinds
//! 5. Drive the same resolver through the legacy blocking surface
//!
//! Run with: cargo run --example annotation_resolver

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use script_deps::contents::{ScriptAnnotation, ScriptContents};
use script_deps::deps::ResolvedDependencies;
use script_deps::report::ReportSink;
use script_deps::resolver::Environment;
use script_host::harness::ResolutionHarness;
use script_host::legacy::legacy_future_for;
use script_host::resolvers::FnResolver;

fn main() -> Result<()> {
    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║                     Annotation Resolver Example                      ║");
    println!("║                                                                      ║");
    println!("║  Maps @DependsOn annotations to a classpath - fully local!           ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    // =========================================================================
    // Step 1: Register a Resolver for a Script Kind
    // =========================================================================
    // A resolver is any implementation of ScriptDependenciesResolver. Here a
    // closure is enough: it reads @DependsOn annotations and turns each
    // argument into a jar path, reporting what it did along the way.

    println!("Step 1: Registering a resolver for *.main.kts scripts...\n");

    let resolver = FnResolver::new(
        |script: &ScriptContents, _environment: Option<&Environment>, report: &ReportSink| {
            let jars: Vec<PathBuf> = script
                .annotations()
                .iter()
                .filter(|annotation| annotation.is("DependsOn"))
                .flat_map(|annotation| annotation.arguments.iter())
                .map(|artifact| PathBuf::from(format!("libs/{artifact}.jar")))
                .collect();
            report.info(&format!("mapped {} artifacts to jars", jars.len()), None);
            if jars.is_empty() {
                report.warning("script declares no dependencies", None);
                return Ok(None);
            }
            Ok(Some(ResolvedDependencies::new().with_classpath(jars)))
        },
    );

    let harness = ResolutionHarness::new().with_resolver("main.kts", Arc::new(resolver));
    println!("   Registered kinds: {:?}", harness.registry().registered_kinds());

    // =========================================================================
    // Step 2: Describe the Script
    // =========================================================================
    // ScriptContents carries whatever the host already knows: an optional
    // backing file, pre-parsed annotations, and the source text.

    println!("\nStep 2: Describing the script...\n");

    let script = ScriptContents::new()
        .with_annotation(ScriptAnnotation::new(
            "DependsOn",
            vec!["guava".to_string(), "commons-io".to_string()],
        ))
        .with_text("@file:DependsOn(\"guava\", \"commons-io\")\nprintln(\"building\")\n");

    println!("   Annotations: {}", script.annotations().len());
    println!("   Text bytes:  {}", script.text().map_or(0, str::len));

    // =========================================================================
    // Step 3: Resolve
    // =========================================================================
    // One call. The harness looks up the resolver, drives the protocol, and
    // hands back dependencies, the error if any, and every report emitted.

    println!("\nStep 3: Resolving dependencies...\n");

    let result = harness.resolve("main.kts", &script, None);
    for report in &result.reports {
        println!("   [{}] {}", report.severity, report.message);
    }
    let deps = result
        .into_dependencies()?
        .unwrap_or_default();
    println!("   Classpath:");
    for entry in &deps.classpath {
        println!("     - {}", entry.display());
    }

    // =========================================================================
    // Step 4: Unregistered Kinds Are Not Failures
    // =========================================================================
    // Nothing is registered for plain .kts files, so the fallback answers
    // with the not-implemented marker and the harness reads it as "zero
    // additional dependencies."

    println!("\nStep 4: Resolving a kind with no resolver...\n");

    let fallback = harness.resolve("kts", &ScriptContents::new(), None);
    match fallback.into_dependencies()? {
        Some(_) => println!("   Unexpected dependencies from the fallback"),
        None => println!("   No resolver registered: zero dependencies, no error"),
    }

    // =========================================================================
    // Step 5: The Legacy Blocking Surface
    // =========================================================================
    // Hosts that still consume blocking futures use the adapter. The same
    // resolver answers; the future is already settled because the resolver
    // is synchronous.

    println!("\nStep 5: Driving the legacy blocking-future surface...\n");

    let resolver = harness.registry().lookup("main.kts");
    let future = legacy_future_for(
        resolver.as_ref(),
        &script,
        None,
        &ReportSink::ignore(),
        None,
    );
    println!("   future.is_done() = {}", future.is_done());
    let legacy_deps = future.get().unwrap_or_default();
    println!("   Classpath entries via legacy get(): {}", legacy_deps.classpath.len());

    println!("\nDone.");
    Ok(())
}
