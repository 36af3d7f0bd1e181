//! One-call front door for hosts.
//!
//! [`ResolutionHarness`] owns a [`ResolverRegistry`] and a
//! [`ResolutionConfig`], wires a fresh [`ReportLog`] into every call, and
//! hands back a [`ResolutionResult`] bundling the settled dependencies,
//! the error if the call failed, and every report the resolver emitted.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use script_deps::contents::ScriptContents;
use script_deps::deps::ResolvedDependencies;
use script_deps::report::Report;
use script_deps::resolver::{Environment, ScriptDependenciesResolver};

use crate::driver::{drive_resolution, ResolutionConfig};
use crate::registry::ResolverRegistry;
use crate::reports::ReportLog;

/// Everything one resolution produced.
#[derive(Debug)]
pub struct ResolutionResult {
    /// The resolved dependencies, absent when the resolver had none to add.
    pub dependencies: Option<ResolvedDependencies>,
    /// Why the resolution failed, if it did.
    pub error: Option<anyhow::Error>,
    /// Resolver diagnostics in emission order.
    pub reports: Vec<Report>,
}

impl ResolutionResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The dependencies, or the failure that prevented them.
    pub fn into_dependencies(self) -> Result<Option<ResolvedDependencies>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.dependencies),
        }
    }
}

/// Registry plus policy, ready to resolve scripts.
#[derive(Debug)]
pub struct ResolutionHarness {
    registry: Arc<ResolverRegistry>,
    config: ResolutionConfig,
}

impl ResolutionHarness {
    /// Harness over an empty registry with default policy.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ResolverRegistry::new()),
            config: ResolutionConfig::default(),
        }
    }

    pub fn with_registry(registry: Arc<ResolverRegistry>) -> Self {
        Self {
            registry,
            config: ResolutionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolutionConfig) -> Self {
        self.config = config;
        self
    }

    /// Register `resolver` for `kind` and return the harness, for chained
    /// setup.
    pub fn with_resolver(
        self,
        kind: &str,
        resolver: Arc<dyn ScriptDependenciesResolver>,
    ) -> Self {
        self.registry.register(kind, resolver);
        self
    }

    pub fn registry(&self) -> &Arc<ResolverRegistry> {
        &self.registry
    }

    /// Resolve `script` with whatever is registered for `kind`.
    ///
    /// Reports are collected per call; a result never carries another
    /// call's diagnostics.
    pub fn resolve(
        &self,
        kind: &str,
        script: &ScriptContents,
        environment: Option<&Environment>,
    ) -> ResolutionResult {
        let resolver = self.registry.lookup(kind);
        let log = ReportLog::new();
        let sink = log.sink();

        debug!(kind, "resolving script dependencies");
        let outcome = drive_resolution(resolver.as_ref(), script, environment, &sink, &self.config);

        let (dependencies, error) = match outcome {
            Ok(deps) => (deps, None),
            Err(err) => (None, Some(err)),
        };
        ResolutionResult {
            dependencies,
            error,
            reports: log.take(),
        }
    }
}

impl Default for ResolutionHarness {
    fn default() -> Self {
        Self::new()
    }
}
