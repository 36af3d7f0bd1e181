//! Which resolver handles which script kind.
//!
//! Hosts register resolvers against a script kind, by convention the file
//! extension. Lookup never fails: kinds with no registration fall back to
//! a configurable default, [`NoOpResolver`] unless replaced, whose
//! not-implemented answer the driver reads as "zero dependencies."

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use script_deps::resolver::{NoOpResolver, ScriptDependenciesResolver};

/// Shared map from script kind to resolver.
pub struct ResolverRegistry {
    resolvers: RwLock<HashMap<String, Arc<dyn ScriptDependenciesResolver>>>,
    fallback: Arc<dyn ScriptDependenciesResolver>,
}

impl ResolverRegistry {
    /// Empty registry falling back to [`NoOpResolver`].
    pub fn new() -> Self {
        Self::with_fallback(Arc::new(NoOpResolver))
    }

    /// Empty registry with a custom fallback for unregistered kinds.
    pub fn with_fallback(fallback: Arc<dyn ScriptDependenciesResolver>) -> Self {
        Self {
            resolvers: RwLock::new(HashMap::new()),
            fallback,
        }
    }

    /// Register `resolver` for `kind`, replacing any previous registration.
    pub fn register(&self, kind: &str, resolver: Arc<dyn ScriptDependenciesResolver>) {
        self.resolvers
            .write()
            .insert(Self::normalize_kind(kind), resolver);
    }

    /// Remove the registration for `kind`. Returns whether one existed.
    pub fn deregister(&self, kind: &str) -> bool {
        self.resolvers
            .write()
            .remove(&Self::normalize_kind(kind))
            .is_some()
    }

    /// The resolver for `kind`, or the fallback when none is registered.
    pub fn lookup(&self, kind: &str) -> Arc<dyn ScriptDependenciesResolver> {
        self.resolvers
            .read()
            .get(&Self::normalize_kind(kind))
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.resolvers
            .read()
            .contains_key(&Self::normalize_kind(kind))
    }

    /// Registered kinds, sorted for stable display.
    pub fn registered_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.resolvers.read().keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Normalize a kind so `"KTS"`, `".kts"` and `"kts"` agree.
    fn normalize_kind(kind: &str) -> String {
        kind.trim().trim_start_matches('.').to_lowercase()
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("kinds", &self.registered_kinds())
            .finish_non_exhaustive()
    }
}
