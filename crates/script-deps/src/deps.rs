//! The payload a successful resolution hands back.
//!
//! The protocol itself never looks inside this struct; it travels through
//! `ValueOrError` and the completion callback as an opaque value. The fields
//! are what script hosts conventionally consume: classpath entries,
//! default imports, source roots for navigation, sibling scripts, and an
//! optional JDK home.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// External pieces a script needs on its search paths.
///
/// A resolver may fill any subset; an entirely empty value is a valid
/// "nothing to add" result, distinct from an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependencies {
    /// Jars/directories to append to the compilation classpath.
    pub classpath: Vec<PathBuf>,
    /// Default imports to inject into the script.
    pub imports: Vec<String>,
    /// Source roots for dependency navigation.
    pub sources: Vec<PathBuf>,
    /// Sibling scripts this script depends on.
    pub scripts: Vec<PathBuf>,
    /// JDK home override, when the resolver pins one.
    pub java_home: Option<PathBuf>,
}

impl ResolvedDependencies {
    /// Empty payload; fill it with the `with_*` builders.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classpath(mut self, classpath: Vec<PathBuf>) -> Self {
        self.classpath = classpath;
        self
    }

    pub fn with_imports(mut self, imports: Vec<String>) -> Self {
        self.imports = imports;
        self
    }

    pub fn with_sources(mut self, sources: Vec<PathBuf>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_scripts(mut self, scripts: Vec<PathBuf>) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn with_java_home(mut self, java_home: impl Into<PathBuf>) -> Self {
        self.java_home = Some(java_home.into());
        self
    }

    /// True when no field contributes anything.
    pub fn is_empty(&self) -> bool {
        self.classpath.is_empty()
            && self.imports.is_empty()
            && self.sources.is_empty()
            && self.scripts.is_empty()
            && self.java_home.is_none()
    }
}
