//! Read-only view of the script a resolution call is about.
//!
//! The host builds one [`ScriptContents`] per resolution call: an optional
//! path to the script on disk, the annotations its parser already
//! extracted, and optionally the full source text. Resolvers only read it;
//! annotation extraction and file loading stay on the host side.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Line/column location a diagnostic points at.
///
/// Caller-supplied and not validated against actual source bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 1-based line number as reported by the host's parser.
    pub line: u32,
    /// 1-based column number.
    pub col: u32,
}

impl Position {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// One annotation attached to the script, as extracted by the host's
/// parser. For `@DependsOn("commons-lang")` the name is `DependsOn` and
/// the arguments are `["commons-lang"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptAnnotation {
    /// Annotation name without the leading marker character.
    pub name: String,
    /// Literal arguments in source order.
    pub arguments: Vec<String>,
}

impl ScriptAnnotation {
    pub fn new(name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// True when this annotation carries the given name.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Immutable snapshot of the script under resolution.
///
/// Created by the host per resolution call and handed to the resolver by
/// shared reference; the accessors expose everything there is. Multiple
/// resolvers (or a retry) may read the same snapshot concurrently.
///
/// # Example
/// ```
/// use script_deps::contents::{ScriptAnnotation, ScriptContents};
///
/// let contents = ScriptContents::new()
///     .with_text("@DependsOn(\"a\")\nprintln(x)")
///     .with_annotation(ScriptAnnotation::new("DependsOn", vec!["a".to_string()]));
///
/// assert!(contents.file().is_none());
/// assert_eq!(contents.annotations().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptContents {
    file: Option<PathBuf>,
    annotations: Vec<ScriptAnnotation>,
    text: Option<String>,
}

impl ScriptContents {
    /// Empty snapshot with nothing attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the script's on-disk location.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attach the full source text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append one extracted annotation, preserving source order.
    pub fn with_annotation(mut self, annotation: ScriptAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Replace the whole annotation list.
    pub fn with_annotations(mut self, annotations: Vec<ScriptAnnotation>) -> Self {
        self.annotations = annotations;
        self
    }

    /// The script's on-disk location, when it has one.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// The full source text, when the host chose to include it.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Extracted annotations in source order.
    pub fn annotations(&self) -> &[ScriptAnnotation] {
        &self.annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let contents = ScriptContents::new();
        assert!(contents.file().is_none());
        assert!(contents.text().is_none());
        assert!(contents.annotations().is_empty());
    }

    #[test]
    fn test_builders_accumulate() {
        let contents = ScriptContents::new()
            .with_file("/work/build.kts")
            .with_text("println(1)")
            .with_annotation(ScriptAnnotation::new("DependsOn", vec!["a".to_string()]))
            .with_annotation(ScriptAnnotation::new("Repository", vec!["r".to_string()]));

        assert_eq!(contents.file(), Some(Path::new("/work/build.kts")));
        assert_eq!(contents.text(), Some("println(1)"));
        assert_eq!(contents.annotations().len(), 2);
        // Source order is preserved.
        assert!(contents.annotations()[0].is("DependsOn"));
        assert!(contents.annotations()[1].is("Repository"));
    }

    #[test]
    fn test_with_annotations_replaces() {
        let contents = ScriptContents::new()
            .with_annotation(ScriptAnnotation::new("Old", vec![]))
            .with_annotations(vec![ScriptAnnotation::new("New", vec![])]);
        assert_eq!(contents.annotations().len(), 1);
        assert!(contents.annotations()[0].is("New"));
    }

    #[test]
    fn test_annotation_arguments() {
        let annotation =
            ScriptAnnotation::new("DependsOn", vec!["a".to_string(), "b".to_string()]);
        assert_eq!(annotation.arguments, vec!["a", "b"]);
        assert!(annotation.is("DependsOn"));
        assert!(!annotation.is("Repository"));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 5).to_string(), "3:5");
    }
}
