//! Dependency-resolution contract between a script host and pluggable resolvers.
//!
//! A host hands a resolver a read-only [`ScriptContents`] snapshot, an
//! optional [`Environment`] mapping, a [`ReportSink`] for diagnostics, and
//! a single-use [`ResultCallback`]. The resolver answers with
//! [`ResultOrAsync`]: either an immediate [`ValueOrError`] outcome, or a
//! promise that the callback will fire exactly once later. This crate pins
//! down that protocol and its edge rules; actual fetching strategies live
//! in resolver implementations elsewhere.
//!
//! - [`result`] - the `ValueOrError` / `ResultOrAsync` outcome enums
//! - [`completion`] - the exactly-once callback/handle pair
//! - [`contents`] - the script snapshot and diagnostic positions
//! - [`deps`] - the resolved-dependencies payload
//! - [`report`] - severities, reports, and the report sink
//! - [`error`] - the not-implemented marker
//! - [`future`] - the legacy blocking-future capability set
//! - [`resolver`] - the contract trait and the no-op default
//!
//! # Example
//!
//! ```
//! use script_deps::completion;
//! use script_deps::contents::ScriptContents;
//! use script_deps::report::ReportSink;
//! use script_deps::resolver::{NoOpResolver, ScriptDependenciesResolver};
//! use script_deps::result::ResultOrAsync;
//!
//! let resolver = NoOpResolver;
//! let (on_result, handle) = completion::channel();
//! let script = ScriptContents::new().with_text("@DependsOn(\"a\")");
//!
//! match resolver.resolve(&script, None, &ReportSink::ignore(), on_result) {
//!     ResultOrAsync::Result(outcome) => {
//!         handle.mark_synchronous();
//!         assert!(outcome.is_error());
//!     }
//!     ResultOrAsync::Async => {
//!         // wait for the callback with the host's own timeout policy
//!         let _outcome = handle.wait(std::time::Duration::from_secs(30));
//!     }
//! }
//! ```

pub mod completion;
pub mod contents;
pub mod deps;
pub mod error;
pub mod future;
pub mod report;
pub mod resolver;
pub mod result;

// Re-export the contract surface at the crate root
pub use completion::{CompletionHandle, ResultCallback, WaitOutcome};
pub use contents::{Position, ScriptAnnotation, ScriptContents};
pub use deps::ResolvedDependencies;
pub use error::{is_not_implemented, not_implemented, NotImplemented};
pub use future::{BlockingFuture, ImmediateFuture};
pub use report::{Report, ReportSeverity, ReportSink};
pub use resolver::{Environment, NoOpResolver, ScriptDependenciesResolver};
pub use result::{ResultOrAsync, ValueOrError};
