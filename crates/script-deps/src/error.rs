//! The not-implemented marker and helpers for spotting it.
//!
//! A resolver with no resolution logic answers synchronously with
//! `Result(Error(not_implemented()))` instead of raising past the
//! boundary. Hosts conventionally read that marker as "zero additional
//! dependencies," not as a failure, so it must stay recognizable even
//! after context has been layered onto the error, hence the chain walk
//! in [`is_not_implemented`].

use std::error::Error as StdError;
use std::fmt;

/// Marker carried by the error of a resolver that has no resolution logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotImplemented;

impl fmt::Display for NotImplemented {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("script dependency resolution is not implemented")
    }
}

impl StdError for NotImplemented {}

/// The conventional not-implemented resolution error.
pub fn not_implemented() -> anyhow::Error {
    anyhow::Error::new(NotImplemented)
}

/// True when `err` signals an unimplemented resolver anywhere in its
/// cause chain.
pub fn is_not_implemented(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<NotImplemented>().is_some())
}
