//! Outcome types for the resolution protocol.
//!
//! Two closed enums describe how a resolution call ends:
//! - [`ValueOrError`] is the outcome itself: the value the resolver produced,
//!   or the error that stopped it.
//! - [`ResultOrAsync`] is the return of a resolution call: an immediate
//!   outcome, or a signal that the outcome will arrive later through the
//!   completion callback.
//!
//! Both are plain data. Exhaustive matching is the intended consumption
//! style; the accessors below exist for call sites where a full match would
//! be noise.

use anyhow::Error;

/// Outcome of a computation: the value it produced or the error that
/// stopped it. Never both.
///
/// # Example
/// ```
/// use script_deps::result::ValueOrError;
///
/// let outcome: ValueOrError<u32> = ValueOrError::Value(7);
/// assert!(outcome.is_value());
/// assert_eq!(outcome.into_result().ok(), Some(7));
/// ```
#[derive(Debug)]
pub enum ValueOrError<R> {
    /// The computation succeeded with this value.
    Value(R),
    /// The computation failed. The error carries a message and its full
    /// cause chain; no particular error hierarchy is assumed.
    Error(Error),
}

impl<R> ValueOrError<R> {
    /// True for the `Value` variant.
    pub fn is_value(&self) -> bool {
        matches!(self, ValueOrError::Value(_))
    }

    /// True for the `Error` variant.
    pub fn is_error(&self) -> bool {
        matches!(self, ValueOrError::Error(_))
    }

    /// The success value, if any.
    pub fn value(&self) -> Option<&R> {
        match self {
            ValueOrError::Value(value) => Some(value),
            ValueOrError::Error(_) => None,
        }
    }

    /// The error, if any.
    pub fn error(&self) -> Option<&Error> {
        match self {
            ValueOrError::Value(_) => None,
            ValueOrError::Error(err) => Some(err),
        }
    }

    /// Map the success value, leaving errors untouched.
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> ValueOrError<U> {
        match self {
            ValueOrError::Value(value) => ValueOrError::Value(f(value)),
            ValueOrError::Error(err) => ValueOrError::Error(err),
        }
    }

    /// Convert into a standard `Result` for `?`-style consumption.
    pub fn into_result(self) -> Result<R, Error> {
        match self {
            ValueOrError::Value(value) => Ok(value),
            ValueOrError::Error(err) => Err(err),
        }
    }
}

impl<R> From<Result<R, Error>> for ValueOrError<R> {
    fn from(result: Result<R, Error>) -> Self {
        match result {
            Ok(value) => ValueOrError::Value(value),
            Err(err) => ValueOrError::Error(err),
        }
    }
}

/// How a resolution call completed: with an immediate outcome, or with the
/// outcome still to come through the completion callback.
///
/// `Async` carries no payload: it is a pure signal that the caller must
/// now wait for the callback.
///
/// # Example
/// ```
/// use script_deps::result::{ResultOrAsync, ValueOrError};
///
/// let returned: ResultOrAsync<u32> = ResultOrAsync::Result(ValueOrError::Value(1));
/// match returned {
///     ResultOrAsync::Result(outcome) => assert!(outcome.is_value()),
///     ResultOrAsync::Async => panic!("completed synchronously"),
/// }
/// ```
#[derive(Debug)]
pub enum ResultOrAsync<R> {
    /// The call completed synchronously with this outcome. The completion
    /// callback must never fire for this call.
    Result(ValueOrError<R>),
    /// The outcome will be delivered later, exactly once, through the
    /// completion callback.
    Async,
}

impl<R> ResultOrAsync<R> {
    /// True for the `Async` variant.
    pub fn is_async(&self) -> bool {
        matches!(self, ResultOrAsync::Async)
    }

    /// The synchronous outcome, or `None` for `Async`.
    pub fn into_outcome(self) -> Option<ValueOrError<R>> {
        match self {
            ResultOrAsync::Result(outcome) => Some(outcome),
            ResultOrAsync::Async => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_value_accessors() {
        let outcome: ValueOrError<&str> = ValueOrError::Value("deps");
        assert!(outcome.is_value());
        assert!(!outcome.is_error());
        assert_eq!(outcome.value(), Some(&"deps"));
        assert!(outcome.error().is_none());
    }

    #[test]
    fn test_error_accessors() {
        let outcome: ValueOrError<u32> = ValueOrError::Error(anyhow!("missing artifact"));
        assert!(outcome.is_error());
        assert!(outcome.value().is_none());
        let err = outcome.error().expect("error variant");
        assert!(err.to_string().contains("missing artifact"));
    }

    #[test]
    fn test_from_result() {
        let ok: ValueOrError<u32> = Ok(3).into();
        assert_eq!(ok.value(), Some(&3));

        let failed: ValueOrError<u32> = Err(anyhow!("boom")).into();
        assert!(failed.is_error());
    }

    #[test]
    fn test_into_result_preserves_cause_chain() {
        let err = anyhow!("socket closed").context("while fetching artifact");
        let outcome: ValueOrError<u32> = ValueOrError::Error(err);
        let err = outcome.into_result().expect_err("error variant");
        let chain: Vec<String> = err.chain().map(|cause| cause.to_string()).collect();
        assert_eq!(chain, vec!["while fetching artifact", "socket closed"]);
    }

    #[test]
    fn test_map_only_touches_values() {
        let doubled = ValueOrError::Value(4).map(|n: u32| n * 2);
        assert_eq!(doubled.value(), Some(&8));

        let failed: ValueOrError<u32> = ValueOrError::Error(anyhow!("boom"));
        let mapped = failed.map(|n| n * 2);
        assert!(mapped.is_error());
    }

    #[test]
    fn test_async_is_a_pure_signal() {
        let pending: ResultOrAsync<u32> = ResultOrAsync::Async;
        assert!(pending.is_async());
        assert!(pending.into_outcome().is_none());

        let done: ResultOrAsync<u32> = ResultOrAsync::Result(ValueOrError::Value(1));
        assert!(!done.is_async());
        assert!(done.into_outcome().expect("synchronous outcome").is_value());
    }
}
