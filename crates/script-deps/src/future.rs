//! Blocking-future capability set for the legacy calling convention.
//!
//! Old callers expect resolution to hand back a future they can block on.
//! [`BlockingFuture`] captures exactly that capability set, and
//! [`ImmediateFuture`] satisfies it for values that are already known,
//! with no thread or blocking primitive behind it.

use std::time::Duration;

/// The capability set legacy blocking-future callers expect.
///
/// Object safe: legacy entry points hand out
/// `Box<dyn BlockingFuture<Option<ResolvedDependencies>> + Send>` without
/// naming a concrete future type.
pub trait BlockingFuture<T> {
    /// Block until the value is available and return it. Implementations
    /// whose value may never arrive should bound this themselves and
    /// surface absence through the payload type.
    fn get(&self) -> T;

    /// Block for at most `timeout`. Futures whose value is already known
    /// ignore the bound entirely and return at once.
    fn get_timeout(&self, timeout: Duration) -> T;

    /// Attempt to cancel. Returns `true` only if pending work was actually
    /// stopped, which no future in this crate ever does.
    fn cancel(&self, interrupt_if_running: bool) -> bool;

    /// Whether the value is final.
    fn is_done(&self) -> bool;

    /// Whether a cancellation attempt succeeded.
    fn is_cancelled(&self) -> bool;
}

/// A future whose value was known before the future existed.
///
/// Retrieval never blocks and cancellation always fails. This is the
/// adapter that lets non-blocking resolvers satisfy old future-shaped
/// callers.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use script_deps::future::{BlockingFuture, ImmediateFuture};
///
/// let future = ImmediateFuture::new(Some(42));
/// assert_eq!(future.get(), Some(42));
/// assert_eq!(future.get_timeout(Duration::from_secs(5)), Some(42));
/// assert!(!future.cancel(true));
/// assert!(future.is_done());
/// assert!(!future.is_cancelled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmediateFuture<T> {
    value: T,
}

impl<T> ImmediateFuture<T> {
    /// Wrap an already-known value.
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Unwrap without going through the future interface.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> From<T> for ImmediateFuture<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Clone> BlockingFuture<T> for ImmediateFuture<T> {
    fn get(&self) -> T {
        self.value.clone()
    }

    fn get_timeout(&self, _timeout: Duration) -> T {
        self.value.clone()
    }

    fn cancel(&self, _interrupt_if_running: bool) -> bool {
        false
    }

    fn is_done(&self) -> bool {
        true
    }

    fn is_cancelled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_returns_wrapped_value() {
        let future = ImmediateFuture::new("classpath".to_string());
        assert_eq!(future.get(), "classpath");
        assert_eq!(future.get_timeout(Duration::from_millis(1)), "classpath");
        assert_eq!(future.into_inner(), "classpath");
    }

    #[test]
    fn test_absent_value_is_a_valid_result() {
        let future: ImmediateFuture<Option<String>> = ImmediateFuture::new(None);
        assert_eq!(future.get(), None);
        assert_eq!(future.get_timeout(Duration::from_secs(5)), None);
    }

    #[test]
    fn test_timeout_is_ignored_not_awaited() {
        let future = ImmediateFuture::new(7u32);
        let started = Instant::now();
        assert_eq!(future.get_timeout(Duration::from_secs(5)), 7);
        assert!(
            started.elapsed() < Duration::from_secs(1),
            "retrieval must not block for the timeout"
        );
    }

    #[test]
    fn test_cancellation_always_fails() {
        let future = ImmediateFuture::new(1u8);
        assert!(!future.cancel(false));
        assert!(!future.cancel(true));
        // A failed cancel leaves no trace.
        assert!(!future.is_cancelled());
        assert!(future.is_done());
    }

    #[test]
    fn test_usable_as_boxed_trait_object() {
        let boxed: Box<dyn BlockingFuture<Option<u32>> + Send> =
            Box::new(ImmediateFuture::new(Some(9)));
        assert_eq!(boxed.get(), Some(9));
        assert!(boxed.is_done());
    }

    #[test]
    fn test_from_value() {
        let future: ImmediateFuture<u32> = 5.into();
        assert_eq!(future.get(), 5);
    }
}
