//! Completion plumbing for asynchronous resolution calls.
//!
//! [`channel`] pairs a [`ResultCallback`], handed to the resolver as its
//! `on_result` argument, with a [`CompletionHandle`] the host keeps. The
//! callback's `complete` consumes it, so a second delivery is not even
//! expressible; dropping it unfired is observable on the handle as
//! abandonment instead of a hang. The resolver may move the callback onto
//! any thread it likes; the slot underneath is a mutex/condvar pair and
//! does not care who knocks.
//!
//! Slot states for one resolution call:
//!
//! ```text
//! Pending ──complete()──────▶ Delivered ──wait()/try_take()──▶ Taken
//!    │
//!    ├──drop callback───────▶ Abandoned
//!    │
//!    └──mark_synchronous()──▶ SealedSynchronous
//! ```
//!
//! `SealedSynchronous` is how the host records that the call already
//! finished via a synchronous `Result` return: a callback that fires
//! afterwards is a contract violation, logged and discarded rather than
//! double-delivered.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::warn;

use crate::result::ValueOrError;

enum SlotState<R> {
    /// No terminal event yet; the callback may still fire.
    Pending,
    /// The callback fired; the outcome waits for the handle to take it.
    Delivered(ValueOrError<R>),
    /// The delivered outcome was consumed by the handle.
    Taken,
    /// The callback was destroyed without firing.
    Abandoned,
    /// The call completed synchronously; the slot accepts no outcome.
    SealedSynchronous,
}

impl<R> SlotState<R> {
    fn name(&self) -> &'static str {
        match self {
            SlotState::Pending => "pending",
            SlotState::Delivered(_) => "delivered",
            SlotState::Taken => "taken",
            SlotState::Abandoned => "abandoned",
            SlotState::SealedSynchronous => "sealed-synchronous",
        }
    }
}

struct Slot<R> {
    state: Mutex<SlotState<R>>,
    changed: Condvar,
}

impl<R> Slot<R> {
    fn deliver(&self, outcome: ValueOrError<R>) {
        let mut state = self.state.lock();
        if matches!(*state, SlotState::Pending) {
            *state = SlotState::Delivered(outcome);
            self.changed.notify_all();
        } else {
            warn!(
                state = state.name(),
                "completion callback fired after the call settled; outcome discarded"
            );
        }
    }

    fn abandon(&self) {
        let mut state = self.state.lock();
        if matches!(*state, SlotState::Pending) {
            *state = SlotState::Abandoned;
            self.changed.notify_all();
        }
    }

    fn seal_synchronous(&self) {
        let mut state = self.state.lock();
        match *state {
            SlotState::Pending | SlotState::Abandoned => {
                *state = SlotState::SealedSynchronous;
            }
            SlotState::Delivered(_) => {
                warn!(
                    "completion callback raced a synchronous result; callback outcome discarded"
                );
                *state = SlotState::SealedSynchronous;
            }
            SlotState::Taken | SlotState::SealedSynchronous => {}
        }
    }

    /// Move a delivered outcome out, leaving `Taken` behind.
    fn take_delivered(state: &mut SlotState<R>) -> Option<ValueOrError<R>> {
        if matches!(*state, SlotState::Delivered(_)) {
            match std::mem::replace(state, SlotState::Taken) {
                SlotState::Delivered(outcome) => Some(outcome),
                _ => None,
            }
        } else {
            None
        }
    }
}

enum CallbackTarget<R> {
    Slot(Arc<Slot<R>>),
    Fn(Box<dyn FnOnce(ValueOrError<R>) + Send>),
}

/// The `on_result` argument of a resolution call.
///
/// `complete` consumes the callback, making "at most once" a property of
/// the type rather than a runtime assertion. Dropping it without
/// completing marks the call abandoned so a waiting host is released
/// instead of stuck.
pub struct ResultCallback<R> {
    target: Option<CallbackTarget<R>>,
}

impl<R> ResultCallback<R> {
    /// Wrap a plain closure. Used by harnesses that want to observe
    /// delivery directly; dropping the callback unfired drops the closure
    /// without invoking it.
    pub fn from_fn(handler: impl FnOnce(ValueOrError<R>) + Send + 'static) -> Self {
        Self {
            target: Some(CallbackTarget::Fn(Box::new(handler))),
        }
    }

    /// Deliver the outcome, consuming the callback.
    pub fn complete(mut self, outcome: ValueOrError<R>) {
        match self.target.take() {
            Some(CallbackTarget::Slot(slot)) => slot.deliver(outcome),
            Some(CallbackTarget::Fn(handler)) => handler(outcome),
            None => {}
        }
    }
}

impl<R> Drop for ResultCallback<R> {
    fn drop(&mut self) {
        if let Some(CallbackTarget::Slot(slot)) = self.target.take() {
            slot.abandon();
        }
    }
}

impl<R> fmt::Debug for ResultCallback<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCallback")
            .field("armed", &self.target.is_some())
            .finish()
    }
}

/// Closed set of ways a wait for the completion callback can end.
#[derive(Debug)]
pub enum WaitOutcome<R> {
    /// The callback fired with this outcome.
    Completed(ValueOrError<R>),
    /// No outcome will ever arrive: the callback was destroyed unfired,
    /// the outcome was already taken, or the call completed synchronously.
    CallbackDropped,
    /// No terminal event inside the wait window; the call is still
    /// pending and waiting may resume.
    TimedOut,
}

/// The host's side of a [`channel`] pair.
pub struct CompletionHandle<R> {
    slot: Arc<Slot<R>>,
}

impl<R> CompletionHandle<R> {
    /// Block until the call reaches a terminal event or `timeout` elapses.
    /// Callable from any thread; only one waiter receives a given outcome.
    pub fn wait(&self, timeout: Duration) -> WaitOutcome<R> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.slot.state.lock();
        loop {
            if let Some(outcome) = Slot::take_delivered(&mut *state) {
                return WaitOutcome::Completed(outcome);
            }
            match *state {
                SlotState::Abandoned => return WaitOutcome::CallbackDropped,
                SlotState::Taken | SlotState::SealedSynchronous => {
                    return WaitOutcome::CallbackDropped
                }
                SlotState::Pending => match deadline {
                    Some(deadline) => {
                        if self.slot.changed.wait_until(&mut state, deadline).timed_out() {
                            // One last look: the callback may have fired
                            // in the window between timeout and relock.
                            if let Some(outcome) = Slot::take_delivered(&mut *state) {
                                return WaitOutcome::Completed(outcome);
                            }
                            if matches!(*state, SlotState::Abandoned) {
                                return WaitOutcome::CallbackDropped;
                            }
                            return WaitOutcome::TimedOut;
                        }
                    }
                    // Timeout too large to represent a deadline; wait
                    // unbounded and rely on notification.
                    None => self.slot.changed.wait(&mut state),
                },
                SlotState::Delivered(_) => {}
            }
        }
    }

    /// Non-blocking poll: the outcome if the callback already fired.
    pub fn try_take(&self) -> Option<ValueOrError<R>> {
        let mut state = self.slot.state.lock();
        Slot::take_delivered(&mut *state)
    }

    /// True while no terminal event has been recorded.
    pub fn is_pending(&self) -> bool {
        matches!(*self.slot.state.lock(), SlotState::Pending)
    }

    /// Record that the call completed synchronously. A callback firing
    /// after this point is discarded with a warning instead of delivered.
    pub fn mark_synchronous(&self) {
        self.slot.seal_synchronous();
    }
}

impl<R> fmt::Debug for CompletionHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionHandle")
            .field("state", &self.slot.state.lock().name())
            .finish()
    }
}

/// A fresh callback/handle pair for one resolution call.
pub fn channel<R>() -> (ResultCallback<R>, CompletionHandle<R>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(SlotState::Pending),
        changed: Condvar::new(),
    });
    (
        ResultCallback {
            target: Some(CallbackTarget::Slot(Arc::clone(&slot))),
        },
        CompletionHandle { slot },
    )
}
