//! The idle → busy → settled cycle every tool runs through.

use std::sync::{Mutex, MutexGuard, PoisonError};

use paperdesk_core::request::{RequestState, Status};

/// What a submit call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The control was disabled (request in flight, or nothing to act on). Nothing happened.
    Ignored,
    /// Local validation failed. No request was sent.
    Rejected,
    Succeeded,
    Failed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Slot<R> {
    state: RequestState,
    result: Option<R>,
}

/// Request state plus the result it produced, guarded together.
///
/// At most one request is in flight: [`Lifecycle::try_begin`] refuses while
/// busy. Beginning a request drops the previous result.
pub struct Lifecycle<R> {
    slot: Mutex<Slot<R>>,
}

impl<R> Default for Lifecycle<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Lifecycle<R> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                state: RequestState::default(),
                result: None,
            }),
        }
    }

    /// Enter the busy state. Returns `false` if a request is already in flight.
    pub fn try_begin(&self) -> bool {
        let previous = {
            let mut slot = lock(&self.slot);
            if slot.state.is_busy() {
                return false;
            }
            slot.state = RequestState::busy();
            slot.result.take()
        };
        // Released outside the lock; results may own external resources.
        drop(previous);
        true
    }

    pub fn succeed(&self, result: R) {
        let mut slot = lock(&self.slot);
        slot.state = RequestState::success();
        slot.result = Some(result);
    }

    pub fn fail(&self, message: impl Into<String>) {
        let previous = {
            let mut slot = lock(&self.slot);
            slot.state = RequestState::error(message);
            slot.result.take()
        };
        drop(previous);
    }

    /// Settle directly into success without a request, e.g. when restoring saved work.
    pub fn restore(&self, result: R) -> bool {
        let mut slot = lock(&self.slot);
        if slot.state.is_busy() {
            return false;
        }
        slot.state = RequestState::success();
        slot.result = Some(result);
        true
    }

    pub fn state(&self) -> RequestState {
        lock(&self.slot).state.clone()
    }

    pub fn status(&self) -> Status {
        lock(&self.slot).state.status
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.slot).state.is_busy()
    }

    pub fn has_result(&self) -> bool {
        lock(&self.slot).result.is_some()
    }

    pub fn with_result<T>(&self, f: impl FnOnce(Option<&R>) -> T) -> T {
        let slot = lock(&self.slot);
        f(slot.result.as_ref())
    }

    /// Remove the result, returning to idle unless a request is in flight.
    pub fn take_result(&self) -> Option<R> {
        let mut slot = lock(&self.slot);
        if !slot.state.is_busy() {
            slot.state = RequestState::default();
        }
        slot.result.take()
    }
}

impl<R: Clone> Lifecycle<R> {
    pub fn result(&self) -> Option<R> {
        lock(&self.slot).result.clone()
    }
}
