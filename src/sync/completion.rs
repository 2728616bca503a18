//! One-shot completion handle
//!
//! `parking_lot::Mutex` + `Condvar` around an `Option<T>`. The first
//! resolution wins; waiters block until it happens and then always observe
//! the same value.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

struct Slot<T> {
    value: Mutex<Option<T>>,
    ready: Condvar,
}

/// Producer side: resolves the slot exactly once
pub struct Resolver<T> {
    slot: Arc<Slot<T>>,
}

/// Consumer side: blocks until the slot is resolved
pub struct Waiter<T> {
    slot: Arc<Slot<T>>,
}

/// Create a connected resolver / waiter pair
pub fn completion_pair<T: Clone>() -> (Resolver<T>, Waiter<T>) {
    let slot = Arc::new(Slot {
        value: Mutex::new(None),
        ready: Condvar::new(),
    });
    (
        Resolver {
            slot: Arc::clone(&slot),
        },
        Waiter { slot },
    )
}

impl<T: Clone> Resolver<T> {
    /// Store the outcome and wake every waiter.
    ///
    /// Returns `false` (and drops `value`) if the slot was already resolved.
    pub fn resolve(&self, value: T) -> bool {
        let mut guard = self.slot.value.lock();
        if guard.is_some() {
            return false;
        }
        *guard = Some(value);
        drop(guard);
        self.slot.ready.notify_all();
        true
    }

    /// Whether an outcome has been stored
    pub fn is_resolved(&self) -> bool {
        self.slot.value.lock().is_some()
    }
}

impl<T: Clone> Waiter<T> {
    /// A waiter that is already resolved with `value`
    pub fn resolved(value: T) -> Self {
        let (resolver, waiter) = completion_pair();
        resolver.resolve(value);
        waiter
    }

    /// Block until resolved, then return the outcome.
    ///
    /// May be called repeatedly; every call returns the same value.
    pub fn wait(&self) -> T {
        let mut guard = self.slot.value.lock();
        loop {
            if let Some(value) = guard.as_ref() {
                return value.clone();
            }
            self.slot.ready.wait(&mut guard);
        }
    }

    /// Non-blocking peek at the outcome
    pub fn try_get(&self) -> Option<T> {
        self.slot.value.lock().clone()
    }
}

impl<T> Clone for Waiter<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

impl<T> fmt::Debug for Waiter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waiter").finish_non_exhaustive()
    }
}
