//! Exit-flush hook
//!
//! The debounce window may not have elapsed when the host goes away, so a
//! store registers a flush callback against an [`ExitFlushHook`]: a single
//! teardown signal the host fires once, synchronously, before the page or
//! process is discarded (browser tab close, desktop quit, CLI exit).
//!
//! Registration hands back an [`ExitRegistration`] that deregisters on
//! drop, so a disposed store never flushes on behalf of a dead owner. The
//! "changes pending" advisory the host may want for a navigation warning
//! is the store's `dirty()` accessor; the hook itself carries no state.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// A host teardown signal that flush callbacks can be attached to.
pub trait ExitFlushHook {
    /// Registers `callback` to run when the teardown signal fires.
    fn register(&self, callback: Box<dyn Fn()>) -> ExitRegistration;
}

/// Undo handle for an exit-flush registration.
///
/// Deregisters on drop; [`unregister`](ExitRegistration::unregister) does
/// the same thing eagerly.
pub struct ExitRegistration {
    unregister: Option<Box<dyn FnOnce()>>,
}

impl ExitRegistration {
    /// Wraps a hook-specific deregistration action.
    pub fn new(unregister: impl FnOnce() + 'static) -> Self {
        Self {
            unregister: Some(Box::new(unregister)),
        }
    }

    /// Deregisters the callback now.
    pub fn unregister(mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

impl Drop for ExitRegistration {
    fn drop(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

#[derive(Default)]
struct ManualExitHookInner {
    next_id: u64,
    callbacks: BTreeMap<u64, Rc<dyn Fn()>>,
}

/// An [`ExitFlushHook`] fired explicitly by the host or a test.
///
/// Cloning is cheap and shares the registration set.
#[derive(Default, Clone)]
pub struct ManualExitHook {
    inner: Rc<RefCell<ManualExitHookInner>>,
}

impl ManualExitHook {
    /// Create a hook with no registrations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live registrations.
    pub fn registered_count(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    /// Fires the teardown signal: every registered callback runs once,
    /// synchronously, in registration order.
    pub fn fire(&self) {
        // Snapshot first so a callback that unregisters (or registers)
        // does not re-enter the borrow.
        let snapshot: Vec<Rc<dyn Fn()>> = self.inner.borrow().callbacks.values().cloned().collect();
        for callback in snapshot {
            callback();
        }
    }
}

impl ExitFlushHook for ManualExitHook {
    fn register(&self, callback: Box<dyn Fn()>) -> ExitRegistration {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.callbacks.insert(id, Rc::from(callback));
            id
        };
        let weak = Rc::downgrade(&self.inner);
        ExitRegistration::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().callbacks.remove(&id);
            }
        })
    }
}
