//! The generic auto-saving state container
//!
//! A [`StateStore`] is created once per logical document, bound to a
//! backend key. Construction reads the backend once and adopts any
//! recoverable record; every update marks the store dirty and re-arms a
//! single-flight debounce timer; the timer (or a forced `save_now`) writes
//! the value back through the envelope.
//!
//! State machine per instance:
//!
//! ```text
//! Clean --update--> Dirty --timer/save_now--> Saving --ok--> Clean
//!                     ^                          |
//!                     +------(dirty stays)--- Error --retry--> Saving
//! ```
//!
//! `clear_saved` is reachable from any state and lands in Clean with the
//! initial value. There is no terminal state; the machine runs until the
//! owning context drops the store, which cancels any pending timer and
//! deregisters the exit-flush callback.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::PersistenceBackend;
use crate::envelope::{EnvelopeError, EnvelopeResult, StoredRecord};
use crate::observability::Logger;

use super::errors::StoreError;
use super::exit_flush::ExitRegistration;
use super::options::StoreOptions;
use super::scheduler::{Scheduler, TimerHandle};

struct StoreState<T> {
    value: T,
    initial: T,
    dirty: bool,
    last_saved_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    pending: Option<TimerHandle>,
}

struct Callbacks<T> {
    on_save: Option<Box<dyn FnMut(&T)>>,
    on_load: Option<Box<dyn FnMut(&T)>>,
    on_error: Option<Box<dyn FnMut(&StoreError)>>,
}

/// Shared core, held by the store itself and weakly by timer and
/// exit-hook callbacks. Callbacks sit in their own cell so a handler may
/// read store accessors without tripping the state borrow.
struct Shared<T> {
    key: String,
    versioning: bool,
    auto_save_delay: Duration,
    backend: Rc<dyn PersistenceBackend>,
    scheduler: Rc<dyn Scheduler>,
    state: RefCell<StoreState<T>>,
    callbacks: RefCell<Callbacks<T>>,
}

impl<T: Serialize + DeserializeOwned + Clone + 'static> Shared<T> {
    fn encode(&self, value: &T) -> EnvelopeResult<String> {
        if self.versioning {
            StoredRecord::wrap(value.clone())?.serialize()
        } else {
            serde_json::to_string(value).map_err(EnvelopeError::Serialize)
        }
    }

    fn decode(raw: &str, versioning: bool) -> EnvelopeResult<T> {
        if versioning {
            StoredRecord::<T>::deserialize(raw)?.unwrap_verified()
        } else {
            serde_json::from_str(raw).map_err(EnvelopeError::Deserialize)
        }
    }

    /// Applies an update: new value, dirty, re-armed debounce timer.
    fn apply(self: &Rc<Self>, updater: impl FnOnce(&T) -> T) {
        {
            let mut state = self.state.borrow_mut();
            let next = updater(&state.value);
            state.value = next;
            state.dirty = true;
            // Single-flight: the previous timer dies before a new one is armed
            if let Some(timer) = state.pending.take() {
                timer.cancel();
            }
        }
        self.schedule_save();
    }

    fn schedule_save(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let handle = self.scheduler.schedule_once(
            self.auto_save_delay,
            Box::new(move || {
                // The owner may have dropped before the timer fired
                if let Some(shared) = weak.upgrade() {
                    shared.save();
                }
            }),
        );
        self.state.borrow_mut().pending = Some(handle);
    }

    /// Performs the save synchronously. Returns whether it succeeded.
    fn save(&self) -> bool {
        let encoded = {
            let mut state = self.state.borrow_mut();
            if let Some(timer) = state.pending.take() {
                timer.cancel();
            }
            match self.encode(&state.value) {
                Ok(encoded) => encoded,
                Err(error) => {
                    let error = StoreError::save(&self.key, error.to_string());
                    state.last_error = Some(error.message().to_string());
                    drop(state);
                    Logger::error(
                        "STATE_SAVE_FAILED",
                        &[("key", self.key.as_str()), ("reason", error.message())],
                    );
                    self.emit_error(&error);
                    return false;
                }
            }
        };

        match self.backend.set(&self.key, &encoded) {
            Ok(()) => {
                let saved_value = {
                    let mut state = self.state.borrow_mut();
                    state.last_saved_at = Some(Utc::now());
                    state.dirty = false;
                    state.last_error = None;
                    state.value.clone()
                };
                Logger::info("STATE_SAVED", &[("key", self.key.as_str())]);
                self.emit_save(&saved_value);
                true
            }
            Err(error) => {
                // Dirty stays set so the next update or manual retry
                // re-attempts the write
                let error = StoreError::save(&self.key, error.to_string());
                self.state.borrow_mut().last_error = Some(error.message().to_string());
                Logger::error(
                    "STATE_SAVE_FAILED",
                    &[("key", self.key.as_str()), ("reason", error.message())],
                );
                self.emit_error(&error);
                false
            }
        }
    }

    fn emit_save(&self, value: &T) {
        if let Some(callback) = self.callbacks.borrow_mut().on_save.as_mut() {
            callback(value);
        }
    }

    fn emit_load(&self, value: &T) {
        if let Some(callback) = self.callbacks.borrow_mut().on_load.as_mut() {
            callback(value);
        }
    }

    fn emit_error(&self, error: &StoreError) {
        if let Some(callback) = self.callbacks.borrow_mut().on_error.as_mut() {
            callback(error);
        }
    }
}

/// A state container that persists its value automatically.
///
/// Owned by its creating context; no process-wide singleton. Dropping the
/// store cancels any pending save timer and deregisters the exit-flush
/// callback. Persisted data survives in the backend until `clear_saved`.
pub struct StateStore<T> {
    shared: Rc<Shared<T>>,
    _exit_registration: Option<ExitRegistration>,
}

impl<T: Serialize + DeserializeOwned + Clone + 'static> StateStore<T> {
    /// Creates a store bound to `key`, recovering prior persisted state.
    ///
    /// On a backend hit the record is unwrapped (checksum verified when
    /// versioning is on) and adopted, invoking `on_load`. On a miss the
    /// store adopts `initial_value`. On a read, parse, or verification
    /// failure the store adopts `initial_value` and invokes `on_error`
    /// with a load-phase error. Construction itself never fails.
    pub fn create(key: impl Into<String>, initial_value: T, options: StoreOptions<T>) -> Self {
        let key = key.into();
        let StoreOptions {
            auto_save_delay,
            versioning,
            backend,
            scheduler,
            exit_hook,
            on_save,
            on_load,
            on_error,
        } = options;

        let mut load_error: Option<StoreError> = None;
        let mut recovered = false;
        let value = match backend.get(&key) {
            Ok(Some(raw)) => match Shared::<T>::decode(&raw, versioning) {
                Ok(value) => {
                    recovered = true;
                    value
                }
                Err(error) => {
                    load_error = Some(StoreError::load(&key, error.to_string()));
                    initial_value.clone()
                }
            },
            Ok(None) => initial_value.clone(),
            Err(error) => {
                load_error = Some(StoreError::load(&key, error.to_string()));
                initial_value.clone()
            }
        };

        let shared = Rc::new(Shared {
            key,
            versioning,
            auto_save_delay,
            backend,
            scheduler,
            state: RefCell::new(StoreState {
                value,
                initial: initial_value,
                dirty: false,
                last_saved_at: None,
                last_error: None,
                pending: None,
            }),
            callbacks: RefCell::new(Callbacks {
                on_save,
                on_load,
                on_error,
            }),
        });

        let exit_registration = exit_hook.map(|hook| {
            let weak = Rc::downgrade(&shared);
            hook.register(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    let dirty = shared.state.borrow().dirty;
                    if dirty {
                        shared.save();
                    }
                }
            }))
        });

        if let Some(error) = load_error {
            Logger::warn(
                "RECORD_REJECTED",
                &[("key", shared.key.as_str()), ("reason", error.message())],
            );
            shared.emit_error(&error);
        } else if recovered {
            Logger::info("STATE_RECOVERED", &[("key", shared.key.as_str())]);
            let value = shared.state.borrow().value.clone();
            shared.emit_load(&value);
        }

        Self {
            shared,
            _exit_registration: exit_registration,
        }
    }

    /// Replaces the value, marking the store dirty and re-arming the
    /// debounce timer.
    pub fn set_value(&self, value: T) {
        self.shared.apply(|_| value);
    }

    /// Applies a pure function to the current value, marking the store
    /// dirty and re-arming the debounce timer.
    pub fn update(&self, updater: impl FnOnce(&T) -> T) {
        self.shared.apply(updater);
    }

    /// Cancels any pending timer and saves synchronously.
    ///
    /// Returns `true` on success. Failures are recorded in `last_error`
    /// and reported through `on_error`; the store stays dirty.
    pub fn save_now(&self) -> bool {
        self.shared.save()
    }

    /// Removes the persisted record and resets in-memory state to the
    /// initial value.
    ///
    /// Idempotent: clearing when nothing is stored still resets memory.
    /// If the physical remove fails the in-memory reset proceeds anyway,
    /// so the UI never observes stale data; the failure is reported
    /// through `on_error` and `last_error`.
    pub fn clear_saved(&self) {
        let shared = &self.shared;
        {
            let mut state = shared.state.borrow_mut();
            if let Some(timer) = state.pending.take() {
                timer.cancel();
            }
        }
        let removed = shared.backend.remove(&shared.key);
        {
            let mut state = shared.state.borrow_mut();
            let initial = state.initial.clone();
            state.value = initial;
            state.dirty = false;
            state.last_saved_at = None;
            state.last_error = match &removed {
                Ok(()) => None,
                Err(error) => Some(error.to_string()),
            };
        }
        match removed {
            Ok(()) => Logger::info("STATE_CLEARED", &[("key", shared.key.as_str())]),
            Err(error) => {
                let error = StoreError::clear(&shared.key, error.to_string());
                Logger::error(
                    "STATE_CLEAR_FAILED",
                    &[("key", shared.key.as_str()), ("reason", error.message())],
                );
                shared.emit_error(&error);
            }
        }
    }

    /// Whether the backend currently holds a record for this key.
    /// Pure query; mutates nothing.
    pub fn has_recoverable_data(&self) -> bool {
        matches!(self.shared.backend.get(&self.shared.key), Ok(Some(_)))
    }

    /// The current live value.
    pub fn value(&self) -> T {
        self.shared.state.borrow().value.clone()
    }

    /// The caller-supplied initial value.
    pub fn initial_value(&self) -> T {
        self.shared.state.borrow().initial.clone()
    }

    /// Whether the value has diverged from the last persisted state.
    /// Hosts may use this as the "changes pending" advisory before
    /// navigating away.
    pub fn dirty(&self) -> bool {
        self.shared.state.borrow().dirty
    }

    /// Time of the last successful save, if any.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.shared.state.borrow().last_saved_at
    }

    /// Message of the last save or clear failure, cleared on success.
    pub fn last_error(&self) -> Option<String> {
        self.shared.state.borrow().last_error.clone()
    }

    /// The backend key this store is bound to.
    pub fn key(&self) -> &str {
        &self.shared.key
    }
}

impl<T> Drop for StateStore<T> {
    fn drop(&mut self) {
        // Mandatory cleanup: a dangling timer must not write on behalf of
        // a dead owner. The exit registration deregisters on drop.
        let timer = self.shared.state.borrow_mut().pending.take();
        if let Some(timer) = timer {
            timer.cancel();
        }
    }
}
