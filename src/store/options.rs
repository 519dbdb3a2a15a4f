//! Store construction options
//!
//! Collects the injected capabilities (backend, scheduler, exit hook),
//! tuning knobs, and lifecycle callbacks for a [`StateStore`]. Defaults:
//! a fresh in-memory backend, a fresh manual scheduler, no exit hook,
//! versioned envelopes, a 2 second debounce window, no callbacks.
//!
//! [`StateStore`]: super::StateStore

use std::rc::Rc;
use std::time::Duration;

use crate::backend::{MemoryBackend, PersistenceBackend};

use super::errors::StoreError;
use super::exit_flush::ExitFlushHook;
use super::scheduler::{ManualScheduler, Scheduler};

/// Default debounce window between the last update and the save.
pub const DEFAULT_AUTO_SAVE_DELAY: Duration = Duration::from_millis(2000);

/// Options for [`StateStore::create`](super::StateStore::create).
pub struct StoreOptions<T> {
    pub(crate) auto_save_delay: Duration,
    pub(crate) versioning: bool,
    pub(crate) backend: Rc<dyn PersistenceBackend>,
    pub(crate) scheduler: Rc<dyn Scheduler>,
    pub(crate) exit_hook: Option<Rc<dyn ExitFlushHook>>,
    pub(crate) on_save: Option<Box<dyn FnMut(&T)>>,
    pub(crate) on_load: Option<Box<dyn FnMut(&T)>>,
    pub(crate) on_error: Option<Box<dyn FnMut(&StoreError)>>,
}

impl<T> Default for StoreOptions<T> {
    fn default() -> Self {
        Self {
            auto_save_delay: DEFAULT_AUTO_SAVE_DELAY,
            versioning: true,
            backend: Rc::new(MemoryBackend::new()),
            scheduler: Rc::new(ManualScheduler::new()),
            exit_hook: None,
            on_save: None,
            on_load: None,
            on_error: None,
        }
    }
}

impl<T> StoreOptions<T> {
    /// Options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the debounce window between the last update and the save.
    pub fn auto_save_delay(mut self, delay: Duration) -> Self {
        self.auto_save_delay = delay;
        self
    }

    /// Enables or disables the version/timestamp/checksum envelope.
    /// When disabled, the bare serialized payload is stored.
    pub fn versioning(mut self, versioning: bool) -> Self {
        self.versioning = versioning;
        self
    }

    /// Sets the persistence backend.
    pub fn backend(mut self, backend: Rc<dyn PersistenceBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the debounce scheduler.
    pub fn scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Attaches a host teardown hook; the store flushes synchronously when
    /// it fires while dirty.
    pub fn exit_hook(mut self, hook: Rc<dyn ExitFlushHook>) -> Self {
        self.exit_hook = Some(hook);
        self
    }

    /// Called with the saved value after every successful save.
    pub fn on_save(mut self, callback: impl FnMut(&T) + 'static) -> Self {
        self.on_save = Some(Box::new(callback));
        self
    }

    /// Called with the recovered value when construction adopts a
    /// persisted record.
    pub fn on_load(mut self, callback: impl FnMut(&T) + 'static) -> Self {
        self.on_load = Some(Box::new(callback));
        self
    }

    /// Called with every load, save, or clear failure.
    pub fn on_error(mut self, callback: impl FnMut(&StoreError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}
