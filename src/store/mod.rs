//! Auto-saving state containers
//!
//! [`StateStore`] is the generic container: it recovers prior state from a
//! [`backend`](crate::backend) at construction, debounces every update into
//! a single-flight save timer, tracks the dirty/clean lifecycle, and can be
//! flushed synchronously when the host is torn down. [`FormStateStore`]
//! specializes it for form records with per-field helpers and transient
//! error/touched bookkeeping.
//!
//! # Invariants
//!
//! - At most one debounce timer is ever outstanding per store; every update
//!   cancels the previous timer before scheduling a new one.
//! - No public operation panics or returns `Err`; failures surface through
//!   `last_error` and the `on_error` callback.
//! - A timer or exit-hook callback firing after the store is dropped is a
//!   no-op, never a write on behalf of a dead owner.

mod errors;
mod exit_flush;
mod form;
mod options;
mod scheduler;
mod state_store;

pub use errors::{StoreError, StorePhase};
pub use exit_flush::{ExitFlushHook, ExitRegistration, ManualExitHook};
pub use form::{FormData, FormStateStore};
pub use options::{StoreOptions, DEFAULT_AUTO_SAVE_DELAY};
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle};
pub use state_store::StateStore;
