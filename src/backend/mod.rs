//! Key-value persistence backends
//!
//! A [`PersistenceBackend`] is a synchronous string key-value store: the
//! draft container reads a key once at construction, writes it on every
//! debounced save, and removes it on clear. Implementations wrap a local,
//! non-networked store; remote persistence is out of scope.
//!
//! The backend key space is shared process-wide. Stores bound to different
//! logical documents must use distinct keys; the container itself never
//! namespaces the keys it is given.
//!
//! Backend errors are typed and always caught by the container; they are
//! surfaced to callers through `last_error` and the error callback, never
//! as an uncaught propagation into UI code.

mod errors;
mod file;
mod memory;

pub use errors::{BackendError, BackendResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;

/// A synchronous key-value store for serialized draft records.
pub trait PersistenceBackend {
    /// Returns the stored value for `key`, or `None` if absent.
    fn get(&self, key: &str) -> BackendResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> BackendResult<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> BackendResult<()>;
}
