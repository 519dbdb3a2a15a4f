//! In-memory persistence backend
//!
//! The embedding and test backend: a plain `HashMap` behind a `RefCell`.
//! It counts writes so debounce coalescing is observable from tests, and
//! can be switched into failing modes to exercise the container's error
//! paths without a real faulty disk.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;

use super::errors::{BackendError, BackendResult};
use super::PersistenceBackend;

/// A `HashMap`-backed [`PersistenceBackend`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
    set_count: Cell<u64>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    fail_removes: Cell<bool>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls since creation.
    pub fn set_count(&self) -> u64 {
        self.set_count.get()
    }

    /// Make subsequent `get` calls fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Make subsequent `set` calls fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Make subsequent `remove` calls fail.
    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.set(fail);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl PersistenceBackend for MemoryBackend {
    fn get(&self, key: &str) -> BackendResult<Option<String>> {
        if self.fail_reads.get() {
            return Err(BackendError::read_failed(
                key,
                io::Error::new(io::ErrorKind::Other, "injected read failure"),
            ));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        if self.fail_writes.get() {
            return Err(BackendError::rejected(key, "injected write failure"));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.set_count.set(self.set_count.get() + 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> BackendResult<()> {
        if self.fail_removes.get() {
            return Err(BackendError::remove_failed(
                key,
                io::Error::new(io::ErrorKind::Other, "injected remove failure"),
            ));
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("draft").unwrap(), None);

        backend.set("draft", "payload").unwrap();
        assert_eq!(backend.get("draft").unwrap().as_deref(), Some("payload"));

        backend.remove("draft").unwrap();
        assert_eq!(backend.get("draft").unwrap(), None);
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let backend = MemoryBackend::new();
        backend.remove("missing").unwrap();
        assert!(backend.is_empty());
    }

    #[test]
    fn test_set_count_tracks_writes() {
        let backend = MemoryBackend::new();
        backend.set("a", "1").unwrap();
        backend.set("a", "2").unwrap();
        assert_eq!(backend.set_count(), 2);
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_failure_injection() {
        let backend = MemoryBackend::new();
        backend.set("a", "1").unwrap();

        backend.fail_writes(true);
        assert!(backend.set("a", "2").is_err());
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("1"));

        backend.fail_writes(false);
        backend.fail_removes(true);
        assert!(backend.remove("a").is_err());

        backend.fail_removes(false);
        backend.fail_reads(true);
        assert!(backend.get("a").is_err());
    }
}
