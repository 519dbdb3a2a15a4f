//! File-based persistence backend
//!
//! Stores one JSON file per key under a root directory. Writes go through
//! a temp file, fsync, then an atomic rename, so a crash mid-write leaves
//! the previous record intact rather than a torn one. Keys are
//! percent-encoded into safe filenames; two distinct keys never collide.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::PathBuf;

use super::errors::{BackendError, BackendResult};
use super::PersistenceBackend;

/// A directory-backed [`PersistenceBackend`] with one file per key.
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Opens (creating if needed) the backend root directory.
    pub fn open(root: impl Into<PathBuf>) -> BackendResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| BackendError::write_failed(root.display().to_string(), e))?;
        Ok(Self { root })
    }

    /// Path of the record file for `key`.
    fn record_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }
}

/// Encodes a key into a filename-safe form.
///
/// ASCII alphanumerics plus `.`, `_`, `-` pass through; every other byte
/// becomes `%XX`. The encoding is injective, so distinct keys map to
/// distinct filenames.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02x}", byte)),
        }
    }
    encoded
}

impl PersistenceBackend for FileBackend {
    fn get(&self, key: &str) -> BackendResult<Option<String>> {
        let path = self.record_path(key);
        let mut file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BackendError::read_failed(key, e)),
        };
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| BackendError::read_failed(key, e))?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        let path = self.record_path(key);
        let tmp_path = path.with_extension("json.tmp");

        let mut tmp = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|e| BackendError::write_failed(key, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| BackendError::write_failed(key, e))?;
        tmp.sync_all()
            .map_err(|e| BackendError::write_failed(key, e))?;
        drop(tmp);

        fs::rename(&tmp_path, &path).map_err(|e| BackendError::write_failed(key, e))
    }

    fn remove(&self, key: &str) -> BackendResult<()> {
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::remove_failed(key, e)),
        }
    }
}
