//! Store error reporting
//!
//! The container never throws across its public API boundary. Failures are
//! wrapped in a [`StoreError`] carrying the lifecycle phase they occurred
//! in, recorded on the store (`last_error`), and handed to the `on_error`
//! callback so UI layers can render retry affordances without try/catch.

use std::fmt;

/// Lifecycle phase in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePhase {
    /// Backend read, deserialization, or verification failed at
    /// construction; the store fell back to the initial value.
    Load,
    /// Backend write failed; the store stays dirty for retry.
    Save,
    /// Backend remove failed; the in-memory reset still proceeded.
    Clear,
}

impl StorePhase {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StorePhase::Load => "LOAD",
            StorePhase::Save => "SAVE",
            StorePhase::Clear => "CLEAR",
        }
    }
}

impl fmt::Display for StorePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A non-fatal failure reported through the `on_error` callback.
#[derive(Debug, Clone)]
pub struct StoreError {
    phase: StorePhase,
    key: String,
    message: String,
}

impl StoreError {
    /// Create a load-phase error for `key`.
    pub fn load(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phase: StorePhase::Load,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a save-phase error for `key`.
    pub fn save(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phase: StorePhase::Save,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a clear-phase error for `key`.
    pub fn clear(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phase: StorePhase::Clear,
            key: key.into(),
            message: message.into(),
        }
    }

    /// The lifecycle phase the failure occurred in.
    pub fn phase(&self) -> StorePhase {
        self.phase
    }

    /// The storage key of the affected store.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human-readable failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] key '{}': {}", self.phase, self.key, self.message)
    }
}

impl std::error::Error for StoreError {}
