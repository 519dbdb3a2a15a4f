//! Envelope error types
//!
//! Any failure here means a record could not be produced or could not be
//! trusted. Callers (the state store) treat wrap failures as save errors
//! and unwrap failures as load errors; neither is ever propagated to UI
//! code as a panic or an uncaught `Err`.

use thiserror::Error;

/// Errors raised while wrapping or unwrapping a stored record.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Payload could not be serialized to JSON.
    #[error("payload serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Raw record text could not be deserialized.
    #[error("record deserialization failed: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// Stored checksum does not match the recomputed checksum.
    #[error("checksum mismatch: computed {computed}, stored {stored}")]
    ChecksumMismatch { computed: String, stored: String },

    /// Record carries an envelope version this build does not understand.
    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u32),
}

/// Result type for envelope operations.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;
