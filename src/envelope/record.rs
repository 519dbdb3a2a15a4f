//! Stored record envelope
//!
//! Wire shape of a versioned write, in field order:
//!
//! ```text
//! +-----------+--------------------------------------------+
//! | data      | the payload, serialized in place           |
//! | version   | envelope format version (currently 1)      |
//! | timestamp | epoch millis at write time                 |
//! | checksum  | CRC32 of the serialized payload, 8 hex     |
//! +-----------+--------------------------------------------+
//! ```
//!
//! The checksum covers `serde_json::to_string(&data)` exactly.
//! Verification re-serializes through the same payload type, so the digest
//! is stable for a fixed `T` even though JSON object key order is not
//! canonical in general.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::checksum::{compute_checksum, format_checksum};
use super::errors::{EnvelopeError, EnvelopeResult};

/// Current envelope format version.
pub const ENVELOPE_VERSION: u32 = 1;

/// A payload wrapped with version, timestamp, and integrity metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord<T> {
    /// The application payload.
    pub data: T,
    /// Envelope format version.
    pub version: u32,
    /// Epoch millis at write time.
    pub timestamp: i64,
    /// CRC32 of the serialized payload, 8 hex digits.
    pub checksum: String,
}

impl<T: Serialize> StoredRecord<T> {
    /// Wraps a payload, stamping version, timestamp, and checksum.
    pub fn wrap(data: T) -> EnvelopeResult<Self> {
        let serialized = serde_json::to_string(&data).map_err(EnvelopeError::Serialize)?;
        let checksum = format_checksum(compute_checksum(serialized.as_bytes()));
        Ok(Self {
            data,
            version: ENVELOPE_VERSION,
            timestamp: Utc::now().timestamp_millis(),
            checksum,
        })
    }

    /// Serializes the complete record for the backend.
    pub fn serialize(&self) -> EnvelopeResult<String> {
        serde_json::to_string(self).map_err(EnvelopeError::Serialize)
    }

    /// Verifies the envelope version and checksum against the payload.
    pub fn verify(&self) -> EnvelopeResult<()> {
        if self.version != ENVELOPE_VERSION {
            return Err(EnvelopeError::UnsupportedVersion(self.version));
        }
        let serialized = serde_json::to_string(&self.data).map_err(EnvelopeError::Serialize)?;
        let computed = format_checksum(compute_checksum(serialized.as_bytes()));
        if computed != self.checksum {
            return Err(EnvelopeError::ChecksumMismatch {
                computed,
                stored: self.checksum.clone(),
            });
        }
        Ok(())
    }

    /// Verifies the record and returns the payload.
    pub fn unwrap_verified(self) -> EnvelopeResult<T> {
        self.verify()?;
        Ok(self.data)
    }
}

impl<T: DeserializeOwned> StoredRecord<T> {
    /// Parses a raw record string from the backend.
    pub fn deserialize(raw: &str) -> EnvelopeResult<Self> {
        serde_json::from_str(raw).map_err(EnvelopeError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Draft {
        name: String,
        servings: u32,
    }

    fn sample_draft() -> Draft {
        Draft {
            name: "Salad".to_string(),
            servings: 2,
        }
    }

    #[test]
    fn test_wrap_stamps_version_and_checksum() {
        let record = StoredRecord::wrap(sample_draft()).unwrap();
        assert_eq!(record.version, ENVELOPE_VERSION);
        assert_eq!(record.checksum.len(), 8);
        assert!(record.timestamp > 0);
        record.verify().unwrap();
    }

    #[test]
    fn test_record_roundtrip() {
        let record = StoredRecord::wrap(sample_draft()).unwrap();
        let raw = record.serialize().unwrap();
        let parsed: StoredRecord<Draft> = StoredRecord::deserialize(&raw).unwrap();
        let payload = parsed.unwrap_verified().unwrap();
        assert_eq!(payload, sample_draft());
    }

    #[test]
    fn test_wire_shape_field_names() {
        let record = StoredRecord::wrap(sample_draft()).unwrap();
        let raw = record.serialize().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("data").is_some());
        assert_eq!(value["version"], 1);
        assert!(value.get("timestamp").is_some());
        assert!(value["checksum"].is_string());
    }

    #[test]
    fn test_tampered_payload_fails_verification() {
        let mut record = StoredRecord::wrap(sample_draft()).unwrap();
        record.data.name = "Big Salad".to_string();
        let err = record.verify().unwrap_err();
        assert!(matches!(err, EnvelopeError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut record = StoredRecord::wrap(sample_draft()).unwrap();
        record.version = 2;
        let err = record.verify().unwrap_err();
        assert!(matches!(err, EnvelopeError::UnsupportedVersion(2)));
    }
}
