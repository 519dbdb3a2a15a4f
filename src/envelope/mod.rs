//! Persistence envelope for draftstore records
//!
//! Every versioned write wraps the payload in a [`StoredRecord`]:
//!
//! ```text
//! { "data": <payload>, "version": 1, "timestamp": <epoch-ms>, "checksum": "<8 hex digits>" }
//! ```
//!
//! The checksum is CRC32 over the serialized payload and exists for
//! corruption detection only. Reads verify the checksum before the payload
//! is accepted; a mismatch rejects the record.

mod checksum;
mod errors;
mod record;

pub use checksum::{compute_checksum, format_checksum, verify_checksum};
pub use errors::{EnvelopeError, EnvelopeResult};
pub use record::{StoredRecord, ENVELOPE_VERSION};
