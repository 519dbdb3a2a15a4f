//! CRC32 checksum computation for persisted records
//!
//! Uses CRC32 (IEEE polynomial) as a cheap, deterministic corruption
//! detector. This is NOT a security primitive: it detects accidental
//! corruption and nothing more. Do not rely on it for tamper resistance;
//! if that becomes a requirement, move to a cryptographic hash instead of
//! strengthening this one.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
///
/// Deterministic: the same input always produces the same output.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Formats a checksum as the 8-hex-digit string stored in the envelope.
pub fn format_checksum(checksum: u32) -> String {
    format!("{:08x}", checksum)
}

/// Verifies that the computed checksum matches the expected checksum string.
pub fn verify_checksum(data: &[u8], expected: &str) -> bool {
    format_checksum(compute_checksum(data)) == expected
}
