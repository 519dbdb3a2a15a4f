//! draftstore - an auto-saving state container for draft data
//!
//! Keeps user-entered state (in-progress forms, recipe drafts) safe across
//! reloads and crashes without an explicit "Save" action. Edits are debounced
//! into a single write, each persisted record carries a version/timestamp/
//! checksum envelope, and a teardown hook flushes synchronously before the
//! host goes away.

pub mod backend;
pub mod envelope;
pub mod observability;
pub mod store;
