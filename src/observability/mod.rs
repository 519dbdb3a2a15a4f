//! Observability for the draft container
//!
//! Structured JSON logging only: one line per event, synchronous, no
//! buffering, deterministic key ordering. Logging is read-only with no
//! side effects on persistence.
//!
//! Events emitted by the container:
//! - `STATE_RECOVERED` — a persisted record was adopted at construction
//! - `RECORD_REJECTED` — a persisted record failed parsing or verification
//! - `STATE_SAVED` — a debounced or forced save succeeded
//! - `STATE_SAVE_FAILED` — a save hit a backend or serialization error
//! - `STATE_CLEARED` — persisted state was removed
//! - `STATE_CLEAR_FAILED` — the remove failed (memory was still reset)

mod logger;

pub use logger::{Logger, Severity};
