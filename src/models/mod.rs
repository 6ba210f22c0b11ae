//! Core data models for sage-relay
//!
//! Payloads pushed by the bridge and the entries they turn into once
//! rendered.

pub mod connectivity;
pub mod line_batch;
pub mod log_entry;

// Re-exports for convenience
pub use connectivity::ConnectivityState;
pub use line_batch::LineBatch;
pub use log_entry::{EntryKind, LogEntry};
