//! Audit logging for MoneyMate
//!
//! Every create, update and delete performed by the services is appended to
//! `audit.log` as one JSON object per line, with before/after snapshots and
//! a short diff for updates. Password hashes are stripped from snapshots.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{snapshot, AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
