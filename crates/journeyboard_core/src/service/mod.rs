//! Feature services composed by the page shell.
//!
//! # Responsibility
//! - Own each feature's in-memory state and its `RecordStore` handle.
//! - Route user intents (toggle, add, edit, delete, field change) into
//!   whole-collection writes.
//!
//! # Invariants
//! - Features never read each other's collections.
//! - Caller-visible state equals what was (or would have been) persisted.

pub mod calendar;
pub mod countdown;
pub mod fitness;
pub mod journal;
pub mod shell;
pub mod ticker;
pub mod vision;
