//! Task list domain model.
//!
//! # Responsibility
//! - Define the task record and creation payload used by every store.
//! - Define the local filter predicate used by views.
//!
//! # Invariants
//! - Every task is identified by a store-assigned `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod filter;
pub mod task;
