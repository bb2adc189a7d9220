//! Task repository contract and store implementations.
//!
//! # Responsibility
//! - Define the data-access contract views depend on.
//! - Provide in-memory, SQLite and REST stores behind that contract.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   transport and storage errors.

pub mod memory_repo;
pub mod remote_repo;
pub mod sqlite_repo;
pub mod task_repo;
