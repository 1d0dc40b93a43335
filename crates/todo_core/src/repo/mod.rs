//! Repository layer for the todo store file.
//!
//! # Responsibility
//! - Define the CRUD contract consumed by the service layer.
//! - Keep CSV encoding and file replacement details inside core.
//!
//! # Invariants
//! - Absent or header-only stores are reported as outcomes, not errors.
//! - I/O and encoding failures propagate as `StoreError` without retry.

pub mod todo_repo;
