//! Domain model for persisted todo records.
//!
//! # Responsibility
//! - Define the record shape shared by the store, service and CLI layers.
//! - Define outcome envelopes for list/update/delete use-cases.
//!
//! # Invariants
//! - Every record is identified by a `TodoId` assigned once at creation.
//! - New ids continue from the last stored row, so deleting the last row
//!   frees its id for the next create.

pub mod todo;
