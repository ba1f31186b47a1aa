//! Note repository: the authoritative collection and its persistence.
//!
//! # Responsibility
//! - Own the ordered note collection and mediate every mutation.
//! - Persist the full collection after each mutation through a
//!   `KeyValueBackend`.
//!
//! # Invariants
//! - Write paths validate notes before they enter the collection.
//! - Loading never fails; unreadable data degrades to an empty collection.

pub mod note_store;
