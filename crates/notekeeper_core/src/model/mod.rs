//! Domain model for the note keeper.
//!
//! # Responsibility
//! - Define the canonical `Note` record persisted by the store.
//! - Keep id generation and invariants next to the data they protect.
//!
//! # Invariants
//! - Every note is identified by an id that is unique within its collection.
//! - Persisted notes always carry non-empty content.

pub mod note;
