//! Read-side projections of the note collection.
//!
//! # Responsibility
//! - Derive the filtered, sorted sequence of notes to display.
//! - Shape projected notes into display cards.
//!
//! # Invariants
//! - Projection never mutates or reorders the store's collection.
//! - Identical inputs always produce identical output.

pub mod card;
pub mod projector;
