//! Use-case layer over the note store.
//!
//! # Responsibility
//! - Turn user actions into store calls and view projections.
//! - Keep front ends (CLI, GUI shells) free of store details.

pub mod note_keeper;
