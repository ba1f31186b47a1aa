//! Note domain model.
//!
//! # Responsibility
//! - Define the single persisted record of the note keeper.
//! - Own id generation and invariant validation for notes.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `content` is non-empty after trimming for every persisted note.
//! - `created <= updated`.
//!
//! # Persisted shape
//! Serialized field names (`id`, `title`, `content`, `created`, `updated`)
//! are part of the storage format and must not be renamed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Title shown for notes saved without one.
pub const UNTITLED: &str = "Untitled";

const ID_PREFIX: &str = "n_";
const ID_RANDOM_CHARS: usize = 8;

/// Opaque note identifier.
///
/// Kept as a type alias so signatures read as ids, while persisted values
/// from older stores (any string) stay loadable.
pub type NoteId = String;

/// A user-authored title/content pair with creation and update timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// May be empty; display falls back to [`UNTITLED`].
    #[serde(default)]
    pub title: String,
    pub content: String,
    /// Unix epoch milliseconds, immutable after creation.
    pub created: i64,
    /// Unix epoch milliseconds, refreshed on every edit.
    #[serde(default)]
    pub updated: i64,
}

/// Invariant violations detected by [`Note::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyId,
    EmptyContent,
    UpdatedBeforeCreated { created: i64, updated: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "note id cannot be empty"),
            Self::EmptyContent => write!(f, "note content cannot be empty"),
            Self::UpdatedBeforeCreated { created, updated } => write!(
                f,
                "note updated timestamp {updated} is earlier than created {created}"
            ),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Creates a note stamped at `now_ms` with a freshly generated id.
    ///
    /// Title and content are trimmed. The result is not validated; callers
    /// on write paths must call [`Note::validate`].
    pub fn new(title: &str, content: &str, now_ms: i64) -> Self {
        Self {
            id: generate_note_id(now_ms),
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            created: now_ms,
            updated: now_ms,
        }
    }

    /// Replaces editable fields and refreshes `updated`.
    ///
    /// `updated` never moves behind `created`, even if the clock does.
    pub fn apply_edit(&mut self, title: &str, content: &str, now_ms: i64) {
        self.title = title.trim().to_string();
        self.content = content.trim().to_string();
        self.updated = now_ms.max(self.created);
    }

    /// Title used by views: the stored title, or [`UNTITLED`] when blank.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// Timestamp shown on cards: last update, or creation for legacy rows.
    pub fn display_timestamp(&self) -> i64 {
        if self.updated > 0 {
            self.updated
        } else {
            self.created
        }
    }

    /// Lowercased `title + " " + content`, the haystack used by search.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.content).to_lowercase()
    }

    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.trim().is_empty() {
            return Err(NoteValidationError::EmptyId);
        }
        if self.content.trim().is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }
        if self.updated < self.created {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                created: self.created,
                updated: self.updated,
            });
        }
        Ok(())
    }
}

/// Checks create/update input before any state is touched.
pub fn validate_content(content: &str) -> Result<(), NoteValidationError> {
    if content.trim().is_empty() {
        Err(NoteValidationError::EmptyContent)
    } else {
        Ok(())
    }
}

/// Generates `n_<now_ms>_<random>` ids.
///
/// Uniqueness relies on the timestamp plus 32 random bits; collisions are
/// accepted and never retried.
pub fn generate_note_id(now_ms: i64) -> NoteId {
    let random = Uuid::new_v4().simple().to_string();
    format!("{ID_PREFIX}{now_ms}_{}", &random[..ID_RANDOM_CHARS])
}
