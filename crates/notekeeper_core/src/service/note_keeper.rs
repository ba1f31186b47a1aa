//! Note keeper controller.
//!
//! # Responsibility
//! - Own the store and the "currently editing" note id explicitly.
//! - Implement the user-facing action semantics: save (add or update),
//!   edit, delete and clear-all with confirmation, render.
//!
//! # Invariants
//! - Destructive actions run only after the `Confirm` hook agrees.
//! - A rejected save keeps the current edit session.
//! - Any successful save leaves edit mode, even if the edited note vanished.

use crate::clock::Clock;
use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::repo::note_store::{LoadStatus, NoteStore, StoreError};
use crate::storage::KeyValueBackend;
use crate::view::card::{render, RenderedView};
use crate::view::projector::{project, SortMode};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation message for saves without content.
pub const EMPTY_CONTENT_MESSAGE: &str = "Please write some content for the note.";
pub const CONFIRM_DELETE_PROMPT: &str = "Delete this note?";
pub const CONFIRM_CLEAR_PROMPT: &str = "Delete all notes?";
pub const ADD_LABEL: &str = "Add Note";
pub const UPDATE_LABEL: &str = "Update Note";

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Approves every prompt (scripted or `--yes` usage).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Controller-level error.
#[derive(Debug)]
pub enum KeeperError {
    /// Input rejected; carries the message to show the user.
    Invalid(&'static str),
    Store(StoreError),
}

impl Display for KeeperError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(message) => f.write_str(message),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for KeeperError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for KeeperError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(NoteValidationError::EmptyContent) => {
                Self::Invalid(EMPTY_CONTENT_MESSAGE)
            }
            other => Self::Store(other),
        }
    }
}

/// What a save did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(Note),
    Updated(Note),
    /// The note being edited no longer exists; nothing was written.
    EditTargetMissing(NoteId),
}

/// What a destructive action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(usize),
    Declined,
    /// Nothing to delete; no prompt was shown.
    NothingToDelete,
}

/// Values to prefill the title/content inputs with when editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: NoteId,
    pub title: String,
    pub content: String,
}

/// Owner of the note store and the edit session.
pub struct NoteKeeper<B: KeyValueBackend, C: Clock> {
    store: NoteStore<B, C>,
    editing: Option<NoteId>,
}

impl<B: KeyValueBackend, C: Clock> NoteKeeper<B, C> {
    /// Wraps a store as-is; call [`NoteKeeper::load`] to read persisted notes.
    pub fn new(store: NoteStore<B, C>) -> Self {
        Self {
            store,
            editing: None,
        }
    }

    /// Loads persisted notes and resets the edit session.
    pub fn load(&mut self) -> LoadStatus {
        self.editing = None;
        self.store.load()
    }

    pub fn store(&self) -> &NoteStore<B, C> {
        &self.store
    }

    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Label for the save action in the current mode.
    pub fn save_label(&self) -> &'static str {
        if self.editing.is_some() {
            UPDATE_LABEL
        } else {
            ADD_LABEL
        }
    }

    /// Enters edit mode for `id` and returns the current values.
    ///
    /// Returns `None` and leaves the session untouched when `id` is unknown.
    pub fn start_edit(&mut self, id: &str) -> Option<EditDraft> {
        let note = self.store.get(id)?;
        let draft = EditDraft {
            id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
        };
        self.editing = Some(draft.id.clone());
        Some(draft)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Save action: updates the note being edited, or creates a new one.
    pub fn save(&mut self, title: &str, content: &str) -> Result<SaveOutcome, KeeperError> {
        let Some(id) = self.editing.clone() else {
            let note = self.store.create(title, content)?;
            return Ok(SaveOutcome::Created(note));
        };

        let updated = self.store.update(&id, title, content)?;
        self.editing = None;
        Ok(match updated {
            Some(note) => SaveOutcome::Updated(note),
            None => SaveOutcome::EditTargetMissing(id),
        })
    }

    /// Deletes one note after confirmation.
    pub fn delete(
        &mut self,
        id: &str,
        confirm: &mut impl Confirm,
    ) -> Result<DeleteOutcome, KeeperError> {
        if self.store.get(id).is_none() {
            return Ok(DeleteOutcome::NothingToDelete);
        }
        if !confirm.confirm(CONFIRM_DELETE_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }

        self.store.delete(id)?;
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        Ok(DeleteOutcome::Deleted(1))
    }

    /// Deletes every note after confirmation; silent no-op when empty.
    pub fn clear_all(&mut self, confirm: &mut impl Confirm) -> Result<DeleteOutcome, KeeperError> {
        if self.store.is_empty() {
            return Ok(DeleteOutcome::NothingToDelete);
        }
        if !confirm.confirm(CONFIRM_CLEAR_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }

        let removed = self.store.clear()?;
        self.editing = None;
        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Projected notes for the given search/sort state.
    pub fn project(&self, query: &str, sort: SortMode) -> Vec<&Note> {
        project(self.store.notes(), query, sort)
    }

    /// Projected notes shaped as cards, or the empty state.
    pub fn render(&self, query: &str, sort: SortMode) -> RenderedView {
        render(self.store.notes(), query, sort)
    }
}
