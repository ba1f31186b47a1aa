//! Note store over a key-value backend.
//!
//! # Responsibility
//! - Hold the ordered note collection (most recently created first).
//! - Implement create/update/delete/clear with persist-on-every-mutation.
//! - Load the collection from one JSON blob, failing soft.
//!
//! # Invariants
//! - Ids are unique within the loaded collection; duplicates in stored
//!   data are dropped on load (first occurrence wins).
//! - A failed persist rolls the in-memory mutation back, so memory and
//!   storage never diverge.
//! - Not-found on update/delete is a no-op and does not persist.
//! - Log events carry ids and counts only, never note text.

use crate::clock::{Clock, SystemClock};
use crate::model::note::{validate_content, Note, NoteValidationError};
use crate::storage::{KeyValueBackend, StorageError};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "notes_v1";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for mutating operations.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected before any state change.
    Validation(NoteValidationError),
    /// Backend write failed; the mutation was rolled back.
    Storage(StorageError),
    /// Collection could not be serialized.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode notes: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Outcome of [`NoteStore::load`]. Informational only; load never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Blob decoded; `dropped` entries violated note invariants.
    Loaded { count: usize, dropped: usize },
    /// Nothing stored under the key yet.
    Missing,
    /// Backend unreadable or blob not a JSON array; collection reset.
    Corrupt,
}

/// Authoritative note collection bound to one backend key.
pub struct NoteStore<B: KeyValueBackend, C: Clock = SystemClock> {
    backend: B,
    clock: C,
    key: String,
    notes: Vec<Note>,
}

impl<B: KeyValueBackend> NoteStore<B> {
    /// Creates an empty store using wall-clock time and the default key.
    ///
    /// Call [`NoteStore::load`] to pick up previously persisted notes.
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<B: KeyValueBackend, C: Clock> NoteStore<B, C> {
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self {
            backend,
            clock,
            key: DEFAULT_STORAGE_KEY.to_string(),
            notes: Vec::new(),
        }
    }

    /// Rebinds the store to another backend key. Does not reload.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Notes in insertion order (most recently created first).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Replaces the in-memory collection with the persisted one.
    ///
    /// Missing, unreadable or malformed data yields an empty collection.
    pub fn load(&mut self) -> LoadStatus {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.notes.clear();
                info!(
                    "event=notes_load module=store status=ok backend={} key={} result=missing",
                    self.backend.kind(),
                    self.key
                );
                return LoadStatus::Missing;
            }
            Err(err) => {
                self.notes.clear();
                warn!(
                    "event=notes_load module=store status=error backend={} key={} error_code=backend_read_failed error={}",
                    self.backend.kind(),
                    self.key,
                    err
                );
                return LoadStatus::Corrupt;
            }
        };

        match decode_notes(&raw) {
            Some((notes, dropped)) => {
                let count = notes.len();
                self.notes = notes;
                if dropped > 0 {
                    warn!(
                        "event=notes_load module=store status=partial key={} count={count} dropped={dropped}",
                        self.key
                    );
                } else {
                    info!(
                        "event=notes_load module=store status=ok backend={} key={} count={count}",
                        self.backend.kind(),
                        self.key
                    );
                }
                LoadStatus::Loaded { count, dropped }
            }
            None => {
                self.notes.clear();
                warn!(
                    "event=notes_load module=store status=error key={} error_code=corrupt_blob bytes={}",
                    self.key,
                    raw.len()
                );
                LoadStatus::Corrupt
            }
        }
    }

    /// Creates a note at the front of the collection and persists.
    ///
    /// # Errors
    /// - `Validation(EmptyContent)` when `content` is blank; nothing changes.
    /// - `Storage`/`Encode` when persisting fails; the insert is undone.
    pub fn create(&mut self, title: &str, content: &str) -> StoreResult<Note> {
        validate_content(content)?;
        let note = Note::new(title, content, self.clock.now_ms());
        note.validate()?;

        self.notes.insert(0, note.clone());
        if let Err(err) = self.persist() {
            self.notes.remove(0);
            return Err(err);
        }

        info!(
            "event=note_create module=store status=ok id={} count={}",
            note.id,
            self.notes.len()
        );
        Ok(note)
    }

    /// Replaces title/content of an existing note in place and persists.
    ///
    /// Returns `Ok(None)` without touching storage when `id` is unknown.
    /// `created` and the note's position are preserved.
    ///
    /// Content is validated before the id lookup, so blank content yields
    /// `Validation` even for an unknown id. The collection is unchanged
    /// either way.
    pub fn update(&mut self, id: &str, title: &str, content: &str) -> StoreResult<Option<Note>> {
        validate_content(content)?;
        let Some(index) = self.position(id) else {
            debug!("event=note_update module=store status=skipped reason=not_found id={id}");
            return Ok(None);
        };

        let now_ms = self.clock.now_ms();
        let previous = self.notes[index].clone();
        self.notes[index].apply_edit(title, content, now_ms);
        if let Err(err) = self.notes[index].validate() {
            self.notes[index] = previous;
            return Err(err.into());
        }
        if let Err(err) = self.persist() {
            self.notes[index] = previous;
            return Err(err);
        }

        info!("event=note_update module=store status=ok id={id}");
        Ok(Some(self.notes[index].clone()))
    }

    /// Removes one note and persists. Returns `false` when `id` is unknown.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("event=note_delete module=store status=skipped reason=not_found id={id}");
            return Ok(false);
        };

        let removed = self.notes.remove(index);
        if let Err(err) = self.persist() {
            self.notes.insert(index, removed);
            return Err(err);
        }

        info!(
            "event=note_delete module=store status=ok id={id} count={}",
            self.notes.len()
        );
        Ok(true)
    }

    /// Empties the collection in one step and persists.
    ///
    /// Returns how many notes were removed.
    pub fn clear(&mut self) -> StoreResult<usize> {
        let previous = std::mem::take(&mut self.notes);
        if let Err(err) = self.persist() {
            self.notes = previous;
            return Err(err);
        }

        info!(
            "event=notes_clear module=store status=ok removed={}",
            previous.len()
        );
        Ok(previous.len())
    }

    /// Writes the full collection as one JSON array, overwriting the key.
    pub fn persist(&mut self) -> StoreResult<()> {
        let blob = serde_json::to_string(&self.notes)?;
        if let Err(err) = self.backend.set(&self.key, &blob) {
            warn!(
                "event=notes_persist module=store status=error backend={} key={} error={}",
                self.backend.kind(),
                self.key,
                err
            );
            return Err(err.into());
        }
        debug!(
            "event=notes_persist module=store status=ok backend={} key={} count={} bytes={}",
            self.backend.kind(),
            self.key,
            self.notes.len(),
            blob.len()
        );
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }
}

/// Decodes a stored blob.
///
/// Returns `None` when the blob is not a JSON array. Entries that fail to
/// decode or validate, and repeated ids, are dropped and counted. Legacy
/// entries without `updated` (or with `updated < created`) are repaired to
/// `updated = created`.
fn decode_notes(raw: &str) -> Option<(Vec<Note>, usize)> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
    let total = entries.len();
    let mut seen = HashSet::new();
    let mut notes = Vec::with_capacity(total);

    for entry in entries {
        let Ok(mut note) = serde_json::from_value::<Note>(entry) else {
            continue;
        };
        if note.updated < note.created {
            note.updated = note.created;
        }
        if note.validate().is_err() || !seen.insert(note.id.clone()) {
            continue;
        }
        notes.push(note);
    }

    let dropped = total - notes.len();
    Some((notes, dropped))
}
