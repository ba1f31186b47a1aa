//! Display cards for projected notes.

use crate::model::note::{Note, NoteId};
use crate::view::projector::{project, SortMode};
use chrono::{Local, TimeZone};

/// Message shown when a projection is empty.
pub const EMPTY_STATE_MESSAGE: &str = "No notes found. Add one above ✍️";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One rendered note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: NoteId,
    /// Stored title, or "Untitled".
    pub title: String,
    pub content: String,
    /// `updated`, or `created` for rows that never recorded an update.
    pub timestamp_ms: i64,
    /// `timestamp_ms` in local time.
    pub timestamp_label: String,
}

impl NoteCard {
    pub fn from_note(note: &Note) -> Self {
        let timestamp_ms = note.display_timestamp();
        Self {
            id: note.id.clone(),
            title: note.display_title().to_string(),
            content: note.content.clone(),
            timestamp_ms,
            timestamp_label: format_timestamp(timestamp_ms),
        }
    }
}

/// Result of rendering a projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedView {
    Cards(Vec<NoteCard>),
    /// Nothing matched; not an error.
    Empty { message: &'static str },
}

impl RenderedView {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    pub fn cards(&self) -> &[NoteCard] {
        match self {
            Self::Cards(cards) => cards,
            Self::Empty { .. } => &[],
        }
    }
}

/// Projects `notes` and shapes the result into cards or the empty state.
pub fn render(notes: &[Note], query: &str, sort: SortMode) -> RenderedView {
    let projected = project(notes, query, sort);
    if projected.is_empty() {
        return RenderedView::Empty {
            message: EMPTY_STATE_MESSAGE,
        };
    }
    RenderedView::Cards(projected.into_iter().map(NoteCard::from_note).collect())
}

/// Formats epoch milliseconds as local date-time; raw millis if out of range.
pub fn format_timestamp(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(datetime) => datetime.format(TIMESTAMP_FORMAT).to_string(),
        None => epoch_ms.to_string(),
    }
}
