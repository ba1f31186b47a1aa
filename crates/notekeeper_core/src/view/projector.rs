//! Sort/filter projection over a note slice.
//!
//! # Invariants
//! - Sorting is stable on `created`; equal timestamps keep store order.
//! - Search is a case-insensitive substring match on `title + " " + content`.
//! - A blank query matches everything.

use crate::model::note::Note;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Display order for projected notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Newest `created` first.
    #[default]
    Newest,
    /// Oldest `created` first.
    Oldest,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "new",
            Self::Oldest => "old",
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" | "newest" => Ok(Self::Newest),
            "old" | "oldest" => Ok(Self::Oldest),
            other => Err(format!("unsupported sort mode `{other}`; expected new|old")),
        }
    }
}

/// Normalizes a raw search input: trimmed and lowercased.
///
/// Returns `None` for blank input, which means "no filter".
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Projects `notes` into display order.
///
/// Works on a copy of the references; the input slice is left untouched.
/// An empty result is a valid "nothing to show" outcome.
pub fn project<'a>(notes: &'a [Note], query: &str, sort: SortMode) -> Vec<&'a Note> {
    let mut list: Vec<&Note> = notes.iter().collect();

    match sort {
        SortMode::Newest => list.sort_by(|a, b| b.created.cmp(&a.created)),
        SortMode::Oldest => list.sort_by(|a, b| a.created.cmp(&b.created)),
    }

    if let Some(needle) = normalize_query(query) {
        list.retain(|note| note.search_text().contains(&needle));
    }

    list
}

#[cfg(test)]
mod tests {
    use super::{normalize_query, project, SortMode};
    use crate::model::note::Note;

    fn note(id: &str, title: &str, content: &str, created: i64) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created,
            updated: created,
        }
    }

    fn ids(list: &[&Note]) -> Vec<String> {
        list.iter().map(|note| note.id.clone()).collect()
    }

    #[test]
    fn sort_mode_parses_selector_values() {
        assert_eq!("new".parse::<SortMode>().unwrap(), SortMode::Newest);
        assert_eq!(" OLD ".parse::<SortMode>().unwrap(), SortMode::Oldest);
        assert_eq!("oldest".parse::<SortMode>().unwrap(), SortMode::Oldest);
        assert!("sideways".parse::<SortMode>().is_err());
        assert_eq!(SortMode::default(), SortMode::Newest);
    }

    #[test]
    fn sorts_by_created_in_both_directions() {
        let notes = vec![note("b", "", "x", 2), note("a", "", "x", 1), note("c", "", "x", 3)];
        assert_eq!(ids(&project(&notes, "", SortMode::Newest)), ["c", "b", "a"]);
        assert_eq!(ids(&project(&notes, "", SortMode::Oldest)), ["a", "b", "c"]);
    }

    #[test]
    fn equal_timestamps_keep_store_order() {
        let notes = vec![note("first", "", "x", 7), note("second", "", "x", 7)];
        assert_eq!(ids(&project(&notes, "", SortMode::Newest)), ["first", "second"]);
        assert_eq!(ids(&project(&notes, "", SortMode::Oldest)), ["first", "second"]);
    }

    #[test]
    fn query_is_trimmed_case_insensitive_and_spans_title_and_content() {
        let notes = vec![
            note("a", "", "Buy milk", 1),
            note("b", "Reminder", "Call mom", 2),
        ];
        assert_eq!(ids(&project(&notes, "  MOM ", SortMode::Newest)), ["b"]);
        assert_eq!(ids(&project(&notes, "reminder", SortMode::Newest)), ["b"]);
        assert_eq!(ids(&project(&notes, "reminder call", SortMode::Newest)), ["b"]);
        assert!(project(&notes, "bread", SortMode::Newest).is_empty());
    }

    #[test]
    fn projection_leaves_input_untouched_and_is_repeatable() {
        let notes = vec![note("a", "", "x", 1), note("b", "", "x", 2)];
        let before = notes.clone();
        let first = ids(&project(&notes, "x", SortMode::Newest));
        let second = ids(&project(&notes, "x", SortMode::Newest));
        assert_eq!(first, second);
        assert_eq!(notes, before);
    }

    #[test]
    fn blank_query_normalizes_to_none() {
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(" Mom "), Some("mom".to_string()));
    }
}
