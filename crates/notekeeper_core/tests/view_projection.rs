use notekeeper_core::{
    project, AlwaysConfirm, Clock, MemoryBackend, NoteKeeper, NoteStore, RenderedView,
    SaveOutcome, SortMode, EMPTY_STATE_MESSAGE,
};
use std::cell::Cell;

struct StepClock(Cell<i64>);

impl Clock for StepClock {
    fn now_ms(&self) -> i64 {
        let now = self.0.get() + 1_000;
        self.0.set(now);
        now
    }
}

fn keeper() -> NoteKeeper<MemoryBackend, StepClock> {
    NoteKeeper::new(NoteStore::with_clock(
        MemoryBackend::new(),
        StepClock(Cell::new(1_700_000_000_000)),
    ))
}

fn created(outcome: SaveOutcome) -> String {
    match outcome {
        SaveOutcome::Created(note) => note.id,
        other => panic!("expected created note, got {other:?}"),
    }
}

#[test]
fn newest_first_and_search_scenario() {
    let mut keeper = keeper();
    let a = created(keeper.save("", "Buy milk").unwrap());
    let b = created(keeper.save("Reminder", "Call mom").unwrap());

    let newest: Vec<&str> = keeper
        .project("", SortMode::Newest)
        .iter()
        .map(|note| note.id.as_str())
        .collect();
    assert_eq!(newest, vec![b.as_str(), a.as_str()]);

    let oldest: Vec<&str> = keeper
        .project("", SortMode::Oldest)
        .iter()
        .map(|note| note.id.as_str())
        .collect();
    assert_eq!(oldest, vec![a.as_str(), b.as_str()]);

    let found = keeper.project("mom", SortMode::Newest);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, b);
}

#[test]
fn clear_leaves_nothing_to_project() {
    let mut keeper = keeper();
    keeper.save("", "only note").unwrap();
    keeper.clear_all(&mut AlwaysConfirm).unwrap();

    for sort in [SortMode::Newest, SortMode::Oldest] {
        for query in ["", "only", "zzz"] {
            assert!(keeper.project(query, sort).is_empty());
            assert_eq!(
                keeper.render(query, sort),
                RenderedView::Empty {
                    message: EMPTY_STATE_MESSAGE
                }
            );
        }
    }
}

#[test]
fn untitled_fallback_on_rendered_card() {
    let mut keeper = keeper();
    keeper.save("", "x").unwrap();

    let view = keeper.render("", SortMode::Newest);
    let cards = view.cards();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "Untitled");
    assert_eq!(cards[0].content, "x");
    assert_eq!(keeper.notes()[0].title, "");
}

#[test]
fn edited_note_shows_update_time_but_keeps_created_order() {
    let mut keeper = keeper();
    let first = created(keeper.save("", "first").unwrap());
    let second = created(keeper.save("", "second").unwrap());

    keeper.start_edit(&first).unwrap();
    keeper.save("", "first, edited").unwrap();

    let view = keeper.render("", SortMode::Newest);
    let cards = view.cards();
    assert_eq!(cards[0].id, second);
    assert_eq!(cards[1].id, first);
    assert!(cards[1].timestamp_ms > cards[0].timestamp_ms);
}

#[test]
fn projection_does_not_reorder_store() {
    let mut keeper = keeper();
    for content in ["one", "two", "three"] {
        keeper.save("", content).unwrap();
    }
    let before = keeper.notes().to_vec();

    let first = project(keeper.notes(), "o", SortMode::Oldest);
    let second = project(keeper.notes(), "o", SortMode::Oldest);
    assert_eq!(first, second);
    assert_eq!(keeper.notes(), before.as_slice());
}
