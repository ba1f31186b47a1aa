use notekeeper_core::{
    Clock, FileBackend, KeyValueBackend, LoadStatus, MemoryBackend, NoteStore, NoteValidationError,
    StorageError, StorageResult, StoreError, DEFAULT_STORAGE_KEY,
};
use std::cell::Cell;
use std::collections::HashSet;

struct StepClock(Cell<i64>);

impl StepClock {
    fn starting_at(ms: i64) -> Self {
        Self(Cell::new(ms))
    }
}

impl Clock for StepClock {
    fn now_ms(&self) -> i64 {
        let now = self.0.get() + 10;
        self.0.set(now);
        now
    }
}

fn memory_store() -> NoteStore<MemoryBackend, StepClock> {
    NoteStore::with_clock(MemoryBackend::new(), StepClock::starting_at(1_000))
}

/// Backend whose writes always fail; reads report nothing stored.
struct ReadOnlyBackend;

impl KeyValueBackend for ReadOnlyBackend {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::InvalidKey(key.to_string()))
    }

    fn kind(&self) -> &'static str {
        "read_only"
    }
}

#[test]
fn create_inserts_newest_first_and_persists_every_time() {
    let mut store = memory_store();
    let first = store.create("", "Buy milk").unwrap();
    let second = store.create("Reminder", "Call mom").unwrap();

    let ids: Vec<&str> = store.notes().iter().map(|note| note.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    assert_eq!(first.created, first.updated);
    assert!(second.created > first.created);

    let blob = store.backend().raw(DEFAULT_STORAGE_KEY).expect("blob persisted");
    let persisted: Vec<serde_json::Value> = serde_json::from_str(blob).unwrap();
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0]["title"], "Reminder");
    assert_eq!(persisted[1]["content"], "Buy milk");
}

#[test]
fn blank_content_is_rejected_without_state_change() {
    let mut store = memory_store();
    for content in ["", "   ", "\n\t"] {
        let err = store.create("title", content).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(NoteValidationError::EmptyContent)
        ));
    }
    assert!(store.is_empty());
    assert!(store.backend().raw(DEFAULT_STORAGE_KEY).is_none());
}

#[test]
fn update_replaces_fields_in_place_and_keeps_created() {
    let mut store = memory_store();
    let older = store.create("", "older").unwrap();
    let newer = store.create("", "newer").unwrap();

    let updated = store
        .update(&older.id, "Edited", "older, edited")
        .unwrap()
        .expect("note exists");
    assert_eq!(updated.created, older.created);
    assert!(updated.updated > older.updated);
    assert_eq!(store.notes()[0].id, newer.id);
    assert_eq!(store.notes()[1].title, "Edited");
    assert_eq!(store.notes()[1].content, "older, edited");
}

#[test]
fn update_of_absent_id_leaves_collection_and_blob_unchanged() {
    let mut store = memory_store();
    store.create("t", "c").unwrap();
    let notes_before = store.notes().to_vec();
    let blob_before = store.backend().raw(DEFAULT_STORAGE_KEY).unwrap().to_string();

    assert_eq!(store.update("n_missing", "x", "y").unwrap(), None);

    assert_eq!(store.notes(), notes_before.as_slice());
    assert_eq!(store.backend().raw(DEFAULT_STORAGE_KEY).unwrap(), blob_before);
}

#[test]
fn update_rejects_blank_content() {
    let mut store = memory_store();
    let note = store.create("t", "c").unwrap();
    let err = store.update(&note.id, "t", "  ").unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.get(&note.id).unwrap().content, "c");
}

#[test]
fn update_validates_content_before_looking_up_id() {
    let mut store = memory_store();
    store.create("t", "c").unwrap();
    let notes_before = store.notes().to_vec();

    let err = store.update("n_missing", "t", "   ").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(NoteValidationError::EmptyContent)
    ));
    assert_eq!(store.notes(), notes_before.as_slice());
}

#[test]
fn delete_and_clear_remove_notes() {
    let mut store = memory_store();
    let a = store.create("", "a").unwrap();
    store.create("", "b").unwrap();
    store.create("", "c").unwrap();

    assert!(store.delete(&a.id).unwrap());
    assert!(!store.delete(&a.id).unwrap());
    assert_eq!(store.len(), 2);

    assert_eq!(store.clear().unwrap(), 2);
    assert!(store.is_empty());
    assert_eq!(store.backend().raw(DEFAULT_STORAGE_KEY), Some("[]"));
}

#[test]
fn ids_stay_unique_across_mixed_operations() {
    let mut store = memory_store();
    let mut seed: u64 = 0x5eed;
    for step in 0..300 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let pick = (seed >> 33) as usize;
        match pick % 4 {
            0 | 1 => {
                store.create("", &format!("note {step}")).unwrap();
            }
            2 if !store.is_empty() => {
                let id = store.notes()[pick % store.len()].id.clone();
                store.update(&id, "edited", &format!("edit {step}")).unwrap();
            }
            3 if !store.is_empty() => {
                let id = store.notes()[pick % store.len()].id.clone();
                store.delete(&id).unwrap();
            }
            _ => {}
        }

        let unique: HashSet<&str> = store.notes().iter().map(|note| note.id.as_str()).collect();
        assert_eq!(unique.len(), store.len());
        assert!(store
            .notes()
            .iter()
            .all(|note| note.created <= note.updated && !note.content.trim().is_empty()));
    }
}

#[test]
fn persist_then_load_round_trips_through_file_backend() {
    let dir = tempfile::tempdir().unwrap();
    let expected = {
        let mut store = NoteStore::with_clock(
            FileBackend::open(dir.path()).unwrap(),
            StepClock::starting_at(5_000),
        );
        store.create("", "Buy milk").unwrap();
        let b = store.create("Reminder", "Call mom").unwrap();
        store.update(&b.id, "Reminder", "Call mom tonight").unwrap();
        store.notes().to_vec()
    };

    let mut reloaded = NoteStore::new(FileBackend::open(dir.path()).unwrap());
    let status = reloaded.load();
    assert_eq!(
        status,
        LoadStatus::Loaded {
            count: 2,
            dropped: 0
        }
    );
    assert_eq!(reloaded.notes(), expected.as_slice());
}

#[test]
fn load_fails_soft_on_missing_or_corrupt_data() {
    let mut missing = NoteStore::new(MemoryBackend::new());
    assert_eq!(missing.load(), LoadStatus::Missing);
    assert!(missing.is_empty());

    let mut corrupt = NoteStore::new(MemoryBackend::with_entry(DEFAULT_STORAGE_KEY, "{oops"));
    assert_eq!(corrupt.load(), LoadStatus::Corrupt);
    assert!(corrupt.is_empty());

    corrupt.create("", "recovered").unwrap();
    assert_eq!(corrupt.len(), 1);
}

#[test]
fn load_reads_legacy_rows_without_updated() {
    let blob = r#"[{"id":"n_1700000000000_42","title":"","content":"legacy","created":1700000000000}]"#;
    let mut store = NoteStore::new(MemoryBackend::with_entry(DEFAULT_STORAGE_KEY, blob));
    store.load();
    let note = store.get("n_1700000000000_42").expect("legacy row loads");
    assert_eq!(note.updated, note.created);
}

#[test]
fn custom_key_isolates_collections() {
    let mut store = NoteStore::new(MemoryBackend::new()).with_key("notes_work");
    store.create("", "work item").unwrap();
    assert_eq!(store.key(), "notes_work");
    assert!(store.backend().raw("notes_work").is_some());
    assert!(store.backend().raw(DEFAULT_STORAGE_KEY).is_none());
}

#[test]
fn failed_persist_rolls_back_every_mutation() {
    let mut store = NoteStore::new(ReadOnlyBackend);
    let err = store.create("", "never stored").unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    assert!(store.is_empty());
    assert!(matches!(store.clear(), Err(StoreError::Storage(_))));
}
