//! Core domain logic for Notekeeper.
//! This crate is the single source of truth for note invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use clock::{Clock, SystemClock};
pub use config::{
    load_config, open_backend, resolve, BackendKind, ConfigError, ConfigOverrides,
    NotekeeperConfig, ResolvedConfig,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{generate_note_id, Note, NoteId, NoteValidationError, UNTITLED};
pub use repo::note_store::{LoadStatus, NoteStore, StoreError, StoreResult, DEFAULT_STORAGE_KEY};
pub use service::note_keeper::{
    AlwaysConfirm, Confirm, DeleteOutcome, EditDraft, KeeperError, NoteKeeper, SaveOutcome,
};
pub use storage::{
    FileBackend, KeyValueBackend, MemoryBackend, SqliteBackend, StorageError, StorageResult,
};
pub use view::card::{render, NoteCard, RenderedView, EMPTY_STATE_MESSAGE};
pub use view::projector::{project, SortMode};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
