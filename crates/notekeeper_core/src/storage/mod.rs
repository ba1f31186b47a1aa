//! Key-value persistence contracts and backends.
//!
//! # Responsibility
//! - Define the small `load/save blob by key` interface the store writes
//!   through.
//! - Keep backend details (files, SQLite, memory) out of store logic.
//!
//! # Invariants
//! - `set` overwrites any prior value for the key.
//! - `get` on a key never written returns `Ok(None)`, not an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend transport error.
#[derive(Debug)]
pub enum StorageError {
    /// Key cannot be mapped onto the backend (e.g. unsafe file name).
    InvalidKey(String),
    Io { key: String, source: io::Error },
    Db(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
            Self::Io { key, source } => write!(f, "storage io failure for `{key}`: {source}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Blob storage addressed by string keys.
pub trait KeyValueBackend {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Writes `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Short backend label used in diagnostics.
    fn kind(&self) -> &'static str;
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for Box<B> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}
