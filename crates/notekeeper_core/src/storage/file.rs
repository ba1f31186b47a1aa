//! Directory-backed storage: one `<key>.json` file per key.
//!
//! # Invariants
//! - Writes go through a `.tmp` sibling and `rename`, so readers never see
//!   a half-written blob.
//! - A failed rename removes the `.tmp` sibling again.
//! - Keys are restricted to `[A-Za-z0-9_.-]` and may not start with `.`.

use super::{KeyValueBackend, StorageError, StorageResult};
use std::fs;
use std::io;
use std::path::PathBuf;

const FILE_EXTENSION: &str = "json";

/// Stores each key as a JSON file inside `root`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates the backend, creating `root` if it does not exist yet.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Resolves the file path that holds `key`.
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{FILE_EXTENSION}")))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("tmp");
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp_path, value).map_err(io_err)?;
        if let Err(source) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_err(source));
        }
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}

fn validate_key(key: &str) -> StorageResult<()> {
    let well_formed = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'));
    if well_formed {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
