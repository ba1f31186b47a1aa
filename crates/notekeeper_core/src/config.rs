//! Configuration loading and resolution.
//!
//! # Responsibility
//! - Read a sparse TOML file into `NotekeeperConfig`.
//! - Collapse defaults → config file → caller overrides into
//!   `ResolvedConfig`.
//! - Open the configured storage backend.
//!
//! # Invariants
//! - A missing config file is not an error; defaults apply.
//! - A malformed config file is an error, never silently ignored.
//!
//! The file lives at `<config_dir>/notekeeper/config.toml` unless the caller
//! passes an explicit path.

use crate::repo::note_store::DEFAULT_STORAGE_KEY;
use crate::storage::{FileBackend, KeyValueBackend, MemoryBackend, SqliteBackend, StorageError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const APP_DIR_NAME: &str = "notekeeper";
const CONFIG_FILE_NAME: &str = "config.toml";
const SQLITE_FILE_NAME: &str = "notekeeper.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Which `KeyValueBackend` to persist through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    File,
    Sqlite,
    Memory,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "unsupported backend `{other}`; expected file|sqlite|memory"
            )),
        }
    }
}

/// Sparse on-disk configuration; every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotekeeperConfig {
    pub data_dir: Option<PathBuf>,
    pub backend: Option<BackendKind>,
    pub storage_key: Option<String>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Caller-supplied overrides (typically CLI flags). `None` = not given.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub backend: Option<BackendKind>,
    pub log_level: Option<String>,
}

/// Fully resolved settings with concrete values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    pub storage_key: String,
    pub log_level: String,
    pub log_dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Storage(StorageError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config I/O error: {err}"),
            Self::Parse(err) => write!(f, "config parse error: {err}"),
            Self::Storage(err) => write!(f, "failed to open storage: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for ConfigError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Default config path: `<config_dir>/notekeeper/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Default data directory: `<data_dir>/notekeeper`, or `./.notekeeper`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".notekeeper"))
}

/// Loads configuration from `path`, or from the default location.
///
/// Returns defaults when the file does not exist.
pub fn load_config(path: Option<&Path>) -> Result<NotekeeperConfig, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => {
                debug!("event=config_load module=config status=skipped reason=no_config_dir");
                return Ok(NotekeeperConfig::default());
            }
        },
    };

    if !path.exists() {
        debug!(
            "event=config_load module=config status=skipped reason=missing path={}",
            path.display()
        );
        return Ok(NotekeeperConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!(
        "event=config_load module=config status=ok path={}",
        path.display()
    );
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<NotekeeperConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Resolves defaults → file → overrides.
pub fn resolve(config: &NotekeeperConfig, overrides: &ConfigOverrides) -> ResolvedConfig {
    let data_dir = overrides
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(default_data_dir);

    let backend = overrides
        .backend
        .or(config.backend)
        .unwrap_or_default();

    let storage_key = config
        .storage_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

    let log_level = overrides
        .log_level
        .clone()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| crate::logging::default_log_level().to_string());

    // Log dir defaults under the data dir so one flag relocates everything.
    let log_dir = config
        .log_dir
        .clone()
        .unwrap_or_else(|| data_dir.join(LOG_DIR_NAME));

    ResolvedConfig {
        data_dir,
        backend,
        storage_key,
        log_level,
        log_dir,
    }
}

/// Opens the backend selected by `config`.
pub fn open_backend(config: &ResolvedConfig) -> Result<Box<dyn KeyValueBackend>, ConfigError> {
    let backend: Box<dyn KeyValueBackend> = match config.backend {
        BackendKind::File => Box::new(FileBackend::open(&config.data_dir)?),
        BackendKind::Sqlite => {
            fs::create_dir_all(&config.data_dir).map_err(ConfigError::Io)?;
            Box::new(SqliteBackend::open(config.data_dir.join(SQLITE_FILE_NAME))?)
        }
        BackendKind::Memory => Box::new(MemoryBackend::new()),
    };
    info!(
        "event=backend_open module=config status=ok backend={} data_dir={}",
        backend.kind(),
        config.data_dir.display()
    );
    Ok(backend)
}
