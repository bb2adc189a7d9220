//! Store and logging configuration.
//!
//! # Responsibility
//! - Describe which task store a front end talks to.
//! - Validate configuration before any store is opened.
//! - Build the injected repository for a validated store config.

use crate::db::open_db;
use crate::repo::memory_repo::MemoryTaskRepository;
use crate::repo::remote_repo::{RemoteTaskRepository, DEFAULT_REQUEST_TIMEOUT};
use crate::repo::sqlite_repo::SqliteTaskRepository;
use crate::repo::task_repo::{RepoError, TaskRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

/// Which store backs the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Process-local list, optionally seeded with the demo fixture.
    Memory { seed_sample: bool },
    /// Local SQLite file.
    Sqlite { path: PathBuf },
    /// REST resource collection.
    Remote { base_url: String, timeout: Duration },
}

impl StoreConfig {
    pub fn remote(base_url: impl Into<String>) -> Self {
        Self::Remote {
            base_url: base_url.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory { .. } => "memory",
            Self::Sqlite { .. } => "sqlite",
            Self::Remote { .. } => "remote",
        }
    }

    /// Checks the config without touching the store.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Memory { .. } => Ok(()),
            Self::Sqlite { path } => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::EmptyDbPath);
                }
                Ok(())
            }
            Self::Remote { base_url, timeout } => {
                let trimmed = base_url.trim();
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(ConfigError::UnsupportedUrl(base_url.clone()));
                }
                if timeout.is_zero() {
                    return Err(ConfigError::ZeroTimeout);
                }
                Ok(())
            }
        }
    }
}

/// Logging settings handed to `logging::init_logging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub log_dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyDbPath,
    UnsupportedUrl(String),
    ZeroTimeout,
    /// The store rejected the config when opened.
    Open(RepoError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "task database path cannot be empty"),
            Self::UnsupportedUrl(url) => {
                write!(f, "task API url must start with http:// or https://, got `{url}`")
            }
            Self::ZeroTimeout => write!(f, "request timeout must be greater than zero"),
            Self::Open(err) => write!(f, "failed to open task store: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) => Some(err),
            Self::EmptyDbPath | Self::UnsupportedUrl(_) | Self::ZeroTimeout => None,
        }
    }
}

/// Validates `config` and opens the matching repository.
pub fn open_repository(config: &StoreConfig) -> Result<Box<dyn TaskRepository>, ConfigError> {
    config.validate()?;

    let repo: Box<dyn TaskRepository> = match config {
        StoreConfig::Memory { seed_sample } => {
            if *seed_sample {
                Box::new(MemoryTaskRepository::sample())
            } else {
                Box::new(MemoryTaskRepository::new())
            }
        }
        StoreConfig::Sqlite { path } => {
            let conn = open_db(path).map_err(|err| ConfigError::Open(err.into()))?;
            Box::new(SqliteTaskRepository::try_new(conn).map_err(ConfigError::Open)?)
        }
        StoreConfig::Remote { base_url, timeout } => Box::new(
            RemoteTaskRepository::new(base_url, *timeout).map_err(ConfigError::Open)?,
        ),
    };

    info!(
        "event=store_open module=config status=ok store={}",
        config.kind()
    );
    Ok(repo)
}
