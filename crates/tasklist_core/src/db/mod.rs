//! Local task database.
//!
//! `open_db` / `open_db_in_memory` hand out connections whose schema is at
//! `migrations::latest_version()`. Stores built on a connection from
//! elsewhere call `migrations::ensure_current` first.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or checking the task database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a build with more migrations than this one.
    SchemaTooNew { found: u32, supported: u32 },
    /// The connection never went through the migration runner.
    SchemaNotMigrated { found: u32, expected: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "task database is at schema version {found}, this build only knows up to {supported}"
            ),
            Self::SchemaNotMigrated { found, expected } => write!(
                f,
                "task database is at schema version {found}, expected {expected}; open it with db::open_db to migrate"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::SchemaNotMigrated { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
