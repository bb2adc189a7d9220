//! Task repository contract.
//!
//! # Responsibility
//! - Define the four data-access operations every task store provides.
//! - Give callers one error type regardless of the backing store.
//!
//! # Invariants
//! - `create_task` assigns a fresh id and appends in store order.
//! - `update_task` replaces the full record; a missing id is `NotFound`.
//! - `delete_task` on a missing id leaves the store unchanged.

use crate::db::DbError;
use crate::model::task::{NewTask, Task, TaskId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-agnostic repository error.
#[derive(Debug)]
pub enum RepoError {
    /// No stored task matches the id.
    NotFound(TaskId),
    /// Local SQLite failure.
    Db(DbError),
    /// Request never produced a response (connect, timeout, TLS).
    Transport(String),
    /// Remote store answered with a non-success status.
    Http { status: u16, message: String },
    /// Stored or received data does not decode into a task.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Transport(message) => write!(f, "task store unreachable: {message}"),
            Self::Http { status, message } => {
                write!(f, "task store returned HTTP {status}: {message}")
            }
            Self::InvalidData(message) => write!(f, "invalid task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Transport(_) | Self::Http { .. } | Self::InvalidData(_) => {
                None
            }
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access interface over a task store.
///
/// Views depend on this trait only, so remote, in-memory and SQLite stores
/// are interchangeable.
pub trait TaskRepository {
    /// Returns the current contents of the store in store order.
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;

    /// Appends a task under a fresh id and returns the stored record.
    fn create_task(&self, task: &NewTask) -> RepoResult<Task>;

    /// Replaces the record whose id matches `task.id`.
    fn update_task(&self, task: &Task) -> RepoResult<Task>;

    /// Removes the record with `id`; returns whether anything was removed.
    fn delete_task(&self, id: &TaskId) -> RepoResult<bool>;
}

impl<R: TaskRepository + ?Sized> TaskRepository for Box<R> {
    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        (**self).list_tasks()
    }

    fn create_task(&self, task: &NewTask) -> RepoResult<Task> {
        (**self).create_task(task)
    }

    fn update_task(&self, task: &Task) -> RepoResult<Task> {
        (**self).update_task(task)
    }

    fn delete_task(&self, id: &TaskId) -> RepoResult<bool> {
        (**self).delete_task(id)
    }
}

impl<R: TaskRepository + ?Sized> TaskRepository for &R {
    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        (**self).list_tasks()
    }

    fn create_task(&self, task: &NewTask) -> RepoResult<Task> {
        (**self).create_task(task)
    }

    fn update_task(&self, task: &Task) -> RepoResult<Task> {
        (**self).update_task(task)
    }

    fn delete_task(&self, id: &TaskId) -> RepoResult<bool> {
        (**self).delete_task(id)
    }
}
