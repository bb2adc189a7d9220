//! Task use-case service.
//!
//! # Responsibility
//! - Provide stable task entry points for controllers, CLI and FFI.
//! - Delegate persistence to an injected repository.
//! - Emit metadata-only log events for every store call.
//!
//! # Invariants
//! - Service APIs never bypass repository contracts.
//! - Titles are never logged.

use crate::model::task::{NewTask, Task, TaskId};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use log::{error, info};
use std::time::Instant;

/// Use-case wrapper around a task repository.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists every task in store order.
    pub fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let started_at = Instant::now();
        let result = self.repo.list_tasks();
        match &result {
            Ok(tasks) => info!(
                "event=task_list module=service status=ok count={} duration_ms={}",
                tasks.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("task_list", None, started_at, err),
        }
        result
    }

    /// Creates a not-yet-completed task with `title`.
    ///
    /// # Contract
    /// - Does not reject blank titles; that check belongs to the caller's
    ///   input boundary.
    pub fn create_task(&self, title: impl Into<String>) -> RepoResult<Task> {
        let started_at = Instant::now();
        let result = self.repo.create_task(&NewTask::new(title));
        match &result {
            Ok(task) => info!(
                "event=task_create module=service status=ok task_id={} duration_ms={}",
                task.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("task_create", None, started_at, err),
        }
        result
    }

    /// Replaces a stored task with the full record `task`.
    pub fn update_task(&self, task: &Task) -> RepoResult<Task> {
        let started_at = Instant::now();
        let result = self.repo.update_task(task);
        match &result {
            Ok(updated) => info!(
                "event=task_update module=service status=ok task_id={} completed={} duration_ms={}",
                updated.id,
                updated.completed,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("task_update", Some(&task.id), started_at, err),
        }
        result
    }

    /// Flips `completed` on `task` and stores the result.
    pub fn toggle_task(&self, task: &Task) -> RepoResult<Task> {
        self.update_task(&task.toggled())
    }

    /// Stores `task` under a new title.
    pub fn rename_task(&self, task: &Task, title: impl Into<String>) -> RepoResult<Task> {
        self.update_task(&task.renamed(title))
    }

    /// Deletes by id. Returns whether a task was removed.
    pub fn delete_task(&self, id: &TaskId) -> RepoResult<bool> {
        let started_at = Instant::now();
        let result = self.repo.delete_task(id);
        match &result {
            Ok(removed) => info!(
                "event=task_delete module=service status=ok task_id={} removed={} duration_ms={}",
                id,
                removed,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("task_delete", Some(id), started_at, err),
        }
        result
    }

    /// Looks a task up by id through a full list read.
    ///
    /// Stores expose no single-record read, so this is only meant for front
    /// ends that receive bare ids (CLI arguments, FFI calls).
    pub fn find_task(&self, id: &TaskId) -> RepoResult<Option<Task>> {
        Ok(self
            .list_tasks()?
            .into_iter()
            .find(|task| &task.id == id))
    }
}

fn log_failure(
    event: &str,
    task_id: Option<&TaskId>,
    started_at: Instant,
    err: &RepoError,
) {
    match task_id {
        Some(id) => error!(
            "event={} module=service status=error task_id={} duration_ms={} error={}",
            event,
            id,
            started_at.elapsed().as_millis(),
            err
        ),
        None => error!(
            "event={} module=service status=error duration_ms={} error={}",
            event,
            started_at.elapsed().as_millis(),
            err
        ),
    }
}
