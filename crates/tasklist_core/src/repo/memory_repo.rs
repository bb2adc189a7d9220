//! Process-local task store.
//!
//! # Invariants
//! - Tasks are kept in insertion order.
//! - Ids are timestamp-derived and unique within one repository, even when
//!   several tasks are created within the same millisecond.
//! - Contents do not survive the process.

use crate::model::task::{NewTask, Task, TaskId};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use std::cell::{Cell, RefCell};
use std::time::{SystemTime, UNIX_EPOCH};

/// In-memory task repository.
///
/// Single-threaded by construction (`RefCell`), matching the cooperative
/// view loop that drives it.
#[derive(Debug, Default)]
pub struct MemoryTaskRepository {
    tasks: RefCell<Vec<Task>>,
    last_id: Cell<u128>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `tasks`.
    ///
    /// Seed ids are taken as-is; callers must keep them unique.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            tasks: RefCell::new(tasks.into_iter().collect()),
            last_id: Cell::new(0),
        }
    }

    /// Creates a repository holding the demo fixture.
    pub fn sample() -> Self {
        Self::with_tasks([
            Task::new("1", "Learn React"),
            Task::new("2", "Build a todo app").toggled(),
            Task::new("3", "Write tests"),
        ])
    }

    fn next_id(&self) -> TaskId {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis());
        let mut bump = now_ms.max(self.last_id.get() + 1);
        let mut id = TaskId::new(bump.to_string());
        let tasks = self.tasks.borrow();
        while tasks.iter().any(|task| task.id == id) {
            bump += 1;
            id = TaskId::new(bump.to_string());
        }
        self.last_id.set(bump);
        id
    }
}

impl TaskRepository for MemoryTaskRepository {
    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        Ok(self.tasks.borrow().clone())
    }

    fn create_task(&self, task: &NewTask) -> RepoResult<Task> {
        let created = task.clone().into_task(self.next_id());
        self.tasks.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_task(&self, task: &Task) -> RepoResult<Task> {
        let mut tasks = self.tasks.borrow_mut();
        let slot = tasks
            .iter_mut()
            .find(|stored| stored.id == task.id)
            .ok_or_else(|| RepoError::NotFound(task.id.clone()))?;
        *slot = task.clone();
        Ok(task.clone())
    }

    fn delete_task(&self, id: &TaskId) -> RepoResult<bool> {
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|task| &task.id != id);
        Ok(tasks.len() != before)
    }
}
