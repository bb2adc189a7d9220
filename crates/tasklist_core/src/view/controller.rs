//! Task list controller.
//!
//! # Responsibility
//! - Own local UI state (input text, edit draft, filter) and the task-list
//!   query cache.
//! - Turn user intents into store calls and invalidate the cached list after
//!   every successful mutation.
//! - Produce a render model from cache state on demand.
//!
//! # Invariants
//! - Blank input never reaches the store.
//! - Failed mutations keep UI state and the cached list untouched.
//! - The rendered list is recomputed from the cached list on every render.

use crate::cache::query_cache::{QueryCache, QueryState, TaskQueryKey};
use crate::model::filter::TaskFilter;
use crate::model::task::{is_submittable_title, Task, TaskId};
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::service::task_service::TaskService;
use crate::view::render::{TaskCounts, TaskListPage, TaskListView};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Error surfaced by controller intents.
#[derive(Debug)]
pub enum ControllerError {
    /// The store rejected or failed the operation.
    Repo(RepoError),
    /// The id does not belong to the currently loaded list.
    UnknownTask(TaskId),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::UnknownTask(id) => write!(f, "no task with id `{id}` in the current list"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::UnknownTask(_) => None,
        }
    }
}

impl From<RepoError> for ControllerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Local UI state, independent of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub input_text: String,
    pub editing: Option<Task>,
    pub filter: TaskFilter,
}

/// What a submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank; nothing was sent.
    Ignored,
    Created(Task),
    Updated(Task),
}

/// State container behind a task list view.
pub struct TaskListController<R: TaskRepository> {
    service: TaskService<R>,
    cache: QueryCache<TaskQueryKey, Vec<Task>>,
    state: ViewState,
}

impl<R: TaskRepository> TaskListController<R> {
    pub fn new(repo: R) -> Self {
        Self::with_service(TaskService::new(repo))
    }

    pub fn with_service(service: TaskService<R>) -> Self {
        Self {
            service,
            cache: QueryCache::new(),
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn service(&self) -> &TaskService<R> {
        &self.service
    }

    pub fn cache(&self) -> &QueryCache<TaskQueryKey, Vec<Task>> {
        &self.cache
    }

    /// Fetches the task list when the cached copy is missing or invalidated.
    ///
    /// Returns whether a fetch ran. A failed fetch is cached as terminal
    /// until the next invalidation.
    pub fn refresh(&mut self) -> bool {
        if !self.cache.is_stale(&TaskQueryKey::All) {
            return false;
        }

        let ticket = self.cache.begin_fetch(TaskQueryKey::All);
        let outcome = self
            .service
            .list_tasks()
            .map_err(|err| err.to_string());
        if !self.cache.resolve(ticket, outcome) {
            debug!("event=list_fetch module=view status=superseded");
        }
        true
    }

    /// Discards the cached list so the next refresh re-reads the store.
    pub fn invalidate(&mut self) {
        self.cache.invalidate(&TaskQueryKey::All);
    }

    /// Tasks from the last successful fetch, unfiltered.
    pub fn tasks(&self) -> Option<&[Task]> {
        self.cache
            .fresh_value(&TaskQueryKey::All)
            .map(Vec::as_slice)
    }

    /// Finds a task in the currently loaded list.
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks()?.iter().find(|task| &task.id == id)
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.input_text = text.into();
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.state.filter = filter;
    }

    /// Starts editing `task`, loading its title into the input.
    pub fn begin_edit(&mut self, task: &Task) {
        self.state.input_text = task.title.clone();
        self.state.editing = Some(task.clone());
    }

    /// Starts editing the loaded task with `id`.
    pub fn begin_edit_id(&mut self, id: &TaskId) -> ControllerResult<()> {
        let task = self.known_task(id)?;
        self.begin_edit(&task);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.state.editing = None;
        self.state.input_text.clear();
    }

    /// Creates a task from the input, or saves the edit draft when editing.
    pub fn submit(&mut self) -> ControllerResult<SubmitOutcome> {
        if !is_submittable_title(&self.state.input_text) {
            return Ok(SubmitOutcome::Ignored);
        }

        let outcome = match &self.state.editing {
            None => {
                let created = self.service.create_task(self.state.input_text.clone())?;
                SubmitOutcome::Created(created)
            }
            Some(task) => {
                let updated = self
                    .service
                    .rename_task(task, self.state.input_text.clone())?;
                self.state.editing = None;
                SubmitOutcome::Updated(updated)
            }
        };

        self.state.input_text.clear();
        self.invalidate();
        Ok(outcome)
    }

    /// Flips the completed flag of `task`.
    pub fn toggle(&mut self, task: &Task) -> ControllerResult<Task> {
        let updated = self.service.toggle_task(task)?;
        self.invalidate();
        Ok(updated)
    }

    /// Flips the completed flag of the loaded task with `id`.
    pub fn toggle_id(&mut self, id: &TaskId) -> ControllerResult<Task> {
        let task = self.known_task(id)?;
        self.toggle(&task)
    }

    /// Deletes by id; an edit in progress on that task is abandoned.
    pub fn delete(&mut self, id: &TaskId) -> ControllerResult<bool> {
        let removed = self.service.delete_task(id)?;
        if self
            .state
            .editing
            .as_ref()
            .is_some_and(|editing| &editing.id == id)
        {
            self.cancel_edit();
        }
        if !removed {
            warn!("event=task_delete module=view status=absent task_id={id}");
        }
        self.invalidate();
        Ok(removed)
    }

    /// Refreshes when stale, then renders.
    pub fn view(&mut self) -> TaskListView {
        self.refresh();
        self.render()
    }

    /// Builds the render model from current cache and UI state.
    pub fn render(&self) -> TaskListView {
        match self.cache.get(&TaskQueryKey::All) {
            None | Some(QueryState::Loading) => TaskListView::Loading,
            Some(QueryState::Failed(message)) => TaskListView::Error(message.clone()),
            Some(QueryState::Ready(tasks)) => TaskListView::Ready(TaskListPage {
                rows: self.state.filter.apply(tasks),
                filter: self.state.filter,
                input_text: self.state.input_text.clone(),
                editing_id: self.state.editing.as_ref().map(|task| task.id.clone()),
                counts: TaskCounts::of(tasks),
            }),
        }
    }

    fn known_task(&self, id: &TaskId) -> ControllerResult<Task> {
        self.task(id)
            .cloned()
            .ok_or_else(|| ControllerError::UnknownTask(id.clone()))
    }
}
