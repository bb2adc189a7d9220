//! Render model for task list views.

use crate::model::filter::TaskFilter;
use crate::model::task::{Task, TaskId};

/// What a view shows for the current cache state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListView {
    /// Initial fetch pending.
    Loading,
    /// Initial fetch failed. Terminal; no stale data is shown.
    Error(String),
    Ready(TaskListPage),
}

/// A loaded task list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListPage {
    /// Tasks passing `filter`, in store order.
    pub rows: Vec<Task>,
    pub filter: TaskFilter,
    pub input_text: String,
    pub editing_id: Option<TaskId>,
    /// Totals over the unfiltered list.
    pub counts: TaskCounts,
}

impl TaskListPage {
    /// Label of the form's submit button.
    pub fn submit_label(&self) -> &'static str {
        if self.editing_id.is_some() {
            "Update Task"
        } else {
            "Add Task"
        }
    }

    pub fn is_editing(&self, id: &TaskId) -> bool {
        self.editing_id.as_ref() == Some(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }
}
