use std::cell::Cell;
use tasklist_core::{
    ControllerError, MemoryTaskRepository, NewTask, RepoError, RepoResult, SubmitOutcome, Task,
    TaskFilter, TaskId, TaskListController, TaskListPage, TaskListView, TaskRepository,
};

/// Wraps a store, counts list calls, and can be told to fail.
#[derive(Default)]
struct ProbeRepository {
    inner: MemoryTaskRepository,
    list_calls: Cell<usize>,
    fail_list: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl ProbeRepository {
    fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            inner: MemoryTaskRepository::with_tasks(tasks),
            ..Self::default()
        }
    }

    fn write_guard(&self) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

impl TaskRepository for ProbeRepository {
    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.fail_list.get() {
            return Err(RepoError::Http {
                status: 500,
                message: "boom".to_string(),
            });
        }
        self.inner.list_tasks()
    }

    fn create_task(&self, task: &NewTask) -> RepoResult<Task> {
        self.write_guard()?;
        self.inner.create_task(task)
    }

    fn update_task(&self, task: &Task) -> RepoResult<Task> {
        self.write_guard()?;
        self.inner.update_task(task)
    }

    fn delete_task(&self, id: &TaskId) -> RepoResult<bool> {
        self.write_guard()?;
        self.inner.delete_task(id)
    }
}

fn ready(view: TaskListView) -> TaskListPage {
    match view {
        TaskListView::Ready(page) => page,
        other => panic!("expected a loaded page, got {other:?}"),
    }
}

fn three_tasks_one_completed() -> Vec<Task> {
    vec![
        Task::new("1", "Learn Rust"),
        Task::new("2", "Ship it").toggled(),
        Task::new("3", "Write tests"),
    ]
}

#[test]
fn renders_loading_before_first_fetch() {
    let controller = TaskListController::new(ProbeRepository::default());
    assert_eq!(controller.render(), TaskListView::Loading);
}

#[test]
fn failed_initial_fetch_renders_terminal_error() {
    let repo = ProbeRepository::default();
    repo.fail_list.set(true);
    let mut controller = TaskListController::new(repo);

    let view = controller.view();
    assert!(matches!(view, TaskListView::Error(ref message) if message.contains("500")));

    // No retry on later renders.
    controller.view();
    assert_eq!(controller.service().repository().list_calls.get(), 1);
}

#[test]
fn fresh_list_is_served_from_cache() {
    let mut controller = TaskListController::new(ProbeRepository::default());
    controller.view();
    controller.view();
    controller.set_filter(TaskFilter::Active);
    controller.view();

    assert_eq!(controller.service().repository().list_calls.get(), 1);
}

#[test]
fn submit_creates_task_clears_input_and_refetches() {
    let mut controller = TaskListController::new(ProbeRepository::default());
    controller.view();

    controller.set_input("Buy milk");
    let outcome = controller.submit().unwrap();
    let created = match outcome {
        SubmitOutcome::Created(task) => task,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(controller.state().input_text, "");
    assert!(controller.cache().is_stale(&tasklist_core::TaskQueryKey::All));

    let page = ready(controller.view());
    assert_eq!(page.rows, vec![created]);
    assert_eq!(page.rows[0].title, "Buy milk");
    assert!(!page.rows[0].completed);
    assert_eq!(controller.service().repository().list_calls.get(), 2);
}

#[test]
fn blank_submit_is_ignored_without_store_call() {
    let mut controller = TaskListController::new(ProbeRepository::default());
    controller.view();

    controller.set_input("   \t");
    assert_eq!(controller.submit().unwrap(), SubmitOutcome::Ignored);
    assert!(!controller.cache().is_stale(&tasklist_core::TaskQueryKey::All));
    assert!(ready(controller.view()).rows.is_empty());
}

#[test]
fn edit_flow_prefills_input_and_updates_title() {
    let mut controller =
        TaskListController::new(ProbeRepository::with_tasks(three_tasks_one_completed()));
    controller.view();

    controller.begin_edit_id(&TaskId::new("2")).unwrap();
    assert_eq!(controller.state().input_text, "Ship it");
    let page = ready(controller.render());
    assert_eq!(page.submit_label(), "Update Task");
    assert!(page.is_editing(&TaskId::new("2")));

    controller.set_input("Ship it today");
    let outcome = controller.submit().unwrap();
    assert!(matches!(outcome, SubmitOutcome::Updated(ref task) if task.title == "Ship it today"));
    assert_eq!(controller.state().editing, None);
    assert_eq!(controller.state().input_text, "");

    let page = ready(controller.view());
    assert_eq!(page.submit_label(), "Add Task");
    let edited = page.rows.iter().find(|t| t.id.as_str() == "2").unwrap();
    assert_eq!(edited.title, "Ship it today");
    assert!(edited.completed, "editing must not touch the completed flag");
}

#[test]
fn cancel_edit_clears_draft() {
    let mut controller =
        TaskListController::new(ProbeRepository::with_tasks(three_tasks_one_completed()));
    controller.view();
    controller.begin_edit_id(&TaskId::new("1")).unwrap();

    controller.cancel_edit();
    assert_eq!(controller.state().editing, None);
    assert_eq!(controller.state().input_text, "");
}

#[test]
fn toggle_scenario_marks_task_completed() {
    let mut controller =
        TaskListController::new(ProbeRepository::with_tasks([Task::new("1", "A")]));
    controller.view();

    controller.toggle_id(&TaskId::new("1")).unwrap();

    let page = ready(controller.view());
    assert_eq!(
        page.rows,
        vec![Task {
            id: TaskId::new("1"),
            title: "A".to_string(),
            completed: true,
        }]
    );
}

#[test]
fn filter_scenario_counts_rows() {
    let mut controller =
        TaskListController::new(ProbeRepository::with_tasks(three_tasks_one_completed()));
    controller.view();

    controller.set_filter(TaskFilter::Completed);
    assert_eq!(ready(controller.render()).rows.len(), 1);

    controller.set_filter(TaskFilter::Active);
    let page = ready(controller.render());
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.counts.total, 3);
    assert_eq!(page.counts.active, 2);
    assert_eq!(page.counts.completed, 1);

    controller.set_filter(TaskFilter::All);
    assert_eq!(ready(controller.render()).rows.len(), 3);
}

#[test]
fn deleting_task_under_edit_abandons_the_edit() {
    let mut controller =
        TaskListController::new(ProbeRepository::with_tasks(three_tasks_one_completed()));
    controller.view();
    controller.begin_edit_id(&TaskId::new("3")).unwrap();

    assert!(controller.delete(&TaskId::new("3")).unwrap());
    assert_eq!(controller.state().editing, None);
    assert_eq!(controller.state().input_text, "");

    let page = ready(controller.view());
    assert!(page.rows.iter().all(|t| t.id.as_str() != "3"));
}

#[test]
fn deleting_other_task_keeps_edit_in_progress() {
    let mut controller =
        TaskListController::new(ProbeRepository::with_tasks(three_tasks_one_completed()));
    controller.view();
    controller.begin_edit_id(&TaskId::new("3")).unwrap();

    controller.delete(&TaskId::new("1")).unwrap();
    assert_eq!(
        controller.state().editing.as_ref().map(|t| t.id.clone()),
        Some(TaskId::new("3"))
    );
}

#[test]
fn deleting_nonexistent_id_keeps_list() {
    let mut controller =
        TaskListController::new(ProbeRepository::with_tasks(three_tasks_one_completed()));
    let before = ready(controller.view()).rows;

    assert!(!controller.delete(&TaskId::new("nonexistent-id")).unwrap());
    assert_eq!(ready(controller.view()).rows, before);
}

#[test]
fn failed_mutation_keeps_state_and_cache() {
    let repo = ProbeRepository::with_tasks(three_tasks_one_completed());
    let mut controller = TaskListController::new(repo);
    controller.view();
    controller.service().repository().fail_writes.set(true);

    controller.set_input("will fail");
    let err = controller.submit().unwrap_err();
    assert!(matches!(err, ControllerError::Repo(RepoError::Transport(_))));
    assert_eq!(controller.state().input_text, "will fail");
    assert!(!controller.cache().is_stale(&tasklist_core::TaskQueryKey::All));

    let err = controller.toggle_id(&TaskId::new("1")).unwrap_err();
    assert!(matches!(err, ControllerError::Repo(_)));
    assert_eq!(controller.service().repository().list_calls.get(), 1);
}

#[test]
fn unknown_ids_are_rejected_before_reaching_the_store() {
    let mut controller = TaskListController::new(ProbeRepository::default());
    controller.view();

    let err = controller.toggle_id(&TaskId::new("missing")).unwrap_err();
    assert!(matches!(err, ControllerError::UnknownTask(ref id) if id.as_str() == "missing"));
    let err = controller.begin_edit_id(&TaskId::new("missing")).unwrap_err();
    assert!(matches!(err, ControllerError::UnknownTask(_)));
}

#[test]
fn editing_a_task_deleted_elsewhere_reports_not_found() {
    let repo = ProbeRepository::with_tasks(three_tasks_one_completed());
    let mut controller = TaskListController::new(repo);
    controller.view();
    controller.begin_edit_id(&TaskId::new("1")).unwrap();

    // Another writer removes the task behind the controller's back.
    controller
        .service()
        .repository()
        .inner
        .delete_task(&TaskId::new("1"))
        .unwrap();

    controller.set_input("renamed");
    let err = controller.submit().unwrap_err();
    assert!(matches!(err, ControllerError::Repo(RepoError::NotFound(_))));
}
