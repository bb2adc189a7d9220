//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task list use cases to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` and a message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Blank titles are rejected here, before reaching the store; other titles
//!   are stored as typed, like the controller and CLI do.
//! - Every call opens the configured SQLite store and releases it on return.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use tasklist_core::db::open_db;
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, is_submittable_title,
    ping as ping_inner, SqliteTaskRepository, Task, TaskCounts, TaskFilter, TaskId, TaskService,
};

const TASK_DB_FILE_NAME: &str = "tasklist.sqlite3";
const TASK_DB_PATH_ENV: &str = "TASKLIST_DB_PATH";
static TASK_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the SQLite file used by all task calls.
///
/// Must run before the first task call to take effect. Without it the path
/// comes from `TASKLIST_DB_PATH`, falling back to the system temp dir.
///
/// # FFI contract
/// - Returns empty string on success (including re-pinning the same path).
/// - Returns an error message for empty input or a conflicting path.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = TASK_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "task DB path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Task row as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

impl From<Task> for TaskItem {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title,
            completed: task.completed,
        }
    }
}

/// List envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    /// Rows passing `applied_filter`, in store order.
    pub items: Vec<TaskItem>,
    /// Filter actually applied (`all|active|completed`).
    pub applied_filter: String,
    pub total: u32,
    pub active: u32,
    pub completed: u32,
    pub message: String,
}

/// Mutation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Record after the mutation; `None` for deletes and failures.
    pub task: Option<TaskItem>,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task: Option<Task>) -> Self {
        Self {
            ok: true,
            task: task.map(TaskItem::from),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task: None,
            message: message.into(),
        }
    }
}

/// Lists tasks through `filter` (`all|active|completed`, default `all`).
///
/// # FFI contract
/// - Unknown filter names fail with a message; no store access happens.
/// - Counts cover the unfiltered list.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(filter: Option<String>) -> TaskListResponse {
    let filter = match filter.as_deref().map(str::parse::<TaskFilter>) {
        None => TaskFilter::All,
        Some(Ok(filter)) => filter,
        Some(Err(err)) => return list_failure(TaskFilter::All, err.to_string()),
    };

    match with_task_service(|service| service.list_tasks().map_err(|err| err.to_string())) {
        Ok(tasks) => {
            let counts = TaskCounts::of(&tasks);
            let items = filter
                .apply(&tasks)
                .into_iter()
                .map(TaskItem::from)
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No tasks.".to_string()
            } else {
                format!("Found {} task(s).", items.len())
            };
            TaskListResponse {
                ok: true,
                items,
                applied_filter: filter.to_string(),
                total: saturating_u32(counts.total),
                active: saturating_u32(counts.active),
                completed: saturating_u32(counts.completed),
                message,
            }
        }
        Err(err) => list_failure(filter, format!("tasks_list failed: {err}")),
    }
}

/// Creates a task with `title`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(title: String) -> TaskActionResponse {
    if !is_submittable_title(&title) {
        return TaskActionResponse::failure("task_create failed: title cannot be blank");
    }
    match with_task_service(|service| {
        service
            .create_task(title.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(task) => TaskActionResponse::success("Task created.", Some(task)),
        Err(err) => TaskActionResponse::failure(format!("task_create failed: {err}")),
    }
}

/// Flips the completed flag of task `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: String) -> TaskActionResponse {
    let id = TaskId::new(id.trim());
    match with_task_service(|service| {
        let task = require_task(service, &id)?;
        service.toggle_task(&task).map_err(|err| err.to_string())
    }) {
        Ok(task) => TaskActionResponse::success("Task updated.", Some(task)),
        Err(err) => TaskActionResponse::failure(format!("task_toggle failed: {err}")),
    }
}

/// Replaces the title of task `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_rename(id: String, title: String) -> TaskActionResponse {
    if !is_submittable_title(&title) {
        return TaskActionResponse::failure("task_rename failed: title cannot be blank");
    }
    let id = TaskId::new(id.trim());
    match with_task_service(|service| {
        let task = require_task(service, &id)?;
        service
            .rename_task(&task, title.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(task) => TaskActionResponse::success("Task updated.", Some(task)),
        Err(err) => TaskActionResponse::failure(format!("task_rename failed: {err}")),
    }
}

/// Deletes task `id`. Deleting an unknown id succeeds with a notice.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> TaskActionResponse {
    let id = TaskId::new(id.trim());
    match with_task_service(|service| service.delete_task(&id).map_err(|err| err.to_string())) {
        Ok(true) => TaskActionResponse::success("Task deleted.", None),
        Ok(false) => {
            warn!("event=ffi_task_delete module=ffi status=absent task_id={id}");
            TaskActionResponse::success("Task not found; nothing deleted.", None)
        }
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

fn list_failure(filter: TaskFilter, message: String) -> TaskListResponse {
    TaskListResponse {
        ok: false,
        items: Vec::new(),
        applied_filter: filter.to_string(),
        total: 0,
        active: 0,
        completed: 0,
        message,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn resolve_db_path() -> PathBuf {
    TASK_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(TASK_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(TASK_DB_FILE_NAME)
        })
        .clone()
}

fn require_task(
    service: &TaskService<SqliteTaskRepository>,
    id: &TaskId,
) -> Result<Task, String> {
    service
        .find_task(id)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("task not found: {id}"))
}

fn with_task_service<T>(
    f: impl FnOnce(&TaskService<SqliteTaskRepository>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("task DB open failed: {err}"))?;
    let repo =
        SqliteTaskRepository::try_new(conn).map_err(|err| format!("task repo init failed: {err}"))?;
    let service = TaskService::new(repo);
    f(&service)
}
