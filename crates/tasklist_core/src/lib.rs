//! Core domain logic for the task list.
//! Front ends (CLI, FFI) only talk to the types re-exported here.

pub mod cache;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use cache::query_cache::{FetchTicket, QueryCache, QueryState, TaskQueryKey};
pub use config::{open_repository, ConfigError, LogConfig, StoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status};
pub use model::filter::{ParseFilterError, TaskFilter};
pub use model::task::{is_submittable_title, NewTask, Task, TaskId};
pub use repo::memory_repo::MemoryTaskRepository;
pub use repo::remote_repo::RemoteTaskRepository;
pub use repo::sqlite_repo::SqliteTaskRepository;
pub use repo::task_repo::{RepoError, RepoResult, TaskRepository};
pub use service::task_service::TaskService;
pub use view::controller::{
    ControllerError, ControllerResult, SubmitOutcome, TaskListController, ViewState,
};
pub use view::render::{TaskCounts, TaskListPage, TaskListView};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
