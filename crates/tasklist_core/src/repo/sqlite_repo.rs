//! SQLite-backed task store.
//!
//! # Responsibility
//! - Persist tasks for the CLI and FFI front ends across runs.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - List order is insertion order (`seq ASC`).
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::ensure_current;
use crate::model::task::{NewTask, Task, TaskId};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT id, title, completed FROM tasks";

/// SQLite task repository owning its connection.
pub struct SqliteTaskRepository {
    conn: Connection,
}

impl SqliteTaskRepository {
    /// Wraps a connection opened through `db::open_db` or
    /// `db::open_db_in_memory`.
    ///
    /// # Errors
    /// - `Db(SchemaNotMigrated)` when the connection skipped migrations.
    /// - `Db(SchemaTooNew)` when a newer build wrote the file.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_current(&conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository {
    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn create_task(&self, task: &NewTask) -> RepoResult<Task> {
        let id = TaskId::new(Uuid::new_v4().to_string());
        self.conn.execute(
            "INSERT INTO tasks (id, title, completed) VALUES (?1, ?2, ?3);",
            params![id.as_str(), task.title.as_str(), task.completed],
        )?;

        Ok(task.clone().into_task(id))
    }

    fn update_task(&self, task: &Task) -> RepoResult<Task> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                completed = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![task.title.as_str(), task.completed, task.id.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id.clone()));
        }

        Ok(task.clone())
    }

    fn delete_task(&self, id: &TaskId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.as_str()])?;
        Ok(changed > 0)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id: String = row.get("id")?;
    if id.is_empty() {
        return Err(RepoError::InvalidData(
            "empty id value in tasks.id".to_string(),
        ));
    }

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    Ok(Task {
        id: TaskId::new(id),
        title: row.get("title")?,
        completed,
    })
}
