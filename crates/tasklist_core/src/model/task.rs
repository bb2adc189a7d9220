//! Task domain model.
//!
//! # Responsibility
//! - Define the single record shared by every store and front end.
//! - Keep wire naming compatible with REST backends that emit `_id`.
//!
//! # Invariants
//! - `id` is assigned by the store on creation and never changes.
//! - `completed` starts as `false`.
//! - Blank titles are a UI-boundary concern; this model does not reject them.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Opaque task identifier.
///
/// Stores pick their own id scheme (server ids, timestamp tokens, UUIDs), so
/// the core only ever compares and displays it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

// Backends disagree on id shape: document stores send strings, json-server
// style mocks send integers. Both decode into the same opaque token.
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TaskIdVisitor;

        impl Visitor<'_> for TaskIdVisitor {
            type Value = TaskId;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("a string or integer task id")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<TaskId, E> {
                if value.is_empty() {
                    return Err(E::custom("task id cannot be empty"));
                }
                Ok(TaskId::new(value))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<TaskId, E> {
                if value.is_empty() {
                    return Err(E::custom("task id cannot be empty"));
                }
                Ok(TaskId(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<TaskId, E> {
                Ok(TaskId(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<TaskId, E> {
                Ok(TaskId(value.to_string()))
            }
        }

        deserializer.deserialize_any(TaskIdVisitor)
    }
}

/// A short text task.
///
/// Always written with an `id` field; read through `TaskRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

/// Incoming task shape.
///
/// Document stores name the id `_id` and, with virtuals enabled, echo it as
/// `id` too. `_id` wins when both are present.
#[derive(Deserialize)]
struct TaskRecord {
    #[serde(rename = "_id")]
    document_id: Option<TaskId>,
    id: Option<TaskId>,
    title: String,
    #[serde(default)]
    completed: bool,
}

impl TryFrom<TaskRecord> for Task {
    type Error = String;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let id = record
            .document_id
            .or(record.id)
            .ok_or_else(|| "task record has neither `_id` nor `id`".to_string())?;
        Ok(Self {
            id,
            title: record.title,
            completed: record.completed,
        })
    }
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
        }
    }

    /// Returns a copy with `completed` flipped.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    /// Returns a copy with `title` replaced.
    pub fn renamed(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// Creation payload; also the POST body of the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }

    /// Materializes the payload into a record under a store-assigned id.
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            completed: self.completed,
        }
    }
}

/// Returns whether `title` is acceptable input for a submit action.
pub fn is_submittable_title(title: &str) -> bool {
    !title.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{is_submittable_title, NewTask, Task, TaskId};

    #[test]
    fn toggled_flips_only_completed() {
        let task = Task::new("1", "A");
        let toggled = task.toggled();

        assert!(toggled.completed);
        assert_eq!(toggled.id, task.id);
        assert_eq!(toggled.title, "A");
        assert_eq!(toggled.toggled(), task);
    }

    #[test]
    fn new_task_defaults_to_not_completed() {
        let task = NewTask::new("Buy milk").into_task(TaskId::new("t-1"));
        assert!(!task.completed);
        assert_eq!(task.title, "Buy milk");
    }

    #[test]
    fn blank_titles_are_not_submittable() {
        assert!(!is_submittable_title(""));
        assert!(!is_submittable_title("  \t\n"));
        assert!(is_submittable_title(" x "));
    }
}
