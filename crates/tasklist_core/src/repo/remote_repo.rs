//! REST-backed task store.
//!
//! # Responsibility
//! - Map the four repository operations onto a task resource URL.
//! - Translate HTTP outcomes into `RepoError` variants.
//!
//! # Invariants
//! - `GET base` lists, `POST base` creates, `PUT base/{id}` replaces,
//!   `DELETE base/{id}` removes. No auth headers, no paging parameters.
//! - 404 on update is `NotFound`; 404 on delete is a no-op (`Ok(false)`).
//! - Response bodies may name the id `id` or `_id`.
//! - A create answered without a body must carry a `Location` header naming
//!   `base/{id}`; an update answered without a body stored the sent record.

use crate::model::task::{NewTask, Task, TaskId};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use log::{debug, warn};
use reqwest::blocking::{Client, Response};
use reqwest::header::LOCATION;
use reqwest::{StatusCode, Url};
use std::net::IpAddr;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_BODY_CHARS: usize = 200;

/// HTTP task repository against one resource collection URL.
pub struct RemoteTaskRepository {
    client: Client,
    base_url: Url,
}

impl RemoteTaskRepository {
    /// Builds a repository for `base_url` (e.g. `http://localhost:3000/api/tasks`).
    ///
    /// # Errors
    /// - `InvalidData` when the URL does not parse or cannot carry path segments.
    /// - `Transport` when the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> RepoResult<Self> {
        let base_url = parse_base_url(base_url)?;
        let mut builder = Client::builder().timeout(timeout);
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|err| RepoError::Transport(err.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn task_url(&self, id: &TaskId) -> RepoResult<Url> {
        task_url(&self.base_url, id)
    }
}

impl TaskRepository for RemoteTaskRepository {
    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        debug!("event=remote_request module=repo method=GET");
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .map_err(transport_error)?;
        let body = success_body(response)?;
        decode_task_list(&body)
    }

    fn create_task(&self, task: &NewTask) -> RepoResult<Task> {
        debug!("event=remote_request module=repo method=POST");
        let response = self
            .client
            .post(self.base_url.clone())
            .json(task)
            .send()
            .map_err(transport_error)?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = success_body(response)?;
        if !body.trim().is_empty() {
            return decode_task(&body);
        }

        let id = location
            .as_deref()
            .and_then(|location| id_from_location(&self.base_url, location))
            .ok_or_else(|| {
                RepoError::InvalidData(
                    "create response carried neither a task record nor a task Location".to_string(),
                )
            })?;
        Ok(task.clone().into_task(id))
    }

    fn update_task(&self, task: &Task) -> RepoResult<Task> {
        debug!(
            "event=remote_request module=repo method=PUT task_id={}",
            task.id
        );
        let response = self
            .client
            .put(self.task_url(&task.id)?)
            .json(task)
            .send()
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepoError::NotFound(task.id.clone()));
        }
        let body = success_body(response)?;
        // Some backends answer 204 with no body; the caller's record is then
        // the stored record.
        if body.trim().is_empty() {
            return Ok(task.clone());
        }
        decode_task(&body)
    }

    fn delete_task(&self, id: &TaskId) -> RepoResult<bool> {
        debug!("event=remote_request module=repo method=DELETE task_id={id}");
        let response = self
            .client
            .delete(self.task_url(id)?)
            .send()
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            warn!("event=remote_delete module=repo status=not_found task_id={id}");
            return Ok(false);
        }
        success_body(response)?;
        Ok(true)
    }
}

fn parse_base_url(raw: &str) -> RepoResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|err| RepoError::InvalidData(format!("invalid task API url `{raw}`: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(RepoError::InvalidData(format!(
            "task API url `{raw}` cannot carry a task id path"
        )));
    }
    Ok(url)
}

fn is_loopback(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    host.eq_ignore_ascii_case("localhost")
        || host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback())
}

/// Builds `base/{id}`, percent-encoding the id as one path segment.
pub fn task_url(base_url: &Url, id: &TaskId) -> RepoResult<Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| {
            RepoError::InvalidData(format!("task API url `{base_url}` cannot carry a task id"))
        })?
        .pop_if_empty()
        .push(id.as_str());
    Ok(url)
}

/// Reads the id out of a `Location` pointing at `base/{id}`.
fn id_from_location(base_url: &Url, location: &str) -> Option<TaskId> {
    let resolved = base_url.join(location).ok()?;
    let prefix = format!("{}/", base_url.path().trim_end_matches('/'));
    let segment = resolved.path().strip_prefix(&prefix)?.trim_end_matches('/');
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    Some(TaskId::new(segment))
}

/// Decodes a list response body.
pub fn decode_task_list(body: &str) -> RepoResult<Vec<Task>> {
    serde_json::from_str(body)
        .map_err(|err| RepoError::InvalidData(format!("task list response: {err}")))
}

/// Decodes a single-record response body.
pub fn decode_task(body: &str) -> RepoResult<Task> {
    serde_json::from_str(body)
        .map_err(|err| RepoError::InvalidData(format!("task response: {err}")))
}

fn success_body(response: Response) -> RepoResult<String> {
    let status = response.status();
    let body = response.text().map_err(transport_error)?;
    if status.is_success() {
        return Ok(body);
    }

    Err(RepoError::Http {
        status: status.as_u16(),
        message: summarize_body(&body),
    })
}

fn summarize_body(body: &str) -> String {
    let flattened = body.replace(['\n', '\r'], " ");
    let mut summary = flattened
        .chars()
        .take(MAX_ERROR_BODY_CHARS)
        .collect::<String>();
    if flattened.chars().count() > MAX_ERROR_BODY_CHARS {
        summary.push_str("...");
    }
    summary
}

fn transport_error(err: reqwest::Error) -> RepoError {
    if err.is_timeout() {
        return RepoError::Transport(format!("request timed out: {err}"));
    }
    RepoError::Transport(err.to_string())
}
