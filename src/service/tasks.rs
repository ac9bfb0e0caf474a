//! Task orchestration: list refresh, creation, pause and resume, edit, delete.
//!
//! Every mutation runs under the guard and, once the server accepted it,
//! schedules a detached list refresh so the store converges with the server.

use std::collections::HashSet;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::{Error, Notice, Result};
use crate::store::{Action, StoreState, selectors};
use crate::transport::{CommonResponse, CreateTaskRequest, TaskList, TaskListOption};
use crate::types::{Event, StatusIndex, Task, TaskId, TaskIds, TaskStatus};

use super::StationService;
use super::loading::GuardOptions;

/// Fields requested on every list refresh
const LIST_FIELDS: [TaskListOption; 3] = [
    TaskListOption::Detail,
    TaskListOption::File,
    TaskListOption::Transfer,
];

/// A task creation request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewTask {
    /// URI to download
    pub uri: String,
    /// Page the URI was found on, shown as notification context
    pub source: Option<String>,
    /// Destination folder (server default when unset)
    pub destination: Option<String>,
    /// Account for the remote source
    pub username: Option<String>,
    /// Password for the remote source
    pub password: Option<String>,
    /// Password for archives to extract after download
    pub unzip_password: Option<String>,
}

impl NewTask {
    /// Create a request for `uri`
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Set the source page
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the destination folder
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Set the remote source account
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the archive password
    pub fn unzip_password(mut self, password: impl Into<String>) -> Self {
        self.unzip_password = Some(password.into());
        self
    }

    fn to_request(&self) -> CreateTaskRequest {
        CreateTaskRequest {
            uri: self.uri.clone(),
            destination: self.destination.clone().filter(|d| !d.is_empty()),
            username: self.username.clone().filter(|u| !u.is_empty()),
            password: self.password.clone().filter(|p| !p.is_empty()),
            unzip_password: self.unzip_password.clone().filter(|p| !p.is_empty()),
        }
    }
}

/// Result of a multi-URI creation
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// URIs the server accepted
    pub created: Vec<String>,
    /// URIs that failed, with the reason
    pub failed: Vec<(String, Error)>,
}

impl BatchOutcome {
    /// Whether every URI was accepted
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Split a newline-separated URI list, dropping blank lines
pub fn parse_uris(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .map(String::from)
        .collect()
}

impl StationService {
    /// Fetch the full task list and replace the store's task collection
    ///
    /// Tasks that entered the finished or error state since the snapshot taken
    /// before the call raise a notification, if enabled in the settings.
    pub async fn list_tasks(&self) -> Result<TaskList> {
        let snapshot = selectors::tasks_ids_by_status_type(&self.store.state());

        let list = self
            .guard(GuardOptions::LOGGED_IN, async {
                Ok(self.transport.download.list_tasks(0, -1, &LIST_FIELDS).await?)
            })
            .await?;

        let tasks: Vec<Task> = list.tasks.iter().cloned().map(Task::from).collect();
        self.notify_transitions(&snapshot, &tasks, &self.store.state());

        let count = tasks.len();
        self.store.dispatch(Action::SetTasks(tasks));
        self.emit_event(Event::TasksRefreshed { count });

        Ok(list)
    }

    fn notify_transitions(&self, previous: &StatusIndex, tasks: &[Task], state: &StoreState) {
        let finished_enabled = selectors::notifications_banner_finished_enabled(state);
        let failed_enabled = selectors::notifications_banner_failed_enabled(state);

        for task in tasks {
            match task.status {
                TaskStatus::Finished if finished_enabled && !previous.finished.contains(&task.id) => {
                    self.notifier.task_finished(task);
                }
                TaskStatus::Error if failed_enabled && !previous.error.contains(&task.id) => {
                    self.notifier.task_error(task);
                }
                _ => {}
            }
        }
    }

    /// Refresh the task list in a detached task
    ///
    /// The caller's result never depends on the refresh: a failure is logged
    /// and published as [`Event::RefreshFailed`], nothing else. The refresh is
    /// abandoned when the service is disposed.
    pub fn refresh_in_background(&self, operation: &'static str) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        tracing::debug!(operation, "Scheduling task list refresh");

        tokio::spawn(async move {
            tokio::select! {
                _ = service.shutdown.cancelled() => {}
                result = service.list_tasks() => {
                    if let Err(e) = result {
                        tracing::warn!(operation, error = %e, "Task list refresh failed, store may be stale");
                        service.emit_event(Event::RefreshFailed {
                            operation: operation.to_string(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        })
    }

    /// Report a failed user-initiated operation
    pub(crate) fn report_failure(&self, operation: &str, error: &Error, context: Option<&str>) {
        tracing::error!(operation, error = %error, context, "Operation failed");
        if error.is_login_required() {
            self.notifier.login_required();
        } else {
            self.notifier
                .error(Notice::from_error(operation, error).with_context(context));
        }
    }

    fn settle_mutation<T>(&self, operation: &'static str, ids: &TaskIds, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                tracing::debug!(operation, task_ids = %ids, "Task mutation accepted");
                self.refresh_in_background(operation);
                Ok(value)
            }
            Err(e) => {
                self.report_failure(operation, &e, None);
                Err(e)
            }
        }
    }

    /// Resume one or many tasks
    pub async fn resume_task(&self, ids: impl Into<TaskIds>) -> Result<Vec<CommonResponse>> {
        let ids = ids.into();
        let result = self
            .guard(GuardOptions::LOGGED_IN, async {
                Ok(self.transport.download.resume_task(&ids).await?)
            })
            .await;
        self.settle_mutation("resume task", &ids, result)
    }

    /// Resume every paused task under the action scope (or the given ids)
    ///
    /// Returns immediately without any call when nothing is targeted.
    pub async fn resume_all_tasks(&self, ids: Option<HashSet<TaskId>>) -> Result<Vec<CommonResponse>> {
        let ids = ids.unwrap_or_else(|| selectors::paused_tasks_ids_by_action_scope(&self.store.state()));
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.resume_task(ids).await
    }

    /// Pause one or many tasks
    pub async fn pause_task(&self, ids: impl Into<TaskIds>) -> Result<Vec<CommonResponse>> {
        let ids = ids.into();
        let result = self
            .guard(GuardOptions::LOGGED_IN, async {
                Ok(self.transport.download.pause_task(&ids).await?)
            })
            .await;
        self.settle_mutation("pause task", &ids, result)
    }

    /// Pause every active task under the action scope (or the given ids)
    ///
    /// Returns immediately without any call when nothing is targeted.
    pub async fn pause_all_tasks(&self, ids: Option<HashSet<TaskId>>) -> Result<Vec<CommonResponse>> {
        let ids = ids.unwrap_or_else(|| selectors::active_tasks_ids_by_action_scope(&self.store.state()));
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.pause_task(ids).await
    }

    /// Move one or many tasks to another destination
    pub async fn edit_task(&self, ids: impl Into<TaskIds>, destination: &str) -> Result<Vec<CommonResponse>> {
        let ids = ids.into();
        let result = self
            .guard(GuardOptions::LOGGED_IN, async {
                Ok(self.transport.download.edit_task(&ids, destination).await?)
            })
            .await;
        self.settle_mutation("edit task", &ids, result)
    }

    /// Create a task on the server
    ///
    /// On success the destination is remembered and a "task created"
    /// notification is raised; on failure the notification carries the source.
    pub async fn create_task(&self, task: NewTask) -> Result<()> {
        let request = task.to_request();
        let result = self
            .guard(GuardOptions::LOGGED_IN, async {
                Ok(self.transport.download.create_task(&request).await?)
            })
            .await;

        match result {
            Ok(()) => {
                tracing::debug!(uri = %task.uri, destination = request.destination.as_deref(), "Task created");
                self.refresh_in_background("create task");
                if let Some(destination) = request.destination.as_ref() {
                    self.store
                        .dispatch(Action::AddDestinationHistory(destination.clone()));
                }
                self.notifier.task_created(
                    &task.uri,
                    task.source.as_deref(),
                    request.destination.as_deref(),
                );
                Ok(())
            }
            Err(e) => {
                self.report_failure("create task", &e, task.source.as_deref());
                Err(e)
            }
        }
    }

    /// Create one task per line of `uris`, sharing the other fields of `template`
    ///
    /// Creations run concurrently. Fails only when `uris` holds no URI.
    pub async fn create_tasks(&self, uris: &str, template: NewTask) -> Result<BatchOutcome> {
        let uris = parse_uris(uris);
        if uris.is_empty() {
            return Err(Error::validation("uri", "at least one URI is required"));
        }

        let results = futures::future::join_all(uris.iter().map(|uri| {
            self.create_task(NewTask {
                uri: uri.clone(),
                ..template.clone()
            })
        }))
        .await;

        let mut outcome = BatchOutcome::default();
        for (uri, result) in uris.into_iter().zip(results) {
            match result {
                Ok(()) => outcome.created.push(uri),
                Err(e) => outcome.failed.push((uri, e)),
            }
        }
        Ok(outcome)
    }

    /// Delete one or many tasks (`force` also removes downloaded data)
    ///
    /// The ids leave the store's task collection as soon as this is called,
    /// before the returned future is polled. A refresh follows either way so a
    /// rejected delete brings the tasks back.
    pub fn delete_task(
        &self,
        ids: impl Into<TaskIds>,
        force: bool,
    ) -> BoxFuture<'static, Result<Vec<CommonResponse>>> {
        const OPERATION: &str = "delete task";
        let ids = ids.into();

        let loading = match self.begin_loading(GuardOptions::LOGGED_IN) {
            Ok(loading) => loading,
            Err(e) => {
                self.report_failure(OPERATION, &e, None);
                return futures::future::ready(Err(e)).boxed();
            }
        };
        self.store.dispatch(Action::SpliceTasks(ids.clone()));

        let service = self.clone();
        async move {
            let result = service.transport.download.delete_task(&ids, force).await;
            drop(loading);

            match result {
                Ok(responses) => service.settle_mutation(OPERATION, &ids, Ok(responses)),
                Err(e) => {
                    service.refresh_in_background(OPERATION);
                    service.settle_mutation(OPERATION, &ids, Err(Error::from(e)))
                }
            }
        }
        .boxed()
    }

    /// Delete every task under the action scope (or the given ids)
    ///
    /// Returns immediately without any call when nothing is targeted.
    pub async fn delete_all_tasks(
        &self,
        ids: Option<HashSet<TaskId>>,
        force: bool,
    ) -> Result<Vec<CommonResponse>> {
        let ids = ids.unwrap_or_else(|| selectors::tasks_ids_by_action_scope(&self.store.state()));
        self.delete_targeted(ids, force).await
    }

    /// Delete finished and failed tasks under the action scope (or the given ids)
    pub async fn delete_finished_and_error_tasks(
        &self,
        ids: Option<HashSet<TaskId>>,
        force: bool,
    ) -> Result<Vec<CommonResponse>> {
        let ids = ids.unwrap_or_else(|| {
            selectors::finished_and_error_tasks_ids_by_action_scope(&self.store.state())
        });
        self.delete_targeted(ids, force).await
    }

    /// Delete finished tasks under the action scope (or the given ids)
    pub async fn delete_finished_tasks(
        &self,
        ids: Option<HashSet<TaskId>>,
        force: bool,
    ) -> Result<Vec<CommonResponse>> {
        let ids =
            ids.unwrap_or_else(|| selectors::finished_tasks_ids_by_action_scope(&self.store.state()));
        self.delete_targeted(ids, force).await
    }

    async fn delete_targeted(&self, ids: HashSet<TaskId>, force: bool) -> Result<Vec<CommonResponse>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.delete_task(ids, force).await
    }
}
