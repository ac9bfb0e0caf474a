//! Core types for station-link

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::transport::RawTask;

/// Unique identifier for a remote download task (e.g. "dbid_42")
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a new TaskId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for TaskId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One or many task ids targeted by a single mutating call
///
/// The server accepts several ids at once as a comma-separated list, which is
/// what the [`Display`](std::fmt::Display) implementation produces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskIds(pub Vec<TaskId>);

impl TaskIds {
    /// Whether no id is targeted
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of targeted ids
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the targeted ids
    pub fn iter(&self) -> std::slice::Iter<'_, TaskId> {
        self.0.iter()
    }

    /// Whether `id` is targeted
    pub fn contains(&self, id: &TaskId) -> bool {
        self.0.contains(id)
    }
}

impl From<TaskId> for TaskIds {
    fn from(id: TaskId) -> Self {
        Self(vec![id])
    }
}

impl From<&str> for TaskIds {
    fn from(id: &str) -> Self {
        Self(vec![TaskId::from(id)])
    }
}

impl From<Vec<TaskId>> for TaskIds {
    fn from(ids: Vec<TaskId>) -> Self {
        Self(ids)
    }
}

impl From<HashSet<TaskId>> for TaskIds {
    fn from(ids: HashSet<TaskId>) -> Self {
        let mut ids: Vec<TaskId> = ids.into_iter().collect();
        ids.sort();
        Self(ids)
    }
}

impl FromIterator<TaskId> for TaskIds {
    fn from_iter<I: IntoIterator<Item = TaskId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for TaskIds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(id.as_str())?;
        }
        Ok(())
    }
}

/// Remote task status as reported by the server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Queued on the server
    Waiting,
    /// Currently downloading
    Downloading,
    /// Paused by user
    Paused,
    /// Download done, moving to destination
    Finishing,
    /// Successfully completed
    Finished,
    /// Verifying torrent data
    HashChecking,
    /// Completed and seeding
    Seeding,
    /// Waiting on a file hosting slot
    FilehostingWaiting,
    /// Extracting archives
    Extracting,
    /// Failed with error
    Error,
    /// Status string not known to this client
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Parse a server status string, mapping unknown values to `Unknown`
    pub fn parse(status: &str) -> Self {
        match status {
            "waiting" => TaskStatus::Waiting,
            "downloading" => TaskStatus::Downloading,
            "paused" => TaskStatus::Paused,
            "finishing" => TaskStatus::Finishing,
            "finished" => TaskStatus::Finished,
            "hash_checking" => TaskStatus::HashChecking,
            "seeding" => TaskStatus::Seeding,
            "filehosting_waiting" => TaskStatus::FilehostingWaiting,
            "extracting" => TaskStatus::Extracting,
            "error" => TaskStatus::Error,
            _ => TaskStatus::Unknown,
        }
    }

    /// Category used by the status index and bulk actions
    pub fn category(&self) -> Option<StatusCategory> {
        match self {
            TaskStatus::Finished => Some(StatusCategory::Finished),
            TaskStatus::Error => Some(StatusCategory::Error),
            TaskStatus::Paused => Some(StatusCategory::Paused),
            TaskStatus::Waiting
            | TaskStatus::Downloading
            | TaskStatus::Finishing
            | TaskStatus::HashChecking
            | TaskStatus::Seeding
            | TaskStatus::FilehostingWaiting
            | TaskStatus::Extracting => Some(StatusCategory::Active),
            TaskStatus::Unknown => None,
        }
    }
}

/// Coarse status buckets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    /// Finished tasks
    Finished,
    /// Failed tasks
    Error,
    /// Tasks making progress or queued to
    Active,
    /// Paused tasks
    Paused,
}

/// A remote download task as held in the store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Task ID
    pub id: TaskId,
    /// Display title
    pub title: String,
    /// Task type (bt, http, ftp, emule, nzb...)
    pub kind: String,
    /// Current status
    pub status: TaskStatus,
    /// Server-side detail for error states (e.g. "broken_link")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
    /// Total size in bytes
    pub size: u64,
    /// Source URI the task was created from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Destination folder on the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Progress ratio (0.0 to 1.0)
    pub progress: f64,
    /// Current download speed in bytes per second
    pub speed_download: u64,
    /// Current upload speed in bytes per second
    pub speed_upload: u64,
    /// When the task was created on the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether a resume call makes sense for this task
    pub fn can_resume(&self) -> bool {
        matches!(self.status, TaskStatus::Paused | TaskStatus::Error)
    }
}

impl From<RawTask> for Task {
    fn from(raw: RawTask) -> Self {
        let additional = raw.additional.unwrap_or_default();
        let detail = additional.detail.unwrap_or_default();
        let transfer = additional.transfer.unwrap_or_default();

        let progress = if raw.size > 0 {
            (transfer.size_downloaded as f64 / raw.size as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Task {
            id: raw.id,
            title: raw.title,
            kind: raw.kind,
            status: TaskStatus::parse(&raw.status),
            status_detail: raw.status_extra.and_then(|extra| extra.error_detail),
            size: raw.size,
            uri: detail.uri.filter(|u| !u.is_empty()),
            destination: detail.destination.filter(|d| !d.is_empty()),
            progress,
            speed_download: transfer.speed_download,
            speed_upload: transfer.speed_upload,
            created_at: detail
                .create_time
                .filter(|t| *t > 0)
                .and_then(|t| DateTime::from_timestamp(t, 0)),
        }
    }
}

/// Task ids grouped by status category
///
/// Snapshotted before a list refresh so the new list can be diffed against it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusIndex {
    /// Finished task ids
    pub finished: HashSet<TaskId>,
    /// Failed task ids
    pub error: HashSet<TaskId>,
    /// Active task ids
    pub active: HashSet<TaskId>,
    /// Paused task ids
    pub paused: HashSet<TaskId>,
}

impl StatusIndex {
    /// Build the index from a task collection
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut index = StatusIndex::default();
        for task in tasks {
            if let Some(category) = task.status.category() {
                index.bucket_mut(category).insert(task.id.clone());
            }
        }
        index
    }

    /// Ids in the given category
    pub fn bucket(&self, category: StatusCategory) -> &HashSet<TaskId> {
        match category {
            StatusCategory::Finished => &self.finished,
            StatusCategory::Error => &self.error,
            StatusCategory::Active => &self.active,
            StatusCategory::Paused => &self.paused,
        }
    }

    fn bucket_mut(&mut self, category: StatusCategory) -> &mut HashSet<TaskId> {
        match category {
            StatusCategory::Finished => &mut self.finished,
            StatusCategory::Error => &mut self.error,
            StatusCategory::Active => &mut self.active,
            StatusCategory::Paused => &mut self.paused,
        }
    }
}

/// Aggregate transfer statistics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatistic {
    /// Total download speed in bytes per second
    pub speed_download: u64,
    /// Total upload speed in bytes per second
    pub speed_upload: u64,
}

/// Service event broadcast to subscribers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Busy counter changed
    BusyChanged {
        /// Number of guarded operations in flight
        count: usize,
    },

    /// Login state changed
    SessionChanged {
        /// Whether a session is active
        logged: bool,
    },

    /// Task list replaced from a fresh server snapshot
    TasksRefreshed {
        /// Number of tasks in the snapshot
        count: usize,
    },

    /// A background refresh after a mutation failed
    ///
    /// The store may be stale until the next successful refresh.
    RefreshFailed {
        /// The mutation that scheduled the refresh
        operation: String,
        /// Error message
        error: String,
    },
}
