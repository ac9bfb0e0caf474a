//! Request and response shapes exchanged with the transport.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::TaskId;

/// Login request handed to [`AuthApi::login`](super::AuthApi::login)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account name
    pub account: String,
    /// Account password
    pub passwd: String,
    /// Server to log into instead of the configured base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// One-time code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_code: Option<String>,
    /// `"yes"` when enrolling this device for token login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_device_token: Option<String>,
    /// Device name for enrollment or token login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    /// Device token from a previous enrollment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// Successful login payload
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session id
    pub sid: String,
    /// Device token, returned when enrollment was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did: Option<String>,
}

/// One entry of the API info listing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    /// CGI path serving the API
    pub path: String,
    /// Lowest supported version
    pub min_version: u32,
    /// Highest supported version
    pub max_version: u32,
}

/// API info listing keyed by API name
pub type InfoResponse = HashMap<String, ApiInfo>;

/// Options for the info request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InfoOptions {
    /// Bypass the relay when probing
    pub skip_relay: bool,
}

/// Per-task result of a mutating call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonResponse {
    /// Task ID
    pub id: TaskId,
    /// Server error code (0 = success)
    #[serde(default)]
    pub error: i64,
}

/// Extra fields requested from the task list endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskListOption {
    /// Destination, uri, creation time
    Detail,
    /// Per-file breakdown
    File,
    /// Transfer counters and speeds
    Transfer,
    /// Torrent trackers
    Tracker,
    /// Torrent peers
    Peer,
}

/// Raw task entry returned by the list endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawTask {
    /// Task ID
    pub id: TaskId,
    /// Task type
    #[serde(rename = "type")]
    pub kind: String,
    /// Display title
    pub title: String,
    /// Total size in bytes
    #[serde(default)]
    pub size: u64,
    /// Status string
    pub status: String,
    /// Extra status information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_extra: Option<RawStatusExtra>,
    /// Owner of the task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Fields requested through [`TaskListOption`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<RawTaskAdditional>,
}

/// Extra status information
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatusExtra {
    /// Error detail for failed tasks
    #[serde(default)]
    pub error_detail: Option<String>,
}

/// Optional task fields
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTaskAdditional {
    /// Detail fields
    #[serde(default)]
    pub detail: Option<RawTaskDetail>,
    /// Transfer fields
    #[serde(default)]
    pub transfer: Option<RawTaskTransfer>,
}

/// Detail fields of a raw task
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTaskDetail {
    /// Destination folder
    #[serde(default)]
    pub destination: Option<String>,
    /// Source URI
    #[serde(default)]
    pub uri: Option<String>,
    /// Creation time (unix seconds)
    #[serde(default)]
    pub create_time: Option<i64>,
}

/// Transfer fields of a raw task
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTaskTransfer {
    /// Bytes downloaded
    #[serde(default)]
    pub size_downloaded: u64,
    /// Bytes uploaded
    #[serde(default)]
    pub size_uploaded: u64,
    /// Download speed in bytes per second
    #[serde(default)]
    pub speed_download: u64,
    /// Upload speed in bytes per second
    #[serde(default)]
    pub speed_upload: u64,
}

/// Task list page
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    /// Offset of the page
    #[serde(default)]
    pub offset: u64,
    /// Total number of tasks on the server
    #[serde(default)]
    pub total: u64,
    /// Tasks in the page
    #[serde(default)]
    pub tasks: Vec<RawTask>,
}

/// Task creation request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// URI to download (http, ftp, magnet, ...)
    pub uri: String,
    /// Destination folder (server default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Account for the remote source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password for the remote source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Password for archives to extract after download
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unzip_password: Option<String>,
}

/// Download station settings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Default destination folder
    #[serde(default)]
    pub default_destination: Option<String>,
    /// Whether emule is enabled
    #[serde(default)]
    pub emule_enabled: Option<bool>,
    /// Whether unzip-after-download is enabled
    #[serde(default)]
    pub unzip_service_enabled: Option<bool>,
    /// Remaining settings as returned by the server
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Download station information
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationInfo {
    /// Build number
    #[serde(default)]
    pub version: u32,
    /// Version label
    #[serde(default)]
    pub version_string: String,
    /// Whether the session user manages the station
    #[serde(default)]
    pub is_manager: bool,
}

/// Extra fields requested from the file endpoints
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileListOption {
    /// Permissions
    Perm,
    /// Real path
    #[serde(rename = "real_path")]
    RealPath,
    /// Size
    Size,
    /// Timestamps
    Time,
}

/// Entries returned by [`FileApi::list_file`](super::FileApi::list_file)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Files and folders
    All,
    /// Folders only
    #[default]
    Dir,
}

/// A file or folder on the server
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Absolute path
    pub path: String,
    /// Name
    pub name: String,
    /// Whether the entry is a folder
    #[serde(default)]
    pub isdir: bool,
}

/// Shared folder listing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderList {
    /// Offset of the page
    #[serde(default)]
    pub offset: u64,
    /// Total number of shares
    #[serde(default)]
    pub total: u64,
    /// Shared folders
    #[serde(default)]
    pub shares: Vec<FileEntry>,
}

/// Folder content listing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileList {
    /// Offset of the page
    #[serde(default)]
    pub offset: u64,
    /// Total number of entries
    #[serde(default)]
    pub total: u64,
    /// Entries
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Result of a folder creation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFolderList {
    /// Created folders
    #[serde(default)]
    pub folders: Vec<FileEntry>,
}
