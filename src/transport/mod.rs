//! Transport contract: the four API groups the service talks to.
//!
//! The HTTP client itself lives in the host application. This module only
//! defines what the service needs from it:
//! - [`InfoApi`] - API discovery, usable before login
//! - [`AuthApi`] - session creation and teardown
//! - [`FileApi`] - folder browsing on the server
//! - [`DownloadApi`] - download station settings, statistics and tasks
//!
//! Every sub-client shares the same base URL and session id, fanned out by
//! [`Transport`].

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::TransportError;
use crate::types::TaskIds;

mod models;

pub use models::{
    ApiInfo, CommonResponse, CreateTaskRequest, FileEntry, FileKind, FileList, FileListOption,
    FolderList, InfoOptions, InfoResponse, LoginRequest, LoginResponse, NewFolderList,
    RawStatusExtra, RawTask, RawTaskAdditional, RawTaskDetail, RawTaskTransfer, StationConfig,
    StationInfo, TaskList, TaskListOption,
};

/// Result type for transport calls
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Connection parameters shared by every sub-client
pub trait Endpoint: Send + Sync {
    /// Point the client at a new server
    fn set_base_url(&self, base_url: &str);

    /// Attach (or drop) the session id sent with each request
    fn set_session_id(&self, sid: Option<&str>);
}

/// API discovery
#[async_trait]
pub trait InfoApi: Endpoint {
    /// Query the API listing, optionally against a candidate server
    async fn info(
        &self,
        base_url: Option<&str>,
        options: InfoOptions,
    ) -> TransportResult<InfoResponse>;
}

/// Session management
#[async_trait]
pub trait AuthApi: Endpoint {
    /// Open a session
    async fn login(
        &self,
        request: LoginRequest,
        auth_version: Option<u32>,
        skip_relay: bool,
    ) -> TransportResult<LoginResponse>;

    /// Close the current session
    async fn logout(&self) -> TransportResult<()>;
}

/// Folder browsing
#[async_trait]
pub trait FileApi: Endpoint {
    /// List shared folders
    async fn list_folder(&self, offset: u64, limit: u64, readonly: bool)
    -> TransportResult<FolderList>;

    /// List the content of a folder
    async fn list_file(
        &self,
        folder_path: &str,
        offset: u64,
        limit: u64,
        kind: FileKind,
        additional: &[FileListOption],
    ) -> TransportResult<FileList>;

    /// Create a folder
    async fn create_folder(
        &self,
        folder_path: &str,
        name: &str,
        force_parent: bool,
        additional: &[FileListOption],
    ) -> TransportResult<NewFolderList>;

    /// Rename a folder
    async fn rename_folder(
        &self,
        folder_path: &str,
        name: &str,
        additional: &[FileListOption],
        search_task_id: Option<&str>,
    ) -> TransportResult<FileList>;
}

/// Download station
#[async_trait]
pub trait DownloadApi: Endpoint {
    /// Read station settings
    async fn get_config(&self) -> TransportResult<StationConfig>;

    /// Write station settings
    async fn set_config(&self, config: &StationConfig) -> TransportResult<()>;

    /// Read station information
    async fn get_info(&self) -> TransportResult<StationInfo>;

    /// Read aggregate transfer statistics
    async fn get_statistic(&self) -> TransportResult<crate::types::TaskStatistic>;

    /// List tasks (`limit = -1` for all)
    async fn list_tasks(
        &self,
        offset: u64,
        limit: i64,
        additional: &[TaskListOption],
    ) -> TransportResult<TaskList>;

    /// Create a task
    async fn create_task(&self, request: &CreateTaskRequest) -> TransportResult<()>;

    /// Resume tasks
    async fn resume_task(&self, ids: &TaskIds) -> TransportResult<Vec<CommonResponse>>;

    /// Pause tasks
    async fn pause_task(&self, ids: &TaskIds) -> TransportResult<Vec<CommonResponse>>;

    /// Change the destination of tasks
    async fn edit_task(
        &self,
        ids: &TaskIds,
        destination: &str,
    ) -> TransportResult<Vec<CommonResponse>>;

    /// Delete tasks (`force` also removes downloaded data)
    async fn delete_task(&self, ids: &TaskIds, force: bool)
    -> TransportResult<Vec<CommonResponse>>;
}

/// The four sub-clients, configured together
#[derive(Clone)]
pub struct Transport {
    /// API discovery client
    pub info: Arc<dyn InfoApi>,
    /// Session client
    pub auth: Arc<dyn AuthApi>,
    /// Folder browsing client
    pub file: Arc<dyn FileApi>,
    /// Download station client
    pub download: Arc<dyn DownloadApi>,
}

impl Transport {
    /// Bundle four independent sub-clients
    pub fn new(
        info: Arc<dyn InfoApi>,
        auth: Arc<dyn AuthApi>,
        file: Arc<dyn FileApi>,
        download: Arc<dyn DownloadApi>,
    ) -> Self {
        Self {
            info,
            auth,
            file,
            download,
        }
    }

    /// Use a single client implementing every API group
    pub fn from_client<C>(client: Arc<C>) -> Self
    where
        C: InfoApi + AuthApi + FileApi + DownloadApi + 'static,
    {
        Self {
            info: client.clone(),
            auth: client.clone(),
            file: client.clone(),
            download: client,
        }
    }

    /// Propagate a new base URL to every sub-client
    pub fn set_base_url(&self, base_url: &str) {
        self.info.set_base_url(base_url);
        self.auth.set_base_url(base_url);
        self.file.set_base_url(base_url);
        self.download.set_base_url(base_url);
    }

    /// Propagate the session id (or its absence) to every sub-client
    pub fn set_session_id(&self, sid: Option<&str>) {
        self.info.set_session_id(sid);
        self.auth.set_session_id(sid);
        self.file.set_session_id(sid);
        self.download.set_session_id(sid);
    }
}
