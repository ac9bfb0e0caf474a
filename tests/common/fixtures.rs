//! In-memory station used by integration tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use station_link::transport::{
    CommonResponse, CreateTaskRequest, FileKind, FileList, FileListOption, FolderList,
    InfoOptions, InfoResponse, LoginRequest, LoginResponse, NewFolderList, RawTask,
    StationConfig, StationInfo, TaskList, TaskListOption, TransportResult,
};
use station_link::{
    AuthApi, ConnectionSettings, ConnectionType, DownloadApi, Endpoint, FileApi, InfoApi,
    MemoryStore, NoOpNotifier, Notifier, ServiceOptions, Settings, StationService,
    TaskIds, TaskStatistic, Transport,
};

/// Station that accepts every request and logs what it received
#[derive(Default)]
pub struct FakeStation {
    log: Mutex<Vec<String>>,
    logins: Mutex<Vec<LoginRequest>>,
    tasks: Mutex<Vec<RawTask>>,
    base_url: Mutex<String>,
    sid: Mutex<Option<String>>,
}

impl FakeStation {
    fn record(&self, entry: impl Into<String>) {
        self.log.lock().unwrap().push(entry.into());
    }

    /// Names of the calls received so far
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Number of calls named `name`
    pub fn count(&self, name: &str) -> usize {
        self.log().iter().filter(|c| c.as_str() == name).count()
    }

    /// Login requests received so far
    pub fn logins(&self) -> Vec<LoginRequest> {
        self.logins.lock().unwrap().clone()
    }

    /// Session id attached to outgoing requests
    pub fn sid(&self) -> Option<String> {
        self.sid.lock().unwrap().clone()
    }

    /// Base url requests are sent to
    pub fn base_url(&self) -> String {
        self.base_url.lock().unwrap().clone()
    }
}

impl Endpoint for FakeStation {
    fn set_base_url(&self, base_url: &str) {
        *self.base_url.lock().unwrap() = base_url.to_string();
    }

    fn set_session_id(&self, sid: Option<&str>) {
        *self.sid.lock().unwrap() = sid.map(String::from);
    }
}

#[async_trait]
impl InfoApi for FakeStation {
    async fn info(&self, _base_url: Option<&str>, _options: InfoOptions) -> TransportResult<InfoResponse> {
        self.record("info");
        Ok(InfoResponse::new())
    }
}

#[async_trait]
impl AuthApi for FakeStation {
    async fn login(
        &self,
        request: LoginRequest,
        _auth_version: Option<u32>,
        _skip_relay: bool,
    ) -> TransportResult<LoginResponse> {
        self.record("login");
        self.logins.lock().unwrap().push(request);
        Ok(LoginResponse {
            sid: "e2e-session".into(),
            did: None,
        })
    }

    async fn logout(&self) -> TransportResult<()> {
        self.record("logout");
        Ok(())
    }
}

#[async_trait]
impl FileApi for FakeStation {
    async fn list_folder(&self, _offset: u64, _limit: u64, _readonly: bool) -> TransportResult<FolderList> {
        self.record("list_folder");
        Ok(FolderList::default())
    }

    async fn list_file(
        &self,
        _folder_path: &str,
        _offset: u64,
        _limit: u64,
        _kind: FileKind,
        _additional: &[FileListOption],
    ) -> TransportResult<FileList> {
        self.record("list_file");
        Ok(FileList::default())
    }

    async fn create_folder(
        &self,
        _folder_path: &str,
        _name: &str,
        _force_parent: bool,
        _additional: &[FileListOption],
    ) -> TransportResult<NewFolderList> {
        self.record("create_folder");
        Ok(NewFolderList::default())
    }

    async fn rename_folder(
        &self,
        _folder_path: &str,
        _name: &str,
        _additional: &[FileListOption],
        _search_task_id: Option<&str>,
    ) -> TransportResult<FileList> {
        self.record("rename_folder");
        Ok(FileList::default())
    }
}

#[async_trait]
impl DownloadApi for FakeStation {
    async fn get_config(&self) -> TransportResult<StationConfig> {
        self.record("get_config");
        Ok(StationConfig::default())
    }

    async fn set_config(&self, _config: &StationConfig) -> TransportResult<()> {
        self.record("set_config");
        Ok(())
    }

    async fn get_info(&self) -> TransportResult<StationInfo> {
        self.record("get_info");
        Ok(StationInfo::default())
    }

    async fn get_statistic(&self) -> TransportResult<TaskStatistic> {
        self.record("get_statistic");
        Ok(TaskStatistic::default())
    }

    async fn list_tasks(
        &self,
        offset: u64,
        _limit: i64,
        _additional: &[TaskListOption],
    ) -> TransportResult<TaskList> {
        self.record("list_tasks");
        let tasks = self.tasks.lock().unwrap().clone();
        Ok(TaskList {
            offset,
            total: tasks.len() as u64,
            tasks,
        })
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> TransportResult<()> {
        self.record("create_task");
        self.tasks.lock().unwrap().push(RawTask {
            id: format!("dbid_{}", self.count("create_task")).into(),
            kind: "bt".into(),
            title: request.uri.clone(),
            size: 0,
            status: "waiting".into(),
            status_extra: None,
            username: None,
            additional: None,
        });
        Ok(())
    }

    async fn resume_task(&self, ids: &TaskIds) -> TransportResult<Vec<CommonResponse>> {
        self.record("resume_task");
        Ok(accepted(ids))
    }

    async fn pause_task(&self, ids: &TaskIds) -> TransportResult<Vec<CommonResponse>> {
        self.record("pause_task");
        Ok(accepted(ids))
    }

    async fn edit_task(&self, ids: &TaskIds, _destination: &str) -> TransportResult<Vec<CommonResponse>> {
        self.record("edit_task");
        Ok(accepted(ids))
    }

    async fn delete_task(&self, ids: &TaskIds, _force: bool) -> TransportResult<Vec<CommonResponse>> {
        self.record("delete_task");
        Ok(accepted(ids))
    }
}

fn accepted(ids: &TaskIds) -> Vec<CommonResponse> {
    ids.iter()
        .map(|id| CommonResponse {
            id: id.clone(),
            error: 0,
        })
        .collect()
}

/// Two-factor settings with a remembered device
pub fn two_factor_settings() -> Settings {
    Settings {
        connection: ConnectionSettings {
            connection_type: ConnectionType::TwoFactor,
            path: Some("station.lan".into()),
            port: Some(5001),
            username: Some("admin".into()),
            password: Some("secret".into()),
            enable_device_token: true,
            device_name: Some("e2e".into()),
            device_id: Some("known-device".into()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Service over an empty store and a fresh [`FakeStation`]
pub fn create_service(
    notifier: Arc<dyn Notifier>,
) -> (StationService, Arc<MemoryStore>, Arc<FakeStation>) {
    let store = Arc::new(MemoryStore::new());
    let station = Arc::new(FakeStation::default());
    let service = StationService::new(
        store.clone(),
        Transport::from_client(station.clone()),
        notifier,
        ServiceOptions::default(),
    );
    (service, store, station)
}

/// Service with a notifier that discards everything
pub fn create_silent_service() -> (StationService, Arc<MemoryStore>, Arc<FakeStation>) {
    create_service(Arc::new(NoOpNotifier))
}
