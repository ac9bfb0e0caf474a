//! Shared test helpers for creating StationService instances in tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{ConnectionSettings, ServiceOptions, Settings};
use crate::error::{Notice, TransportError};
use crate::notify::Notifier;
use crate::service::StationService;
use crate::store::{Action, MemoryStore, Store};
use crate::transport::{
    AuthApi, CommonResponse, CreateTaskRequest, DownloadApi, Endpoint, FileApi, FileKind,
    FileList, FileListOption, FolderList, InfoApi, InfoOptions, InfoResponse, LoginRequest,
    LoginResponse, NewFolderList, RawTask, StationConfig, StationInfo, TaskList, TaskListOption,
    Transport, TransportResult,
};
use crate::types::{Event, Task, TaskIds, TaskStatistic};

/// One recorded transport call
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Info(Option<String>),
    Login(LoginRequest),
    Logout,
    ListFolder { readonly: bool },
    ListFile(String),
    CreateFolder(String, String),
    RenameFolder(String, String),
    GetConfig,
    SetConfig,
    GetInfo,
    GetStatistic,
    ListTasks {
        offset: u64,
        limit: i64,
        additional: Vec<TaskListOption>,
    },
    CreateTask(CreateTaskRequest),
    Resume(TaskIds),
    Pause(TaskIds),
    Edit(TaskIds, String),
    Delete(TaskIds, bool),
}

impl Call {
    /// Operation name used for scripting failures and blocks
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Call::Info(_) => "info",
            Call::Login(_) => "login",
            Call::Logout => "logout",
            Call::ListFolder { .. } => "list_folder",
            Call::ListFile(_) => "list_file",
            Call::CreateFolder(..) => "create_folder",
            Call::RenameFolder(..) => "rename_folder",
            Call::GetConfig => "get_config",
            Call::SetConfig => "set_config",
            Call::GetInfo => "get_info",
            Call::GetStatistic => "get_statistic",
            Call::ListTasks { .. } => "list_tasks",
            Call::CreateTask(_) => "create_task",
            Call::Resume(_) => "resume_task",
            Call::Pause(_) => "pause_task",
            Call::Edit(..) => "edit_task",
            Call::Delete(..) => "delete_task",
        }
    }
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    base_url: String,
    sid: Option<String>,
    login: Option<TransportResult<LoginResponse>>,
    tasks: Vec<RawTask>,
    statistic: TaskStatistic,
    failures: HashMap<&'static str, TransportError>,
    blocked: HashSet<&'static str>,
    failing_uris: HashSet<String>,
}

/// Scriptable in-memory implementation of every API group
#[derive(Default)]
pub(crate) struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record `call` and apply the scripted behaviour for its operation
    async fn enter(&self, call: Call) -> TransportResult<()> {
        let name = call.name();
        let (blocked, failure) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call);
            (
                state.blocked.contains(name),
                state.failures.get(name).cloned(),
            )
        };
        if blocked {
            futures::future::pending::<()>().await;
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub(crate) fn set_tasks(&self, tasks: Vec<RawTask>) {
        self.state.lock().unwrap().tasks = tasks;
    }

    pub(crate) fn set_statistic(&self, statistic: TaskStatistic) {
        self.state.lock().unwrap().statistic = statistic;
    }

    pub(crate) fn set_login(&self, result: TransportResult<LoginResponse>) {
        self.state.lock().unwrap().login = Some(result);
    }

    pub(crate) fn fail(&self, operation: &'static str, error: TransportError) {
        self.state.lock().unwrap().failures.insert(operation, error);
    }

    pub(crate) fn recover(&self, operation: &'static str) {
        self.state.lock().unwrap().failures.remove(operation);
    }

    pub(crate) fn fail_uri(&self, uri: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_uris
            .insert(uri.to_string());
    }

    /// Make every call to `operation` pend forever
    pub(crate) fn block(&self, operation: &'static str) {
        self.state.lock().unwrap().blocked.insert(operation);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.name() == operation)
            .count()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub(crate) fn base_url(&self) -> String {
        self.state.lock().unwrap().base_url.clone()
    }

    pub(crate) fn sid(&self) -> Option<String> {
        self.state.lock().unwrap().sid.clone()
    }

    fn ok_responses(ids: &TaskIds) -> Vec<CommonResponse> {
        ids.iter()
            .map(|id| CommonResponse {
                id: id.clone(),
                error: 0,
            })
            .collect()
    }
}

impl Endpoint for MockTransport {
    fn set_base_url(&self, base_url: &str) {
        self.state.lock().unwrap().base_url = base_url.to_string();
    }

    fn set_session_id(&self, sid: Option<&str>) {
        self.state.lock().unwrap().sid = sid.map(String::from);
    }
}

#[async_trait]
impl InfoApi for MockTransport {
    async fn info(
        &self,
        base_url: Option<&str>,
        _options: InfoOptions,
    ) -> TransportResult<InfoResponse> {
        self.enter(Call::Info(base_url.map(String::from))).await?;
        Ok(InfoResponse::new())
    }
}

#[async_trait]
impl AuthApi for MockTransport {
    async fn login(
        &self,
        request: LoginRequest,
        _auth_version: Option<u32>,
        _skip_relay: bool,
    ) -> TransportResult<LoginResponse> {
        self.enter(Call::Login(request)).await?;
        self.state
            .lock()
            .unwrap()
            .login
            .clone()
            .unwrap_or_else(|| {
                Ok(LoginResponse {
                    sid: "sid-1".into(),
                    did: None,
                })
            })
    }

    async fn logout(&self) -> TransportResult<()> {
        self.enter(Call::Logout).await
    }
}

#[async_trait]
impl FileApi for MockTransport {
    async fn list_folder(
        &self,
        _offset: u64,
        _limit: u64,
        readonly: bool,
    ) -> TransportResult<FolderList> {
        self.enter(Call::ListFolder { readonly }).await?;
        Ok(FolderList::default())
    }

    async fn list_file(
        &self,
        folder_path: &str,
        _offset: u64,
        _limit: u64,
        _kind: FileKind,
        _additional: &[FileListOption],
    ) -> TransportResult<FileList> {
        self.enter(Call::ListFile(folder_path.to_string())).await?;
        Ok(FileList::default())
    }

    async fn create_folder(
        &self,
        folder_path: &str,
        name: &str,
        _force_parent: bool,
        _additional: &[FileListOption],
    ) -> TransportResult<NewFolderList> {
        self.enter(Call::CreateFolder(folder_path.to_string(), name.to_string()))
            .await?;
        Ok(NewFolderList::default())
    }

    async fn rename_folder(
        &self,
        folder_path: &str,
        name: &str,
        _additional: &[FileListOption],
        _search_task_id: Option<&str>,
    ) -> TransportResult<FileList> {
        self.enter(Call::RenameFolder(folder_path.to_string(), name.to_string()))
            .await?;
        Ok(FileList::default())
    }
}

#[async_trait]
impl DownloadApi for MockTransport {
    async fn get_config(&self) -> TransportResult<StationConfig> {
        self.enter(Call::GetConfig).await?;
        Ok(StationConfig::default())
    }

    async fn set_config(&self, _config: &StationConfig) -> TransportResult<()> {
        self.enter(Call::SetConfig).await
    }

    async fn get_info(&self) -> TransportResult<StationInfo> {
        self.enter(Call::GetInfo).await?;
        Ok(StationInfo::default())
    }

    async fn get_statistic(&self) -> TransportResult<TaskStatistic> {
        self.enter(Call::GetStatistic).await?;
        Ok(self.state.lock().unwrap().statistic)
    }

    async fn list_tasks(
        &self,
        offset: u64,
        limit: i64,
        additional: &[TaskListOption],
    ) -> TransportResult<TaskList> {
        self.enter(Call::ListTasks {
            offset,
            limit,
            additional: additional.to_vec(),
        })
        .await?;
        let tasks = self.state.lock().unwrap().tasks.clone();
        Ok(TaskList {
            offset,
            total: tasks.len() as u64,
            tasks,
        })
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> TransportResult<()> {
        self.enter(Call::CreateTask(request.clone())).await?;
        if self.state.lock().unwrap().failing_uris.contains(&request.uri) {
            return Err(TransportError::Api {
                code: 400,
                message: Some("invalid uri".into()),
            });
        }
        Ok(())
    }

    async fn resume_task(&self, ids: &TaskIds) -> TransportResult<Vec<CommonResponse>> {
        self.enter(Call::Resume(ids.clone())).await?;
        Ok(Self::ok_responses(ids))
    }

    async fn pause_task(&self, ids: &TaskIds) -> TransportResult<Vec<CommonResponse>> {
        self.enter(Call::Pause(ids.clone())).await?;
        Ok(Self::ok_responses(ids))
    }

    async fn edit_task(
        &self,
        ids: &TaskIds,
        destination: &str,
    ) -> TransportResult<Vec<CommonResponse>> {
        self.enter(Call::Edit(ids.clone(), destination.to_string()))
            .await?;
        Ok(Self::ok_responses(ids))
    }

    async fn delete_task(
        &self,
        ids: &TaskIds,
        force: bool,
    ) -> TransportResult<Vec<CommonResponse>> {
        self.enter(Call::Delete(ids.clone(), force)).await?;
        Ok(Self::ok_responses(ids))
    }
}

/// One notification received by [`RecordingNotifier`]
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Notification {
    Created {
        uri: String,
        source: Option<String>,
        destination: Option<String>,
    },
    Finished(String),
    Failed(String),
    LoginRequired,
    Error(Notice),
}

/// Notifier that keeps everything it receives
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn received(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }

    pub(crate) fn clear(&self) {
        self.received.lock().unwrap().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn task_created(&self, uri: &str, source: Option<&str>, destination: Option<&str>) {
        self.received.lock().unwrap().push(Notification::Created {
            uri: uri.to_string(),
            source: source.map(String::from),
            destination: destination.map(String::from),
        });
    }

    fn task_finished(&self, task: &Task) {
        self.received
            .lock()
            .unwrap()
            .push(Notification::Finished(task.id.to_string()));
    }

    fn task_error(&self, task: &Task) {
        self.received
            .lock()
            .unwrap()
            .push(Notification::Failed(task.id.to_string()));
    }

    fn login_required(&self) {
        self.received
            .lock()
            .unwrap()
            .push(Notification::LoginRequired);
    }

    fn error(&self, notice: Notice) {
        self.received.lock().unwrap().push(Notification::Error(notice));
    }
}

/// Everything a service test needs to drive and observe the service
pub(crate) struct TestContext {
    pub(crate) service: StationService,
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) transport: Arc<MockTransport>,
    pub(crate) notifier: Arc<RecordingNotifier>,
}

/// Settings pointing at a reachable server with stored credentials
pub(crate) fn test_settings() -> Settings {
    Settings {
        connection: ConnectionSettings {
            path: Some("nas.local".into()),
            port: Some(5001),
            username: Some("admin".into()),
            password: Some("secret".into()),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub(crate) fn raw_task(id: &str, status: &str) -> RawTask {
    RawTask {
        id: id.into(),
        kind: "bt".into(),
        title: format!("task {id}"),
        size: 1024,
        status: status.into(),
        status_extra: None,
        username: Some("admin".into()),
        additional: None,
    }
}

/// Build a service over `settings` without calling `init`
pub(crate) fn create_uninitialized_service(settings: Settings) -> TestContext {
    let store = Arc::new(MemoryStore::with_settings(settings));
    let transport = MockTransport::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let service = StationService::new(
        store.clone(),
        Transport::from_client(transport.clone()),
        notifier.clone(),
        ServiceOptions::default(),
    );
    TestContext {
        service,
        store,
        transport,
        notifier,
    }
}

/// Initialized service, ready but logged out
pub(crate) fn create_test_service() -> TestContext {
    let ctx = create_uninitialized_service(test_settings());
    ctx.service.init().unwrap();
    ctx
}

/// Initialized service with an active session
pub(crate) fn create_logged_in_service() -> TestContext {
    let ctx = create_uninitialized_service(test_settings());
    ctx.store.dispatch(Action::SetSid(Some("sid-0".into())));
    ctx.store.dispatch(Action::SetLogged(true));
    ctx.service.init().unwrap();
    ctx
}

/// Load `tasks` into the mock and into the store
pub(crate) async fn seed_tasks(ctx: &TestContext, tasks: Vec<RawTask>) {
    ctx.transport.set_tasks(tasks);
    ctx.service.list_tasks().await.unwrap();
    ctx.transport.clear_calls();
    ctx.notifier.clear();
}

/// Wait for the first event matching `predicate`
pub(crate) async fn wait_for_event(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    predicate: impl Fn(&Event) -> bool,
) -> Event {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = rx.recv().await.unwrap();
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Poll `condition` until it holds
pub(crate) async fn wait_until(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for condition");
}
