//! State store contract and an in-memory implementation.
//!
//! The service never mutates shared state in place: it reads snapshots through
//! [`Store::state`] and writes through [`Store::dispatch`], which applies one
//! [`Action`] at a time.

use std::sync::Arc;
use tokio::sync::watch;

use crate::config::Settings;
use crate::types::{Task, TaskIds, TaskStatistic, TaskStatus};

pub mod selectors;

/// Everything the service reads from the store
#[derive(Clone, Debug, Default)]
pub struct StoreState {
    /// Persisted settings
    pub settings: Settings,
    /// Current session id
    pub sid: Option<String>,
    /// Whether a login call confirmed the session
    pub logged: bool,
    /// Last task snapshot from the server
    pub tasks: Vec<Task>,
    /// Last transfer statistics
    pub stats: Option<TaskStatistic>,
    /// Statuses shown by the host's current view (`None` = everything)
    pub status_filter: Option<Vec<TaskStatus>>,
    /// Recently used destinations, most recent first
    pub destination_history: Vec<String>,
    /// Number of guarded operations in flight
    pub loading: usize,
}

/// State transitions accepted by [`Store::dispatch`]
#[derive(Clone, Debug)]
pub enum Action {
    /// Replace the settings
    SetSettings(Settings),
    /// Set or clear the session id
    SetSid(Option<String>),
    /// Set the logged flag
    SetLogged(bool),
    /// Store the device token returned by a two-factor enrollment
    SyncDeviceId(Option<String>),
    /// Replace the task collection
    SetTasks(Vec<Task>),
    /// Store transfer statistics
    SetTaskStats(TaskStatistic),
    /// Remove tasks from the collection
    SpliceTasks(TaskIds),
    /// Remember a destination
    AddDestinationHistory(String),
    /// Set the status filter of the host's current view
    SetStatusFilter(Option<Vec<TaskStatus>>),
    /// One more guarded operation in flight
    AddLoading,
    /// One guarded operation finished
    RemoveLoading,
}

impl StoreState {
    /// Apply a single action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetSettings(settings) => self.settings = settings,
            Action::SetSid(sid) => self.sid = sid.filter(|s| !s.is_empty()),
            Action::SetLogged(logged) => self.logged = logged,
            Action::SyncDeviceId(device_id) => self.settings.connection.device_id = device_id,
            Action::SetTasks(tasks) => self.tasks = tasks,
            Action::SetTaskStats(stats) => self.stats = Some(stats),
            Action::SpliceTasks(ids) => self.tasks.retain(|t| !ids.contains(&t.id)),
            Action::AddDestinationHistory(destination) => {
                self.destination_history.retain(|d| d != &destination);
                self.destination_history.insert(0, destination);
                self.destination_history
                    .truncate(self.settings.destination_history_limit);
            }
            Action::SetStatusFilter(filter) => self.status_filter = filter,
            Action::AddLoading => self.loading += 1,
            Action::RemoveLoading => self.loading = self.loading.saturating_sub(1),
        }
    }
}

/// Read and write access to shared application state
///
/// Implementations must apply dispatched actions one at a time.
pub trait Store: Send + Sync {
    /// Current state snapshot
    fn state(&self) -> Arc<StoreState>;

    /// Apply an action
    fn dispatch(&self, action: Action);

    /// Receive the state after every dispatch
    fn watch(&self) -> watch::Receiver<Arc<StoreState>>;
}

/// In-memory store backed by a watch channel
///
/// The channel holds the current state, so dispatch and change notification
/// happen under the same lock.
pub struct MemoryStore {
    state_tx: watch::Sender<Arc<StoreState>>,
}

impl MemoryStore {
    /// Create a store with default state
    pub fn new() -> Self {
        Self::with_state(StoreState::default())
    }

    /// Create a store with the given settings
    pub fn with_settings(settings: Settings) -> Self {
        Self::with_state(StoreState {
            settings,
            ..Default::default()
        })
    }

    /// Create a store from a full state
    pub fn with_state(state: StoreState) -> Self {
        let (state_tx, _rx) = watch::channel(Arc::new(state));
        Self { state_tx }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn state(&self) -> Arc<StoreState> {
        self.state_tx.borrow().clone()
    }

    fn dispatch(&self, action: Action) {
        self.state_tx
            .send_modify(|state| Arc::make_mut(state).apply(action));
    }

    fn watch(&self) -> watch::Receiver<Arc<StoreState>> {
        self.state_tx.subscribe()
    }
}
