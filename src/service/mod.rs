//! Session and task orchestration service split into focused submodules.
//!
//! The `StationService` struct and its methods are organized by domain:
//! - [`loading`] - Readiness/login guard and the shared busy counter
//! - [`two_factor`] - Pure login request shaping and the auto-login decision
//! - [`session`] - Login, logout, auto-login and the info request
//! - [`tasks`] - Task mutations, list refresh and transition notifications
//! - [`files`] - Folder browsing and station settings pass-through
//! - [`quick_menu`] - Destination resolution for context-menu task creation
//! - [`intercept`] - Hand-off of local browser downloads to the server
//! - [`lifecycle`] - Init, dispose and the store watcher

mod files;
mod intercept;
mod lifecycle;
mod loading;
mod quick_menu;
mod session;
mod tasks;
pub mod two_factor;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use intercept::{DownloadItem, InterceptOptions, LocalDownloads};
pub use loading::{GuardOptions, LoadingGuard};
pub use quick_menu::{QuickMenuResolution, TaskForm};
pub use session::{AutoLoginOptions, AutoLoginOutcome};
pub use tasks::{BatchOutcome, NewTask};

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ServiceOptions;
use crate::notify::Notifier;
use crate::store::Store;
use crate::transport::Transport;
use crate::types::Event;

/// Connection parameters last propagated to the transport
#[derive(Debug, Default)]
pub(crate) struct ConnectionState {
    pub(crate) base_url: String,
    pub(crate) sid: Option<String>,
}

/// Main service instance (cloneable - all fields are Arc-wrapped)
///
/// Holds the explicit context every operation runs against: the store, the
/// transport, the notification sink and the event channel. Nothing is kept in
/// process-wide statics.
#[derive(Clone)]
pub struct StationService {
    /// Shared application state
    pub(crate) store: Arc<dyn Store>,
    /// The four API sub-clients
    pub(crate) transport: Transport,
    /// User-visible notification sink
    pub(crate) notifier: Arc<dyn Notifier>,
    /// Base URL and session id currently configured on the transport
    pub(crate) connection: Arc<RwLock<ConnectionState>>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Service options
    pub(crate) options: Arc<ServiceOptions>,
    /// Cancelled on dispose; stops the store watcher and background refreshes
    pub(crate) shutdown: tokio_util::sync::CancellationToken,
    /// Store watcher spawned by `init`
    pub(crate) watcher: Arc<std::sync::Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl StationService {
    /// Create a new service around the given collaborators
    ///
    /// The service is inert until [`init`](Self::init) copies the base URL and
    /// session id from the store into the transport.
    pub fn new(
        store: Arc<dyn Store>,
        transport: Transport,
        notifier: Arc<dyn Notifier>,
        options: ServiceOptions,
    ) -> Self {
        let (event_tx, _rx) = tokio::sync::broadcast::channel(options.event_capacity.max(1));

        Self {
            store,
            transport,
            notifier,
            connection: Arc::new(RwLock::new(ConnectionState::default())),
            event_tx,
            options: Arc::new(options),
            shutdown: tokio_util::sync::CancellationToken::new(),
            watcher: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// Subscribe to service events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events
    /// independently until it drops its receiver.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// The store this service reads and writes
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Base URL currently configured on the transport
    pub fn base_url(&self) -> String {
        self.connection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .base_url
            .clone()
    }

    /// Whether a base URL is configured
    pub fn is_ready(&self) -> bool {
        !self
            .connection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .base_url
            .is_empty()
    }

    /// Whether the store reports an active session
    pub fn is_logged_in(&self) -> bool {
        self.store.state().logged
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers, the event is silently dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
