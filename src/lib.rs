//! # station-link
//!
//! Session and task orchestration core for download station clients.
//!
//! ## Design Philosophy
//!
//! station-link is designed to be:
//! - **Transport-agnostic** - The HTTP client is supplied by the host through four small traits
//! - **Store-driven** - Settings, session and tasks live in a [`Store`] the host can observe
//! - **Guarded** - Every network-bound operation checks readiness and login first
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use station_link::{
//!     LogNotifier, MemoryStore, ServiceOptions, Settings, StationService, Transport,
//! };
//!
//! async fn run(transport: Transport) -> station_link::Result<()> {
//!     let settings = Settings::load("settings.json")?;
//!     let service = StationService::new(
//!         Arc::new(MemoryStore::with_settings(settings)),
//!         transport,
//!         Arc::new(LogNotifier),
//!         ServiceOptions::default(),
//!     );
//!
//!     // Copy url and session id from the store, then follow its changes
//!     service.init()?;
//!     service.auto_login(Default::default()).await;
//!
//!     // Subscribe to events
//!     let mut events = service.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let list = service.list_tasks().await?;
//!     println!("{} tasks on the station", list.total);
//!
//!     service.dispose();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Notification sink
pub mod notify;
/// Session and task orchestration (decomposed into focused submodules)
pub mod service;
/// Application state store and selectors
pub mod store;
/// Transport contract
pub mod transport;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{
    ActionScope, ConnectionSettings, ConnectionType, Credentials, Protocol, QuickMenu,
    ServiceOptions, Settings,
};
pub use error::{Error, Notice, Result, TransportError};
pub use notify::{LogNotifier, NoOpNotifier, Notifier};
pub use service::{
    AutoLoginOptions, AutoLoginOutcome, BatchOutcome, DownloadItem, GuardOptions,
    InterceptOptions, LoadingGuard, LocalDownloads, NewTask, QuickMenuResolution, StationService,
    TaskForm,
};
pub use store::{Action, MemoryStore, Store, StoreState};
pub use transport::{AuthApi, DownloadApi, Endpoint, FileApi, InfoApi, Transport};
pub use types::{Event, StatusCategory, Task, TaskId, TaskIds, TaskStatistic, TaskStatus};
