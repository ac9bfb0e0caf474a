//! Guarded operations and the shared busy counter.
//!
//! Every guarded operation checks readiness and login before touching the
//! network, then holds a [`LoadingGuard`] for its whole lifetime. The guard
//! releases its increment on drop, so the counter returns to its previous value
//! on success, failure and cancellation alike.

use std::future::Future;
use std::sync::Arc;

use futures::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::error::{Error, Result};
use crate::store::{Action, Store};
use crate::types::Event;

use super::StationService;

/// Preconditions checked before a guarded operation starts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardOptions {
    /// Fail with [`Error::NotLoggedIn`] when no session is active (default: true)
    pub require_login: bool,
    /// Fail with [`Error::NotReady`] when no base URL is configured (default: true)
    pub require_ready: bool,
}

impl GuardOptions {
    /// Readiness and login
    pub const LOGGED_IN: Self = Self {
        require_login: true,
        require_ready: true,
    };

    /// Readiness only
    pub const READY: Self = Self {
        require_login: false,
        require_ready: true,
    };

    /// No precondition
    pub const NONE: Self = Self {
        require_login: false,
        require_ready: false,
    };
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self::LOGGED_IN
    }
}

/// One increment of the busy counter, released on drop
#[must_use = "the busy counter is decremented as soon as the guard is dropped"]
pub struct LoadingGuard {
    store: Arc<dyn Store>,
    event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl LoadingGuard {
    fn acquire(store: Arc<dyn Store>, event_tx: tokio::sync::broadcast::Sender<Event>) -> Self {
        store.dispatch(Action::AddLoading);
        let count = store.state().loading;
        event_tx.send(Event::BusyChanged { count }).ok();
        Self { store, event_tx }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.store.dispatch(Action::RemoveLoading);
        let count = self.store.state().loading;
        self.event_tx.send(Event::BusyChanged { count }).ok();
    }
}

impl std::fmt::Debug for LoadingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingGuard").finish_non_exhaustive()
    }
}

impl StationService {
    /// Check preconditions without touching the busy counter
    pub fn ensure(&self, options: GuardOptions) -> Result<()> {
        if self.shutdown.is_cancelled() {
            return Err(Error::Disposed);
        }
        if options.require_ready && !self.is_ready() {
            return Err(Error::NotReady);
        }
        if options.require_login && !self.is_logged_in() {
            return Err(Error::NotLoggedIn);
        }
        Ok(())
    }

    /// Check preconditions and take one busy-counter increment
    ///
    /// The counter is left untouched when a precondition fails.
    pub fn begin_loading(&self, options: GuardOptions) -> Result<LoadingGuard> {
        self.ensure(options)?;
        Ok(LoadingGuard::acquire(
            self.store.clone(),
            self.event_tx.clone(),
        ))
    }

    /// Run `operation` under the guard
    ///
    /// Preconditions are checked before `operation` is first polled. If the
    /// returned future is dropped mid-flight, the increment is still released.
    pub async fn guard<F, T>(&self, options: GuardOptions, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let _loading = self.begin_loading(options)?;
        operation.await
    }

    /// Number of guarded operations in flight
    pub fn busy_count(&self) -> usize {
        self.store.state().loading
    }

    /// Stream of busy-counter values, one per change, until the service is dropped
    pub fn busy_stream(&self) -> impl Stream<Item = usize> + Send + 'static {
        BroadcastStream::new(self.subscribe()).filter_map(|event| match event {
            Ok(Event::BusyChanged { count }) => Some(count),
            _ => None,
        })
    }
}
