//! Service lifecycle: init, dispose and the store watcher.

use std::sync::{PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::store::{StoreState, selectors};
use crate::transport::Transport;

use super::{ConnectionState, StationService};

/// Connection parameters as last derived from the store
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Derived {
    base_url: String,
    sid: Option<String>,
}

impl Derived {
    fn from_state(state: &StoreState) -> Self {
        Self {
            base_url: selectors::url(state),
            sid: state.sid.clone(),
        }
    }
}

fn apply_base_url(transport: &Transport, connection: &RwLock<ConnectionState>, base_url: &str) {
    tracing::debug!(base_url, "Base url changed");
    connection
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .base_url = base_url.to_string();
    transport.set_base_url(base_url);
}

fn apply_sid(transport: &Transport, connection: &RwLock<ConnectionState>, sid: Option<&str>) {
    connection.write().unwrap_or_else(PoisonError::into_inner).sid = sid.map(String::from);
    transport.set_session_id(sid);
}

/// Forward the store-derived values that changed since `last`
///
/// Only store changes are forwarded, so a value set directly through
/// [`StationService::set_base_url`] or [`StationService::set_session_id`]
/// survives unrelated dispatches.
fn propagate(
    transport: &Transport,
    connection: &RwLock<ConnectionState>,
    last: &mut Derived,
    next: Derived,
) {
    if last.base_url != next.base_url {
        apply_base_url(transport, connection, &next.base_url);
    }
    if last.sid != next.sid {
        apply_sid(transport, connection, next.sid.as_deref());
    }
    *last = next;
}

impl StationService {
    /// Configure the transport from the store and follow later store changes
    ///
    /// Calling `init` again replaces the previous watcher. Fails with
    /// [`Error::Disposed`] after [`dispose`](Self::dispose).
    pub fn init(&self) -> Result<()> {
        if self.shutdown.is_cancelled() {
            return Err(Error::Disposed);
        }

        let mut rx = self.store.watch();
        let mut last = Derived::from_state(&rx.borrow_and_update());
        apply_base_url(&self.transport, &self.connection, &last.base_url);
        apply_sid(&self.transport, &self.connection, last.sid.as_deref());
        tracing::debug!(
            base_url = %self.base_url(),
            logged = self.is_logged_in(),
            "Station service initialized"
        );

        let transport = self.transport.clone();
        let connection = self.connection.clone();
        let shutdown = self.shutdown.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let next = Derived::from_state(&rx.borrow_and_update());
                        propagate(&transport, &connection, &mut last, next);
                    }
                }
            }
            tracing::debug!("Store watcher stopped");
        });

        let previous = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
        Ok(())
    }

    /// Stop the store watcher and every pending background refresh
    ///
    /// Idempotent. Every guarded operation fails with [`Error::Disposed`]
    /// afterwards.
    pub fn dispose(&self) {
        self.shutdown.cancel();
        let watcher = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(watcher) = watcher {
            watcher.abort();
        }
        tracing::debug!("Station service disposed");
    }

    /// Whether [`dispose`](Self::dispose) was called
    pub fn is_disposed(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}
