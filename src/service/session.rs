//! Session management: base URL, session id, login and logout.

use std::sync::{Arc, PoisonError};

use crate::config::{Credentials, Settings};
use crate::error::{Error, Notice, Result};
use crate::store::{Action, StoreState, selectors};
use crate::transport::{InfoOptions, InfoResponse, LoginResponse};
use crate::types::Event;

use super::StationService;
use super::loading::GuardOptions;
use super::two_factor::{login_request, should_auto_login};

/// Inputs for [`StationService::auto_login`]
#[derive(Clone, Debug)]
pub struct AutoLoginOptions {
    /// State to evaluate instead of the store's current state
    pub state: Option<Arc<StoreState>>,
    /// Settings to evaluate instead of the state's settings
    pub settings: Option<Settings>,
    /// Raise a notification when the attempt fails (default: true)
    pub notify: bool,
}

impl Default for AutoLoginOptions {
    fn default() -> Self {
        Self {
            state: None,
            settings: None,
            notify: true,
        }
    }
}

/// What an auto-login attempt did
#[derive(Debug)]
pub enum AutoLoginOutcome {
    /// A session was already active; nothing was sent
    AlreadyLoggedIn,
    /// The settings do not allow an unattended login; nothing was sent
    Skipped,
    /// The login succeeded
    LoggedIn(LoginResponse),
    /// The login was attempted and failed
    Failed(Error),
}

impl StationService {
    /// Point every sub-client at a new server
    ///
    /// Does not contact the server.
    pub fn set_base_url(&self, base_url: &str) {
        self.connection
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .base_url = base_url.to_string();
        self.transport.set_base_url(base_url);
        tracing::debug!(base_url, "Base url updated");
    }

    /// Attach (or drop) the session id on every sub-client
    pub fn set_session_id(&self, sid: Option<&str>) {
        self.connection
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .sid = sid.map(String::from);
        self.transport.set_session_id(sid);
    }

    /// Query the API listing
    ///
    /// Only requires readiness, and not even that when a candidate
    /// `base_url` is given.
    pub async fn fetch_info(&self, base_url: Option<&str>) -> Result<InfoResponse> {
        let base_url = base_url.filter(|u| !u.is_empty());
        self.ensure(GuardOptions {
            require_login: false,
            require_ready: base_url.is_none(),
        })?;

        let options = InfoOptions {
            skip_relay: self.options.skip_relay,
        };
        Ok(self.transport.info.info(base_url, options).await?)
    }

    async fn do_login(
        &self,
        credentials: Option<Credentials>,
        base_url: Option<&str>,
    ) -> Result<LoginResponse> {
        let credentials =
            credentials.unwrap_or_else(|| selectors::credentials(&self.store.state()));
        let request = login_request(&credentials, base_url)?;

        self.ensure(GuardOptions {
            require_login: false,
            require_ready: request.base_url.is_none(),
        })?;

        Ok(self
            .transport
            .auth
            .login(request, credentials.auth_version, self.options.skip_relay)
            .await?)
    }

    /// Log in and record the session
    ///
    /// Uses the stored credentials when `credentials` is `None`. Missing
    /// username/password and inconsistent two-factor parameters fail before any
    /// network call. Any failure clears the session id and the logged flag.
    pub async fn login(
        &self,
        credentials: Option<Credentials>,
        base_url: Option<&str>,
    ) -> Result<LoginResponse> {
        let remember_device = credentials
            .as_ref()
            .map(|c| c.enable_device_token)
            .unwrap_or_else(|| self.store.state().settings.connection.enable_device_token);

        match self.do_login(credentials, base_url).await {
            Ok(response) => {
                self.store.dispatch(Action::SetSid(Some(response.sid.clone())));
                self.store.dispatch(Action::SetLogged(true));
                if remember_device && let Some(did) = response.did.as_ref() {
                    self.store.dispatch(Action::SyncDeviceId(Some(did.clone())));
                }
                self.set_session_id(Some(&response.sid));
                self.emit_event(Event::SessionChanged { logged: true });
                tracing::info!("Logged in");
                Ok(response)
            }
            Err(e) => {
                self.clear_session();
                tracing::debug!(error = %e, "Login failed");
                Err(e)
            }
        }
    }

    /// Validate credentials without recording a session
    ///
    /// Same request pipeline as [`login`](Self::login) but never asks the
    /// server to remember the device and never touches the store.
    pub async fn login_test(
        &self,
        credentials: Option<Credentials>,
        base_url: Option<&str>,
    ) -> Result<LoginResponse> {
        let mut credentials =
            credentials.unwrap_or_else(|| selectors::credentials(&self.store.state()));
        credentials.enable_device_token = false;
        self.do_login(Some(credentials), base_url).await
    }

    /// Close the current session
    pub async fn logout(&self) -> Result<()> {
        self.ensure(GuardOptions::LOGGED_IN)?;
        self.transport.auth.logout().await?;
        self.clear_session();
        tracing::info!("Logged out");
        Ok(())
    }

    fn clear_session(&self) {
        let was_logged = self.store.state().logged;
        self.store.dispatch(Action::SetSid(None));
        self.store.dispatch(Action::SetLogged(false));
        self.set_session_id(None);
        if was_logged {
            self.emit_event(Event::SessionChanged { logged: false });
        }
    }

    /// Log in if the settings allow it and no session is active
    ///
    /// Never fails: a failed attempt is logged, optionally notified, and
    /// reported as [`AutoLoginOutcome::Failed`].
    pub async fn auto_login(&self, options: AutoLoginOptions) -> AutoLoginOutcome {
        let state = options.state.unwrap_or_else(|| self.store.state());
        let settings = options.settings.unwrap_or_else(|| state.settings.clone());
        tracing::debug!(logged = state.logged, "Attempting auto-login");

        if state.logged {
            return AutoLoginOutcome::AlreadyLoggedIn;
        }
        if !should_auto_login(&settings.connection) {
            return AutoLoginOutcome::Skipped;
        }

        let credentials = settings.connection.credentials();
        let result = self
            .guard(GuardOptions::READY, self.login(Some(credentials), None))
            .await;

        match result {
            Ok(response) => {
                tracing::debug!("Auto-login attempt successful");
                AutoLoginOutcome::LoggedIn(response)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Auto-login failed");
                if options.notify {
                    let url = settings.connection.url();
                    self.notifier.error(
                        Notice::new("Manual login required", format!("Auto-login failed: {e}"))
                            .with_context(Some(url).filter(|u| !u.is_empty())),
                    );
                }
                AutoLoginOutcome::Failed(e)
            }
        }
    }
}
