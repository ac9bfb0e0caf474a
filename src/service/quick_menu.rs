//! Destination resolution for tasks created from a context action.
//!
//! The service never opens UI itself. When the user has to confirm or pick a
//! destination, the resolution says so and the host calls back with
//! [`StationService::choose_quick_menu`] or [`StationService::create_task`].

use crate::config::QuickMenu;
use crate::error::{Error, Result};
use crate::store::selectors;

use super::StationService;
use super::tasks::NewTask;

/// A pending task creation request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// URI to download
    pub uri: String,
    /// Page the URI was found on
    pub source: Option<String>,
    /// Requested destination folder
    pub destination: Option<String>,
}

impl TaskForm {
    /// Form for `uri` with no source and no destination
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    fn with_entry(&self, entry: &QuickMenu) -> Self {
        Self {
            destination: entry.destination.clone().filter(|d| !d.is_empty()),
            ..self.clone()
        }
    }

    fn to_task(&self) -> NewTask {
        NewTask {
            uri: self.uri.clone(),
            source: self.source.clone(),
            destination: self.destination.clone(),
            ..Default::default()
        }
    }
}

/// What resolving a quick-menu request led to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuickMenuResolution {
    /// The task was created
    Created,
    /// The host must show the task dialog pre-filled with this form
    ConfirmationRequired(TaskForm),
    /// The host must let the user pick one of `entries`
    ChoiceRequired {
        /// The request awaiting a destination
        form: TaskForm,
        /// Candidate entries
        entries: Vec<QuickMenu>,
    },
}

impl StationService {
    /// Resolve a task request against the candidate quick-menu entries
    ///
    /// `entries` defaults to the entries in the settings. No entry creates the
    /// task with the form's own destination; a single entry is applied
    /// directly; several entries defer to the user.
    pub async fn resolve_quick_menu(
        &self,
        form: TaskForm,
        entries: Option<&[QuickMenu]>,
    ) -> Result<QuickMenuResolution> {
        if form.uri.trim().is_empty() {
            return Err(Error::validation("uri", "a URI is required to create a task"));
        }

        let state = self.store.state();
        let entries = entries.unwrap_or_else(|| selectors::quick_menus(&state));

        match entries {
            [] => {
                self.create_task(form.to_task()).await?;
                Ok(QuickMenuResolution::Created)
            }
            [entry] => self.choose_quick_menu(form, entry).await,
            many => {
                tracing::debug!(count = many.len(), "Quick menu choice required");
                Ok(QuickMenuResolution::ChoiceRequired {
                    form,
                    entries: many.to_vec(),
                })
            }
        }
    }

    /// Apply a single quick-menu entry to a task request
    ///
    /// The entry's destination replaces the form's, so an entry without one
    /// sends the task to the server's default folder. Creates the task unless
    /// the entry asks for confirmation first.
    pub async fn choose_quick_menu(
        &self,
        form: TaskForm,
        entry: &QuickMenu,
    ) -> Result<QuickMenuResolution> {
        let form = form.with_entry(entry);
        if entry.modal {
            return Ok(QuickMenuResolution::ConfirmationRequired(form));
        }
        self.create_task(form.to_task()).await?;
        Ok(QuickMenuResolution::Created)
    }
}
