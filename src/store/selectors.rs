//! Derived reads over [`StoreState`].

use std::collections::HashSet;

use crate::config::{ActionScope, Credentials, QuickMenu};
use crate::store::StoreState;
use crate::types::{StatusCategory, StatusIndex, Task, TaskId};

/// Base URL derived from the connection settings
pub fn url(state: &StoreState) -> String {
    state.settings.connection.url()
}

/// Credentials derived from the connection settings
pub fn credentials(state: &StoreState) -> Credentials {
    state.settings.connection.credentials()
}

/// Task ids grouped by status category
pub fn tasks_ids_by_status_type(state: &StoreState) -> StatusIndex {
    StatusIndex::from_tasks(&state.tasks)
}

/// Tasks a bulk action targets under the configured action scope
pub fn tasks_by_action_scope(state: &StoreState) -> impl Iterator<Item = &Task> {
    let filter = match state.settings.global.actions {
        ActionScope::All => None,
        ActionScope::Visible => state.status_filter.as_deref(),
    };
    state
        .tasks
        .iter()
        .filter(move |t| filter.is_none_or(|statuses| statuses.contains(&t.status)))
}

/// Every task id under the action scope
pub fn tasks_ids_by_action_scope(state: &StoreState) -> HashSet<TaskId> {
    tasks_by_action_scope(state).map(|t| t.id.clone()).collect()
}

fn ids_in_categories(state: &StoreState, categories: &[StatusCategory]) -> HashSet<TaskId> {
    tasks_by_action_scope(state)
        .filter(|t| t.status.category().is_some_and(|c| categories.contains(&c)))
        .map(|t| t.id.clone())
        .collect()
}

/// Paused task ids under the action scope
pub fn paused_tasks_ids_by_action_scope(state: &StoreState) -> HashSet<TaskId> {
    ids_in_categories(state, &[StatusCategory::Paused])
}

/// Active task ids under the action scope
pub fn active_tasks_ids_by_action_scope(state: &StoreState) -> HashSet<TaskId> {
    ids_in_categories(state, &[StatusCategory::Active])
}

/// Finished task ids under the action scope
pub fn finished_tasks_ids_by_action_scope(state: &StoreState) -> HashSet<TaskId> {
    ids_in_categories(state, &[StatusCategory::Finished])
}

/// Finished and failed task ids under the action scope
pub fn finished_and_error_tasks_ids_by_action_scope(state: &StoreState) -> HashSet<TaskId> {
    ids_in_categories(state, &[StatusCategory::Finished, StatusCategory::Error])
}

/// Whether finished tasks raise a banner
pub fn notifications_banner_finished_enabled(state: &StoreState) -> bool {
    state.settings.notifications.banner.finished
}

/// Whether failed tasks raise a banner
pub fn notifications_banner_failed_enabled(state: &StoreState) -> bool {
    state.settings.notifications.banner.failed
}

/// Quick menu entries
pub fn quick_menus(state: &StoreState) -> &[QuickMenu] {
    &state.settings.quick_menus
}

/// Whether any guarded operation is in flight
pub fn is_busy(state: &StoreState) -> bool {
    state.loading > 0
}
