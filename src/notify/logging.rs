//! Notifier that renders notifications as `tracing` events

use super::traits::Notifier;
use crate::error::Notice;
use crate::types::Task;

/// Notifier for headless hosts: every notification becomes a log event
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn task_created(&self, uri: &str, source: Option<&str>, destination: Option<&str>) {
        tracing::info!(uri, source, destination, "Task created");
    }

    fn task_finished(&self, task: &Task) {
        tracing::info!(task_id = %task.id, title = %task.title, "Task finished");
    }

    fn task_error(&self, task: &Task) {
        tracing::warn!(
            task_id = %task.id,
            title = %task.title,
            detail = task.status_detail.as_deref(),
            "Task failed"
        );
    }

    fn login_required(&self) {
        tracing::warn!("Login required");
    }

    fn error(&self, notice: Notice) {
        tracing::error!(
            title = %notice.title,
            context = notice.context.as_deref(),
            "{}",
            notice.message
        );
    }
}
