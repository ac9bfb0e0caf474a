//! No-op notifier for hosts without a notification surface

use super::traits::Notifier;
use crate::error::Notice;
use crate::types::Task;

/// Notifier that discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn task_created(&self, _uri: &str, _source: Option<&str>, _destination: Option<&str>) {}

    fn task_finished(&self, _task: &Task) {}

    fn task_error(&self, _task: &Task) {}

    fn login_required(&self) {}

    fn error(&self, _notice: Notice) {}
}
