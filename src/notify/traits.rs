//! Trait for the notification sink

use crate::error::Notice;
use crate::types::Task;

/// Sink for user-visible notifications
///
/// Calls are fire-and-forget: implementations must not block and have no way
/// to report failure back to the service.
///
/// # Examples
///
/// ```
/// use station_link::notify::Notifier;
/// use station_link::{Notice, Task};
///
/// struct Console;
///
/// impl Notifier for Console {
///     fn task_created(&self, uri: &str, _source: Option<&str>, _destination: Option<&str>) {
///         println!("added {uri}");
///     }
///     fn task_finished(&self, task: &Task) {
///         println!("{} finished", task.title);
///     }
///     fn task_error(&self, task: &Task) {
///         println!("{} failed", task.title);
///     }
///     fn login_required(&self) {
///         println!("please log in");
///     }
///     fn error(&self, notice: Notice) {
///         println!("{}: {}", notice.title, notice.message);
///     }
/// }
/// ```
pub trait Notifier: Send + Sync {
    /// A task was created on the server
    fn task_created(&self, uri: &str, source: Option<&str>, destination: Option<&str>);

    /// A task reached the finished state between two list refreshes
    fn task_finished(&self, task: &Task);

    /// A task reached the error state between two list refreshes
    fn task_error(&self, task: &Task);

    /// The user must log in before retrying
    fn login_required(&self);

    /// A user-initiated operation failed
    fn error(&self, notice: Notice);
}
