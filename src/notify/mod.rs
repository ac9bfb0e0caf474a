//! Notification sink contract
//!
//! User-visible notifications (banners, toasts, badges) are rendered by the
//! host. The service only decides *when* to raise them:
//! - [`Notifier`] - the sink interface
//! - [`NoOpNotifier`] - discards everything (headless use, tests)
//! - [`LogNotifier`] - renders notifications as log events

mod logging;
mod noop;
mod traits;

pub use logging::LogNotifier;
pub use noop::NoOpNotifier;
pub use traits::Notifier;
