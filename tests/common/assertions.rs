//! Custom test assertions for integration tests

use std::time::Duration;
use station_link::{Event, StationService};

/// Result of waiting for an event
#[derive(Debug)]
pub enum WaitResult {
    /// A matching event arrived
    Received(Event),
    /// Timeout waiting for the event
    Timeout,
    /// Channel closed unexpectedly
    ChannelClosed,
}

/// Wait for the first event matching `predicate`
///
/// Subscribe before triggering the operation, or the event may be missed.
pub async fn wait_for_event(
    events: &mut tokio::sync::broadcast::Receiver<Event>,
    timeout: Duration,
    predicate: impl Fn(&Event) -> bool,
) -> WaitResult {
    let result = tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(event) if predicate(&event) => return WaitResult::Received(event),
                Ok(_) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    return WaitResult::ChannelClosed;
                }
            }
        }
    })
    .await;

    result.unwrap_or(WaitResult::Timeout)
}

/// Assert that no guarded operation is in flight
pub fn assert_idle(service: &StationService) {
    assert_eq!(
        service.busy_count(),
        0,
        "busy counter should be back to zero"
    );
}
