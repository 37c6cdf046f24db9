//! Notifications published by [`ApiClient`](super::ApiClient).

use super::history::ServiceCallRecord;

/// Capacity of the broadcast channel; slow subscribers skip older events.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Something a UI or supervisor may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    /// A request failed; the record has also been added to the history.
    Failure(ServiceCallRecord),
    /// The backend rejected the session. The token has been cleared and the
    /// user should be sent to `redirect_to`.
    SessionExpired { redirect_to: String },
}
