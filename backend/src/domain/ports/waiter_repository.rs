//! Port for waiter lookups and the join/leave state transitions.

use async_trait::async_trait;

use crate::domain::{EventId, UserId, Waiter};

use super::define_port_error;

define_port_error! {
    /// Errors raised by waiter repository adapters.
    pub enum WaiterRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "waiter repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "waiter repository query failed: {message}",
        /// The user's current-event pointer no longer matches the expected
        /// state, typically because a concurrent request changed it first.
        PointerConflict => "waiter current event changed concurrently",
        /// The event disappeared between lookup and write.
        EventMissing => "event no longer exists",
    }
}

/// Port for reading waiters and moving them between events.
///
/// `join` and `leave` each update the user's pointer and the event's waiter
/// set as a single unit: either both writes land or neither does.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WaiterRepository: Send + Sync {
    /// Find a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Waiter>, WaiterRepositoryError>;

    /// Point `user` at `event` and add them to its waiter set.
    ///
    /// Fails with [`WaiterRepositoryError::PointerConflict`] when the user is
    /// already waiting somewhere.
    async fn join(&self, user: &UserId, event: &EventId) -> Result<(), WaiterRepositoryError>;

    /// Clear the pointer of `user` and remove them from the waiter set of
    /// `event`.
    ///
    /// Fails with [`WaiterRepositoryError::PointerConflict`] when the user is
    /// not currently waiting at `event`.
    async fn leave(&self, user: &UserId, event: &EventId) -> Result<(), WaiterRepositoryError>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pointer_conflict_has_stable_message() {
        assert_eq!(
            WaiterRepositoryError::pointer_conflict().to_string(),
            "waiter current event changed concurrently"
        );
    }
}
