//! Port for event persistence.

use async_trait::async_trait;

use crate::domain::{BoundingBox, Event, EventId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "event repository query failed: {message}",
    }
}

/// Port for storing, reading and removing events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event. Its waiter set is expected to be empty.
    async fn create(&self, event: &Event) -> Result<(), EventRepositoryError>;

    /// Find an event with its current waiters.
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventRepositoryError>;

    /// Every stored event, unpaginated.
    async fn list_all(&self) -> Result<Vec<Event>, EventRepositoryError>;

    /// Events whose location falls inside `bounds`.
    ///
    /// Callers apply the exact distance check; adapters may return a superset
    /// of the circle the box was derived from but never omit an event inside
    /// the box.
    async fn list_within(&self, bounds: &BoundingBox) -> Result<Vec<Event>, EventRepositoryError>;

    /// Delete an event and clear the current-event pointer of every user
    /// waiting at it, as one unit.
    ///
    /// Returns `false` when no such event existed.
    async fn delete(&self, id: &EventId) -> Result<bool, EventRepositoryError>;
}
