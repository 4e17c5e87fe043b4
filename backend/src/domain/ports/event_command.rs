//! Driving port for event mutations.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventDraft, EventId};

/// Driving port for creating and deleting events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventCommand: Send + Sync {
    /// Validate `draft` and persist it as a new event with no waiters.
    ///
    /// Validation failures return [`crate::domain::ErrorCode::InvalidRequest`]
    /// with one cause per failing field.
    async fn create_event(&self, draft: EventDraft) -> Result<Event, Error>;

    /// Delete an event, releasing every user waiting at it.
    async fn delete_event(&self, id: &EventId) -> Result<(), Error>;
}
