//! Driving port for waiter join and leave transitions.

use async_trait::async_trait;

use crate::domain::{Error, EventId, UserId};

/// Identifies the waiter and event targeted by a join or leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaiterMove {
    pub event_id: EventId,
    pub user_id: UserId,
}

/// Driving port for moving users in and out of events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WaiterCommand: Send + Sync {
    /// Start waiting at an event. A user waits at one event at most.
    async fn join_event(&self, request: WaiterMove) -> Result<(), Error>;

    /// Stop waiting at the event the user is currently waiting at.
    async fn leave_event(&self, request: WaiterMove) -> Result<(), Error>;
}
