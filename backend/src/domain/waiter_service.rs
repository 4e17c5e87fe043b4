//! Waiter domain service.
//!
//! Enforces the join/leave preconditions in a fixed order (waiter, event,
//! current-event pointer) and delegates the two-sided write to the
//! [`WaiterRepository`], which applies it as one unit.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::event_service::map_event_repository_error;
use crate::domain::ports::{
    EventRepository, WaiterCommand, WaiterMove, WaiterRepository, WaiterRepositoryError,
};
use crate::domain::{Error, Event, EventId, UserId, Waiter};

const JOIN_FAILED: &str = "Join event failed";
const LEAVE_FAILED: &str = "Leave event failed";
const USER_NOT_FOUND: &str = "User not found";
const EVENT_NOT_FOUND: &str = "Event not found";
const ALREADY_JOINED: &str = "Waiter has already joined an event";
const NOT_WAITING: &str = "Waiter hasn't joined any events";
const WAITING_ELSEWHERE: &str = "Waiter hasn't joined this event";

/// Waiter service implementing [`WaiterCommand`].
#[derive(Clone)]
pub struct WaiterService<W: ?Sized, E: ?Sized> {
    waiters: Arc<W>,
    events: Arc<E>,
}

impl<W: ?Sized, E: ?Sized> WaiterService<W, E> {
    pub fn new(waiters: Arc<W>, events: Arc<E>) -> Self {
        Self { waiters, events }
    }
}

impl<W, E> WaiterService<W, E>
where
    W: WaiterRepository + ?Sized,
    E: EventRepository + ?Sized,
{
    async fn require_waiter(
        &self,
        user: &UserId,
        operation: &'static str,
    ) -> Result<Waiter, Error> {
        self.waiters
            .find_by_id(user)
            .await
            .map_err(map_waiter_repository_error(operation, None))?
            .ok_or_else(|| Error::not_found(operation).with_cause(USER_NOT_FOUND))
    }

    async fn require_event(
        &self,
        event: &EventId,
        operation: &'static str,
    ) -> Result<Event, Error> {
        self.events
            .find_by_id(event)
            .await
            .map_err(map_event_repository_error(operation))?
            .ok_or_else(|| Error::not_found(operation).with_cause(EVENT_NOT_FOUND))
    }
}

/// Map a repository failure for `operation`; `conflict_cause` describes a
/// lost pointer race.
fn map_waiter_repository_error(
    operation: &'static str,
    conflict_cause: Option<&'static str>,
) -> impl FnOnce(WaiterRepositoryError) -> Error {
    move |err| match err {
        WaiterRepositoryError::PointerConflict => {
            Error::conflict(operation).with_causes(conflict_cause)
        }
        WaiterRepositoryError::EventMissing => {
            Error::not_found(operation).with_cause(EVENT_NOT_FOUND)
        }
        WaiterRepositoryError::Connection { .. } => {
            error!(error = %err, operation, "waiter repository failure");
            Error::service_unavailable(operation)
        }
        WaiterRepositoryError::Query { .. } => {
            error!(error = %err, operation, "waiter repository failure");
            Error::internal(operation)
        }
    }
}

#[async_trait]
impl<W, E> WaiterCommand for WaiterService<W, E>
where
    W: WaiterRepository + ?Sized,
    E: EventRepository + ?Sized,
{
    async fn join_event(&self, request: WaiterMove) -> Result<(), Error> {
        let waiter = self.require_waiter(&request.user_id, JOIN_FAILED).await?;
        let event = self.require_event(&request.event_id, JOIN_FAILED).await?;

        if waiter.current_event().is_some() {
            return Err(Error::conflict(JOIN_FAILED).with_cause(ALREADY_JOINED));
        }

        self.waiters
            .join(waiter.id(), event.id())
            .await
            .map_err(map_waiter_repository_error(JOIN_FAILED, Some(ALREADY_JOINED)))?;

        info!(user_id = %waiter.id(), event_id = %event.id(), "waiter joined event");
        Ok(())
    }

    async fn leave_event(&self, request: WaiterMove) -> Result<(), Error> {
        let waiter = self.require_waiter(&request.user_id, LEAVE_FAILED).await?;
        let event = self.require_event(&request.event_id, LEAVE_FAILED).await?;

        match waiter.current_event() {
            None => return Err(Error::conflict(LEAVE_FAILED).with_cause(NOT_WAITING)),
            Some(current) if current != event.id() => {
                return Err(Error::conflict(LEAVE_FAILED).with_cause(WAITING_ELSEWHERE));
            }
            Some(_) => {}
        }

        self.waiters
            .leave(waiter.id(), event.id())
            .await
            .map_err(map_waiter_repository_error(LEAVE_FAILED, Some(WAITING_ELSEWHERE)))?;

        info!(user_id = %waiter.id(), event_id = %event.id(), "waiter left event");
        Ok(())
    }
}

#[cfg(test)]
#[path = "waiter_service_tests.rs"]
mod tests;
