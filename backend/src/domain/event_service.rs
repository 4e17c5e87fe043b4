//! Event domain service.
//!
//! Implements the event command and query driving ports on top of an
//! [`EventRepository`].

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{
    EventCommand, EventQuery, EventRepository, EventRepositoryError, NearbyEventsRequest,
};
use crate::domain::{BoundingBox, Error, Event, EventDraft, EventId, ZoomRadii};

const CREATE_FAILED: &str = "Create event failed";
const GET_FAILED: &str = "Get event failed";
const LIST_FAILED: &str = "Get all events failed";
const NEAR_FAILED: &str = "Get Event Near Location failed";
const DELETE_FAILED: &str = "Delete event failed";
const EVENT_NOT_FOUND: &str = "Event not found";

/// Map a repository failure onto a server-side domain error for `operation`.
///
/// The adapter detail is logged here; the returned error carries only the
/// operation message.
pub(crate) fn map_event_repository_error(
    operation: &'static str,
) -> impl FnOnce(EventRepositoryError) -> Error {
    move |err| {
        error!(error = %err, operation, "event repository failure");
        match err {
            EventRepositoryError::Connection { .. } => Error::service_unavailable(operation),
            EventRepositoryError::Query { .. } => Error::internal(operation),
        }
    }
}

/// Event service implementing [`EventCommand`] and [`EventQuery`].
#[derive(Clone)]
pub struct EventService<R: ?Sized> {
    events: Arc<R>,
    zoom_radii: ZoomRadii,
}

impl<R: ?Sized> EventService<R> {
    /// Create a service over `events` using `zoom_radii` for proximity search.
    pub fn new(events: Arc<R>, zoom_radii: ZoomRadii) -> Self {
        Self { events, zoom_radii }
    }
}

#[async_trait]
impl<R> EventCommand for EventService<R>
where
    R: EventRepository + ?Sized,
{
    async fn create_event(&self, draft: EventDraft) -> Result<Event, Error> {
        let details = draft.validate().map_err(|causes| {
            Error::invalid_request(CREATE_FAILED)
                .with_causes(causes.iter().map(ToString::to_string))
        })?;

        let event = Event::new(EventId::random(), details, BTreeSet::new());
        self.events
            .create(&event)
            .await
            .map_err(map_event_repository_error(CREATE_FAILED))?;

        info!(event_id = %event.id(), name = event.details().name(), "event created");
        Ok(event)
    }

    async fn delete_event(&self, id: &EventId) -> Result<(), Error> {
        let deleted = self
            .events
            .delete(id)
            .await
            .map_err(map_event_repository_error(DELETE_FAILED))?;
        if !deleted {
            return Err(Error::not_found(DELETE_FAILED).with_cause(EVENT_NOT_FOUND));
        }
        info!(event_id = %id, "event deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> EventQuery for EventService<R>
where
    R: EventRepository + ?Sized,
{
    async fn get_event(&self, id: &EventId) -> Result<Event, Error> {
        self.events
            .find_by_id(id)
            .await
            .map_err(map_event_repository_error(GET_FAILED))?
            .ok_or_else(|| Error::not_found(GET_FAILED).with_cause(EVENT_NOT_FOUND))
    }

    async fn list_events(&self) -> Result<Vec<Event>, Error> {
        self.events
            .list_all()
            .await
            .map_err(map_event_repository_error(LIST_FAILED))
    }

    async fn events_near(&self, request: NearbyEventsRequest) -> Result<Vec<Event>, Error> {
        let radius_m = self
            .zoom_radii
            .radius_for(request.zoom)
            .map_err(|err| Error::invalid_request(NEAR_FAILED).with_cause(err.to_string()))?;

        let bounds = BoundingBox::around(&request.center, radius_m);
        let candidates = self
            .events
            .list_within(&bounds)
            .await
            .map_err(map_event_repository_error(NEAR_FAILED))?;

        Ok(candidates
            .into_iter()
            .filter(|event| {
                event
                    .details()
                    .location()
                    .is_within(&request.center, radius_m)
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;
