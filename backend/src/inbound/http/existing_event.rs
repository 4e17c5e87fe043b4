//! Extractor gating `/{id}` routes on the existence of the event.
//!
//! The loaded event is handed to the handler so it does not repeat the
//! lookup.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, ErrorCode, Event, EventId};
use crate::inbound::http::state::HttpState;

const GATE_FAILED: &str = "Event middleware failed";

fn event_not_found() -> Error {
    Error::not_found(GATE_FAILED).with_cause("Event not found")
}

/// An event that exists, loaded from the `id` path segment.
#[derive(Debug, Clone)]
pub struct ExistingEvent(pub Event);

impl ExistingEvent {
    pub fn into_inner(self) -> Event {
        self.0
    }
}

impl FromRequest for ExistingEvent {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let raw_id = req.match_info().get("id").map(str::to_owned);

        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let id = raw_id
                .and_then(|raw| EventId::new(raw).ok())
                .ok_or_else(event_not_found)?;

            match state.events_query.get_event(&id).await {
                Ok(event) => Ok(Self(event)),
                Err(err) if err.code() == ErrorCode::NotFound => Err(event_not_found()),
                Err(err) => Err(err),
            }
        })
    }
}
