//! Event HTTP handlers.
//!
//! ```text
//! POST   /event/create
//! GET    /event/
//! GET    /event/long/{long}/lat/{lat}/zoom/{zoom}
//! GET    /event/{id}
//! DELETE /event/{id}/delete
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, post, web};
use chrono::SecondsFormat;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Event, EventDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, MessageBody};
use crate::inbound::http::existing_event::ExistingEvent;
use crate::inbound::http::schemas::{
    ErrorEnvelopeSchema, EventEnvelopeSchema, EventsEnvelopeSchema, FailEnvelopeSchema,
    MessageEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_near_request;

/// Wire representation of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Gig")]
    pub name: String,
    pub description: String,
    pub address: Option<String>,
    /// `[longitude, latitude]` in degrees.
    #[schema(example = json!([2.35, 48.85]))]
    pub location: [f64; 2],
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub date: String,
    pub list_of_waiters: Vec<String>,
}

impl From<&Event> for EventBody {
    fn from(event: &Event) -> Self {
        let details = event.details();
        Self {
            id: event.id().to_string(),
            name: details.name().to_owned(),
            description: details.description().to_owned(),
            address: details.address().map(str::to_owned),
            location: [details.location().longitude(), details.location().latitude()],
            date: details.date().to_rfc3339_opts(SecondsFormat::AutoSi, true),
            list_of_waiters: event.waiters().iter().map(ToString::to_string).collect(),
        }
    }
}

/// `{ "event": … }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventEnvelope {
    pub event: EventBody,
}

impl From<&Event> for EventEnvelope {
    fn from(event: &Event) -> Self {
        Self {
            event: EventBody::from(event),
        }
    }
}

/// `{ "events": [ … ] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventsEnvelope {
    pub events: Vec<EventBody>,
}

impl From<Vec<Event>> for EventsEnvelope {
    fn from(events: Vec<Event>) -> Self {
        Self {
            events: events.iter().map(EventBody::from).collect(),
        }
    }
}

/// Creation payload. Every field is optional on the wire so validation can
/// report all missing fields together.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateEventBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    /// Longitude as a number or numeric string.
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub long: Option<f64>,
    /// Latitude as a number or numeric string.
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lat: Option<f64>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub date: Option<String>,
}

impl From<CreateEventBody> for EventDraft {
    fn from(body: CreateEventBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            address: body.address,
            longitude: body.long,
            latitude: body.lat,
            date: body.date,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Accept `2.35` and `"2.35"`. Anything else, including blank or
/// unparseable text, counts as absent.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCoordinate>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawCoordinate::Number(value)) => Some(value),
        Some(RawCoordinate::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(RawCoordinate::Other(_)) | None => None,
    })
}

/// Create an event.
#[utoipa::path(
    post,
    path = "/event/create",
    request_body = CreateEventBody,
    responses(
        (status = 201, description = "Event created", body = EventEnvelopeSchema),
        (status = 400, description = "Validation failed", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent",
    security([])
)]
#[post("/create")]
pub async fn create_event(
    state: web::Data<HttpState>,
    payload: web::Json<CreateEventBody>,
) -> ApiResult<HttpResponse> {
    let event = state
        .events
        .create_event(EventDraft::from(payload.into_inner()))
        .await?;
    info!(event_id = %event.id(), "event created");
    Ok(Envelope::respond(
        StatusCode::CREATED,
        EventEnvelope::from(&event),
    ))
}

/// List every event.
#[utoipa::path(
    get,
    path = "/event/",
    responses(
        (status = 200, description = "All events", body = EventsEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["events"],
    operation_id = "listEvents",
    security([])
)]
pub async fn list_events(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let events = state.events_query.list_events().await?;
    Ok(Envelope::ok(EventsEnvelope::from(events)))
}

/// Find events within the radius of a zoom level around a point.
#[utoipa::path(
    get,
    path = "/event/long/{long}/lat/{lat}/zoom/{zoom}",
    params(
        ("long" = f64, Path, description = "Longitude in degrees"),
        ("lat" = f64, Path, description = "Latitude in degrees"),
        ("zoom" = u32, Path, description = "1-based zoom level")
    ),
    responses(
        (status = 200, description = "Events near the point", body = EventsEnvelopeSchema),
        (status = 400, description = "Invalid location or zoom", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["events"],
    operation_id = "listEventsNear",
    security([])
)]
#[get("/long/{long}/lat/{lat}/zoom/{zoom}")]
pub async fn events_near(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
) -> ApiResult<HttpResponse> {
    let (long, lat, zoom) = path.into_inner();
    let request = parse_near_request(&long, &lat, &zoom)?;
    let events = state.events_query.events_near(request).await?;
    Ok(Envelope::ok(EventsEnvelope::from(events)))
}

/// Fetch one event.
#[utoipa::path(
    get,
    path = "/event/{id}",
    params(("id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "The event", body = EventEnvelopeSchema),
        (status = 404, description = "Event not found", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["events"],
    operation_id = "getEvent",
    security([])
)]
#[get("/{id}")]
pub async fn get_event(event: ExistingEvent) -> ApiResult<HttpResponse> {
    Ok(Envelope::ok(EventEnvelope::from(&event.into_inner())))
}

/// Delete an event and release its waiters.
#[utoipa::path(
    delete,
    path = "/event/{id}/delete",
    params(("id" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Event deleted", body = MessageEnvelopeSchema),
        (status = 404, description = "Event not found", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["events"],
    operation_id = "deleteEvent",
    security([])
)]
#[delete("/{id}/delete")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    event: ExistingEvent,
) -> ApiResult<HttpResponse> {
    let id = *event.into_inner().id();
    state.events.delete_event(&id).await?;
    info!(event_id = %id, "event deleted");
    Ok(Envelope::ok(MessageBody::new("Event successfully deleted")))
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
