//! Waiter HTTP handlers. Both routes require an access token.
//!
//! ```text
//! PUT /event/{eventId}/join/{waiterId}
//! PUT /event/{eventId}/leave/{waiterId}
//! ```

use actix_web::{HttpResponse, put, web};
use tracing::info;

use crate::inbound::http::ApiResult;
use crate::inbound::http::access_token::AccessToken;
use crate::inbound::http::envelope::{Envelope, MessageBody};
use crate::inbound::http::schemas::{
    ErrorEnvelopeSchema, FailEnvelopeSchema, MessageEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_waiter_move;

const JOIN_FAILED: &str = "Join event failed";
const LEAVE_FAILED: &str = "Leave event failed";

/// Start waiting at an event.
#[utoipa::path(
    put,
    path = "/event/{eventId}/join/{waiterId}",
    params(
        ("eventId" = String, Path, description = "Event to join"),
        ("waiterId" = String, Path, description = "User joining the event")
    ),
    responses(
        (status = 200, description = "Waiter joined", body = MessageEnvelopeSchema),
        (status = 400, description = "No token provided", body = FailEnvelopeSchema),
        (status = 401, description = "Token rejected", body = FailEnvelopeSchema),
        (status = 404, description = "User or event not found", body = FailEnvelopeSchema),
        (status = 409, description = "Waiter already waiting elsewhere", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["waiters"],
    operation_id = "joinEvent"
)]
#[put("/{event_id}/join/{waiter_id}")]
pub async fn join_event(
    state: web::Data<HttpState>,
    token: AccessToken,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (event_id, waiter_id) = path.into_inner();
    let request = parse_waiter_move(JOIN_FAILED, &event_id, &waiter_id)?;
    state.waiters.join_event(request).await?;
    info!(
        event_id = %request.event_id,
        user_id = %request.user_id,
        sub = token.claims().subject(),
        "waiter joined event"
    );
    Ok(Envelope::ok(MessageBody::new(
        "Waiter has successfully joined the event",
    )))
}

/// Stop waiting at an event.
#[utoipa::path(
    put,
    path = "/event/{eventId}/leave/{waiterId}",
    params(
        ("eventId" = String, Path, description = "Event to leave"),
        ("waiterId" = String, Path, description = "User leaving the event")
    ),
    responses(
        (status = 200, description = "Waiter left", body = MessageEnvelopeSchema),
        (status = 400, description = "No token provided", body = FailEnvelopeSchema),
        (status = 401, description = "Token rejected", body = FailEnvelopeSchema),
        (status = 404, description = "User or event not found", body = FailEnvelopeSchema),
        (status = 409, description = "Waiter is not waiting at this event", body = FailEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["waiters"],
    operation_id = "leaveEvent"
)]
#[put("/{event_id}/leave/{waiter_id}")]
pub async fn leave_event(
    state: web::Data<HttpState>,
    token: AccessToken,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (event_id, waiter_id) = path.into_inner();
    let request = parse_waiter_move(LEAVE_FAILED, &event_id, &waiter_id)?;
    state.waiters.leave_event(request).await?;
    info!(
        event_id = %request.event_id,
        user_id = %request.user_id,
        sub = token.claims().subject(),
        "waiter left event"
    );
    Ok(Envelope::ok(MessageBody::new(
        "Waiter has successfully left the event",
    )))
}
