//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the event, waiter and health endpoints, the JSend
//! envelope schemas, and the `x-access-token` header scheme guarding the
//! waiter routes. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::envelope::{FailData, MessageBody};
use crate::inbound::http::events::{CreateEventBody, EventBody, EventEnvelope, EventsEnvelope};
use crate::inbound::http::health::ProbeBody;
use crate::inbound::http::schemas::{
    ErrorEnvelopeSchema, EventEnvelopeSchema, EventsEnvelopeSchema, FailEnvelopeSchema,
    MessageEnvelopeSchema,
};

/// Name of the access-token security scheme in the generated document.
pub const ACCESS_TOKEN_SCHEME: &str = "AccessToken";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            ACCESS_TOKEN_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-access-token",
                "HS256 JWT. May also be sent as a `token` body field or query parameter.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "eventwait API",
        description = "Location-tagged events and the users waiting at them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("AccessToken" = [])),
    paths(
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::events_near,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::waiters::join_event,
        crate::inbound::http::waiters::leave_event,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateEventBody,
        EventBody,
        EventEnvelope,
        EventsEnvelope,
        MessageBody,
        FailData,
        ProbeBody,
        EventEnvelopeSchema,
        EventsEnvelopeSchema,
        MessageEnvelopeSchema,
        FailEnvelopeSchema,
        ErrorEnvelopeSchema
    )),
    tags(
        (name = "events", description = "Create, find and delete events"),
        (name = "waiters", description = "Join and leave events"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
