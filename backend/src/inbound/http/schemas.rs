//! OpenAPI schema definitions for the JSend envelopes.
//!
//! [`super::envelope::Envelope`] is generic and internally tagged, which
//! utoipa cannot describe per payload. These concrete wrappers document each
//! shape the handlers actually emit.

use utoipa::ToSchema;

use super::envelope::{FailData, MessageBody};
use super::events::{EventEnvelope, EventsEnvelope};

/// `{ "status": "success", "data": { "event": … } }`
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EventEnvelopeSchema {
    #[schema(example = "success")]
    status: String,
    data: EventEnvelope,
}

/// `{ "status": "success", "data": { "events": [ … ] } }`
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EventsEnvelopeSchema {
    #[schema(example = "success")]
    status: String,
    data: EventsEnvelope,
}

/// `{ "status": "success", "data": { "message": … } }`
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MessageEnvelopeSchema {
    #[schema(example = "success")]
    status: String,
    data: MessageBody,
}

/// Client-correctable failure.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FailEnvelopeSchema {
    #[schema(example = "fail")]
    status: String,
    data: FailData,
}

/// Server-side fault. Internal errors carry a redacted message.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    #[schema(example = "error")]
    status: String,
    #[schema(example = "Internal server error")]
    message: String,
}

#[cfg(test)]
mod tests {
    use utoipa::PartialSchema;

    use super::*;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn fail_schema_documents_causes() {
        let json = schema_to_json::<FailEnvelopeSchema>();
        assert!(json.contains("FailData"), "fail data should be referenced");
        assert!(schema_to_json::<FailData>().contains("causes"));
    }

    #[test]
    fn event_body_uses_wire_field_names() {
        let json = schema_to_json::<super::super::events::EventBody>();
        assert!(json.contains("listOfWaiters"));
        assert!(json.contains("location"));
    }

    #[test]
    fn error_schema_has_top_level_message() {
        let json = schema_to_json::<ErrorEnvelopeSchema>();
        assert!(json.contains("message"));
        assert!(!json.contains("data"));
    }
}
