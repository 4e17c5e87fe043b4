//! JSend result envelope shared by every endpoint.
//!
//! ```text
//! success: { "status": "success", "data": { ... } }
//! fail:    { "status": "fail", "data": { "message": ..., "causes": [...] } }
//! error:   { "status": "error", "message": ... }
//! ```

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Client-correctable failure details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FailData {
    pub message: String,
    /// One entry per independently failing rule. Omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

/// Tri-state response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success { data: T },
    Fail { data: FailData },
    Error { message: String },
}

impl<T: Serialize> Envelope<T> {
    /// Render a success envelope with `status`.
    pub fn respond(status: StatusCode, data: T) -> HttpResponse {
        HttpResponse::build(status).json(Self::Success { data })
    }

    /// Render a `200 OK` success envelope.
    pub fn ok(data: T) -> HttpResponse {
        Self::respond(StatusCode::OK, data)
    }
}

/// Success payload carrying only a confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_wraps_data() {
        let value = serde_json::to_value(Envelope::Success {
            data: MessageBody::new("done"),
        })
        .expect("serialise");
        assert_eq!(value, json!({"status": "success", "data": {"message": "done"}}));
    }

    #[test]
    fn fail_omits_empty_causes() {
        let value = serde_json::to_value(Envelope::<()>::Fail {
            data: FailData {
                message: "Get event failed".to_owned(),
                causes: Vec::new(),
            },
        })
        .expect("serialise");
        assert_eq!(
            value,
            json!({"status": "fail", "data": {"message": "Get event failed"}})
        );
    }

    #[test]
    fn error_carries_top_level_message() {
        let value = serde_json::to_value(Envelope::<()>::Error {
            message: "Internal server error".to_owned(),
        })
        .expect("serialise");
        assert_eq!(
            value,
            json!({"status": "error", "message": "Internal server error"})
        );
    }
}
