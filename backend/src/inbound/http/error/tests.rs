//! Tests for HTTP error mapping.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::{Value, json};

use super::*;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn conflict_case() -> Error {
    Error::conflict("Join event failed")
        .with_cause("Waiter has already joined an event")
        .with_trace_id(TRACE_ID)
}

async fn render(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("JSON body");
    (status, trace_id, body)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("busy"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn client_faults_render_as_fail_with_causes(conflict_case: Error) {
    let (status, trace_id, body) = render(&conflict_case).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(trace_id.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({
            "status": "fail",
            "data": {
                "message": "Join event failed",
                "causes": ["Waiter has already joined an event"]
            }
        })
    );
}

#[rstest]
#[actix_web::test]
async fn unavailable_backends_render_as_error_with_message() {
    let (status, trace_id, body) = render(&Error::service_unavailable("Get event failed")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(trace_id, None);
    assert_eq!(
        body,
        json!({"status": "error", "message": "Get event failed"})
    );
}

#[given("an internal error raised by a repository")]
fn an_internal_error_raised_by_a_repository() -> Error {
    Error::internal("relation \"events\" does not exist").with_trace_id(TRACE_ID)
}

#[when("the adapter renders the client payload")]
fn the_adapter_renders_the_client_payload(error: &Error) -> Envelope<()> {
    envelope_for(error)
}

#[then("clients see the generic internal error message")]
fn clients_see_the_generic_internal_error_message(envelope: Envelope<()>) {
    assert_eq!(
        envelope,
        Envelope::Error {
            message: "Internal server error".to_owned()
        }
    );
}

#[rstest]
fn internal_errors_are_redacted() {
    let error = an_internal_error_raised_by_a_repository();
    let envelope = the_adapter_renders_the_client_payload(&error);
    clients_see_the_generic_internal_error_message(envelope);
}

#[rstest]
fn from_actix_error_is_redacted_internal_error() {
    let actix_err = actix_web::error::ErrorBadRequest("boom");
    let err: Error = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
}
