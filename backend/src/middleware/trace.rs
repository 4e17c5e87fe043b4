//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! A caller-supplied `trace-id` header is reused when it holds a UUID;
//! otherwise a fresh identifier is generated. Either way the identifier is
//! in task-local scope while the request is handled and echoed back on the
//! response.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::domain::{TRACE_ID_HEADER, TraceId};

fn inbound_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .map(TraceId::from_uuid)
}

/// Middleware that scopes a [`TraceId`] around each request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use eventwait::Trace;
///
/// let _app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = inbound_trace_id(&req).unwrap_or_else(TraceId::generate);
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path()
        );
        let fut = self.service.call(req);
        Box::pin(TraceId::scope(
            trace_id,
            async move {
                let mut res = fut.await?;
                debug!(status = res.status().as_u16(), "request completed");
                // A hyphenated UUID is always a valid header value.
                if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Ok(res)
            }
            .instrument(span),
        ))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use super::*;
    use crate::domain::Error as DomainError;

    async fn echo_trace_id() -> HttpResponse {
        let id = TraceId::current().map(|id| id.to_string()).unwrap_or_default();
        HttpResponse::Ok().body(id)
    }

    async fn fail() -> Result<HttpResponse, DomainError> {
        Err(DomainError::not_found("Get event failed"))
    }

    fn header_of(res: &ServiceResponse) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .expect("trace id header")
            .to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn handler_sees_the_header_value() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_trace_id)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = header_of(&res);
        let body = test::read_body(res).await;
        assert_eq!(header.as_bytes(), &body[..]);
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[rstest]
    #[case("0b3c52f8-6c5c-4a7e-9f52-3a1d6b7e9c01", true)]
    #[case("not-a-uuid", false)]
    #[actix_web::test]
    async fn valid_inbound_ids_are_reused(#[case] inbound: &str, #[case] reused: bool) {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_trace_id)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((TRACE_ID_HEADER, inbound))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(header_of(&res) == inbound, reused);
    }

    #[rstest]
    #[actix_web::test]
    async fn error_responses_carry_the_header() {
        let app = test::init_service(App::new().wrap(Trace).route("/", web::get().to(fail))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status().as_u16(), 404);
        assert!(Uuid::parse_str(&header_of(&res)).is_ok());
    }
}
