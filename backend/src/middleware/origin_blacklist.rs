//! Rejects cross-origin requests from configured origins.
//!
//! Requests without an `Origin` header, and origins not on the list, pass
//! through untouched. Listed origins receive a `403` fail envelope.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::ORIGIN;
use actix_web::{Error, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::Error as DomainError;

/// Middleware factory holding the blocked origins.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use eventwait::middleware::OriginBlacklist;
///
/// let _app = App::new().wrap(OriginBlacklist::new(["https://evil.example"]));
/// ```
#[derive(Clone, Debug, Default)]
pub struct OriginBlacklist {
    origins: Arc<BTreeSet<String>>,
}

impl OriginBlacklist {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origins: Arc::new(
                origins
                    .into_iter()
                    .map(|origin| origin.into().trim_end_matches('/').to_owned())
                    .collect(),
            ),
        }
    }

    fn blocks(&self, req: &ServiceRequest) -> bool {
        req.headers()
            .get(ORIGIN)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|origin| self.origins.contains(origin.trim_end_matches('/')))
    }
}

impl<S, B> Transform<S, ServiceRequest> for OriginBlacklist
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = OriginBlacklistMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OriginBlacklistMiddleware {
            service,
            policy: self.clone(),
        }))
    }
}

/// Service wrapper produced by [`OriginBlacklist`].
pub struct OriginBlacklistMiddleware<S> {
    service: S,
    policy: OriginBlacklist,
}

impl<S, B> Service<ServiceRequest> for OriginBlacklistMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.policy.blocks(&req) {
            return Box::pin(async move {
                warn!(path = %req.path(), "request from blacklisted origin rejected");
                let error = DomainError::forbidden("Not allowed by CORS");
                Ok(req.into_response(error.error_response()).map_into_right_body())
            });
        }

        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}
