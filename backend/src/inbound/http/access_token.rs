//! Access-token gate for the waiter endpoints.
//!
//! The token is read from the request body field `token`, then the query
//! parameter `token`, then the `x-access-token` header. The first non-empty
//! value wins.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;
use tracing::debug;

use crate::domain::AccessClaims;
use crate::domain::Error;
use crate::inbound::http::state::HttpState;

/// Header consulted last when looking for a token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Default, Deserialize)]
struct TokenCarrier {
    #[serde(default)]
    token: Option<String>,
}

fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|value| !value.trim().is_empty())
}

/// Claims of a verified access token.
#[derive(Debug, Clone)]
pub struct AccessToken(pub AccessClaims);

impl AccessToken {
    pub fn claims(&self) -> &AccessClaims {
        &self.0
    }
}

impl FromRequest for AccessToken {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let body_token: LocalBoxFuture<'static, Option<String>> =
            if req.content_type() == FORM_CONTENT_TYPE {
                let form = web::Form::<TokenCarrier>::from_request(req, payload);
                Box::pin(async move { form.await.ok().and_then(|body| body.into_inner().token) })
            } else {
                let json = web::Json::<TokenCarrier>::from_request(req, payload);
                Box::pin(async move { json.await.ok().and_then(|body| body.into_inner().token) })
            };
        let query_token = web::Query::<TokenCarrier>::from_query(req.query_string())
            .ok()
            .and_then(|query| query.into_inner().token);
        let header_token = req
            .headers()
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let token = non_empty(body_token.await)
                .or_else(|| non_empty(query_token))
                .or_else(|| non_empty(header_token))
                .ok_or_else(|| Error::invalid_request("No token provided."))?;

            let claims = state.access_tokens.verify(&token).map_err(|err| {
                debug!(error = %err, "access token rejected");
                Error::unauthorized("Failed to authenticate token")
            })?;
            debug!(sub = claims.subject(), "access token verified");
            Ok(Self(claims))
        })
    }
}
