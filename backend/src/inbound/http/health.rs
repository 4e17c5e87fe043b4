//! Readiness and liveness probes for orchestrators.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::inbound::http::envelope::Envelope;

/// Process health flags shared between the server bootstrap and the probes.
///
/// The server starts live but not ready. Bootstrap marks it ready once the
/// listener is bound; shutdown marks it draining so liveness fails first.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    draining: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            draining: AtomicBool::new(false),
        }
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn mark_draining(&self) {
        self.draining.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire) && !self.is_draining()
    }

    pub fn is_alive(&self) -> bool {
        !self.is_draining()
    }

    fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }
}

/// Probe payload: `{ "probe": "ready", "healthy": true }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeBody {
    pub probe: &'static str,
    pub healthy: bool,
}

fn probe_response(probe: &'static str, healthy: bool) -> HttpResponse {
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let mut response = Envelope::respond(status, ProbeBody { probe, healthy });
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server accepts traffic"),
        (status = 503, description = "Server is starting or draining")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe_response("ready", state.is_ready())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is alive"),
        (status = 503, description = "Process is draining")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe_response("live", state.is_alive())
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;

    async fn probe(state: web::Data<HealthState>, uri: &str) -> (u16, Value) {
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(ready)
                .service(live),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
        let status = res.status().as_u16();
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn unready_until_marked() {
        let state = web::Data::new(HealthState::new());
        let (status, _) = probe(state.clone(), "/health/ready").await;
        assert_eq!(status, 503);

        state.mark_ready();
        let (status, body) = probe(state, "/health/ready").await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["probe"], "ready");
    }

    #[rstest]
    #[actix_web::test]
    async fn draining_fails_both_probes() {
        let state = web::Data::new(HealthState::new());
        state.mark_ready();
        state.mark_draining();

        let (ready_status, _) = probe(state.clone(), "/health/ready").await;
        let (live_status, body) = probe(state, "/health/live").await;

        assert_eq!(ready_status, 503);
        assert_eq!(live_status, 503);
        assert_eq!(body["data"]["healthy"], false);
    }
}
