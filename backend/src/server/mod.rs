//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{StartupError, build_http_state};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use eventwait::doc::ApiDoc;
use eventwait::inbound::http::configure;
use eventwait::inbound::http::health::{HealthState, live, ready};
use eventwait::inbound::http::state::HttpState;
use eventwait::middleware::{OriginBlacklist, Trace};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    origin_blacklist: OriginBlacklist,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        origin_blacklist,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(origin_blacklist)
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Construct an Actix HTTP server.
///
/// The health state is marked ready once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(http_state),
        origin_blacklist: config.origin_blacklist,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::test;
    use rstest::{fixture, rstest};

    use super::*;
    use eventwait::domain::{EventService, WaiterService, ZoomRadii};
    use eventwait::outbound::memory::InMemoryStore;
    use eventwait::outbound::token::JwtAccessTokenVerifier;

    #[fixture]
    fn http_state() -> HttpState {
        let store = Arc::new(InMemoryStore::new());
        let events = Arc::new(EventService::new(store.clone(), ZoomRadii::default()));
        HttpState::new(
            events.clone(),
            events,
            Arc::new(WaiterService::new(store.clone(), store)),
            Arc::new(JwtAccessTokenVerifier::new(b"secret".to_vec())),
        )
    }

    #[rstest]
    #[actix_rt::test]
    async fn create_server_marks_ready(http_state: HttpState) {
        let health_state = web::Data::new(HealthState::new());
        assert!(!health_state.is_ready(), "state should start unready");

        let config = ServerConfig::new("127.0.0.1:0".parse().expect("socket address"));
        let _server =
            create_server(health_state.clone(), http_state, config).expect("server should build");

        assert!(health_state.is_ready(), "server creation should mark readiness");
    }

    #[rstest]
    #[actix_web::test]
    async fn app_wires_events_probes_and_middleware(http_state: HttpState) {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let app = test::init_service(build_app(AppDependencies {
            health_state,
            http_state: web::Data::new(http_state),
            origin_blacklist: OriginBlacklist::new(["https://evil.example"]),
        }))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/event").to_request(),
        )
        .await;
        assert_eq!(res.status().as_u16(), 200);
        assert!(res.headers().contains_key("trace-id"));

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(res.status().as_u16(), 200);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/event")
                .insert_header(("origin", "https://evil.example"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status().as_u16(), 403);
        assert!(res.headers().contains_key("trace-id"));
    }
}
