//! Backend entry-point: loads settings, wires adapters and serves HTTP.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use eventwait::config::AppSettings;
use eventwait::inbound::http::health::HealthState;

use server::{ServerConfig, StartupError, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(StartupError::from)?;
    let http_state = build_http_state(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let config =
        ServerConfig::new(bind_addr).with_origin_blacklist(settings.origin_blacklist());
    let server = create_server(health_state.clone(), http_state, config)?;
    info!(%bind_addr, "listening");

    let result = server.await;
    health_state.mark_draining();
    result
}
