//! Builders wiring driven adapters into the HTTP state.
//!
//! A configured database URL selects the Diesel repositories; otherwise both
//! repository ports share one in-memory store.

use std::sync::Arc;

use tracing::{info, warn};

use eventwait::config::{AppSettings, SettingsError};
use eventwait::domain::ports::{EventRepository, WaiterRepository};
use eventwait::domain::{EventService, WaiterService, ZoomRadii};
use eventwait::inbound::http::state::HttpState;
use eventwait::outbound::memory::InMemoryStore;
use eventwait::outbound::persistence::{
    DbPool, DieselEventRepository, DieselWaiterRepository, MigrationError, PoolConfig, PoolError,
    run_pending_migrations,
};
use eventwait::outbound::token::JwtAccessTokenVerifier;

/// Failures that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Migrations(#[from] MigrationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl From<StartupError> for std::io::Error {
    fn from(err: StartupError) -> Self {
        Self::other(err.to_string())
    }
}

struct Repositories {
    events: Arc<dyn EventRepository>,
    waiters: Arc<dyn WaiterRepository>,
}

async fn build_repositories(settings: &AppSettings) -> Result<Repositories, StartupError> {
    match settings.database_url.as_deref() {
        Some(url) => {
            let applied = run_pending_migrations(url).await?;
            info!(applied, "database migrations applied");
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            Ok(Repositories {
                events: Arc::new(DieselEventRepository::new(pool.clone())),
                waiters: Arc::new(DieselWaiterRepository::new(pool)),
            })
        }
        None => {
            warn!("no database URL configured; using in-memory storage");
            let store = Arc::new(InMemoryStore::new());
            Ok(Repositories {
                events: store.clone(),
                waiters: store,
            })
        }
    }
}

/// Assemble domain services and adapters from settings.
pub async fn build_http_state(settings: &AppSettings) -> Result<HttpState, StartupError> {
    let secret = settings.token_secret()?;
    let zoom_radii: ZoomRadii = settings.zoom_radii()?;
    let Repositories { events, waiters } = build_repositories(settings).await?;

    let event_service = Arc::new(EventService::new(events.clone(), zoom_radii));
    Ok(HttpState::new(
        event_service.clone(),
        event_service,
        Arc::new(WaiterService::new(waiters, events)),
        Arc::new(JwtAccessTokenVerifier::new(secret.to_vec())),
    ))
}
