//! Shared HTTP adapter state.
//!
//! Handlers and extractors accept this state via `actix_web::web::Data` so
//! they depend only on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccessTokenVerifier, EventCommand, EventQuery, WaiterCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub events: Arc<dyn EventCommand>,
    pub events_query: Arc<dyn EventQuery>,
    pub waiters: Arc<dyn WaiterCommand>,
    pub access_tokens: Arc<dyn AccessTokenVerifier>,
}

impl HttpState {
    /// Construct state from the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use eventwait::domain::{EventService, WaiterService, ZoomRadii};
    /// use eventwait::inbound::http::state::HttpState;
    /// use eventwait::outbound::memory::InMemoryStore;
    /// use eventwait::outbound::token::JwtAccessTokenVerifier;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let events = Arc::new(EventService::new(store.clone(), ZoomRadii::default()));
    /// let state = HttpState::new(
    ///     events.clone(),
    ///     events,
    ///     Arc::new(WaiterService::new(store.clone(), store)),
    ///     Arc::new(JwtAccessTokenVerifier::new(b"secret".to_vec())),
    /// );
    /// let _data = actix_web::web::Data::new(state);
    /// ```
    pub fn new(
        events: Arc<dyn EventCommand>,
        events_query: Arc<dyn EventQuery>,
        waiters: Arc<dyn WaiterCommand>,
        access_tokens: Arc<dyn AccessTokenVerifier>,
    ) -> Self {
        Self {
            events,
            events_query,
            waiters,
            access_tokens,
        }
    }
}
