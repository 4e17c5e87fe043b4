//! HTTP server configuration object.

use std::net::SocketAddr;

use eventwait::middleware::OriginBlacklist;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) origin_blacklist: OriginBlacklist,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            origin_blacklist: OriginBlacklist::default(),
        }
    }

    /// Reject requests whose `Origin` header matches one of `origins`.
    #[must_use]
    pub fn with_origin_blacklist(mut self, origins: &[String]) -> Self {
        self.origin_blacklist = OriginBlacklist::new(origins.iter().cloned());
        self
    }
}
