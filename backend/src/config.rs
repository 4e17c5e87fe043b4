//! Application settings loaded via OrthoConfig.
//!
//! Values come from `EVENTWAIT_*` environment variables, command-line flags
//! and an optional configuration file, in OrthoConfig's usual precedence.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{ZoomRadii, ZoomRadiiError};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Errors raised while turning loaded settings into runtime values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {host}:{port}: {message}")]
    BindAddress {
        host: String,
        port: u16,
        message: String,
    },
    #[error("token secret must not be blank")]
    BlankTokenSecret,
    #[error(transparent)]
    ZoomRadii(#[from] ZoomRadiiError),
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EVENTWAIT")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string. In-memory storage is used when absent.
    pub database_url: Option<String>,
    /// HS256 secret shared with the token issuer.
    pub token_secret: String,
    /// Search radius in metres for each zoom level, level 1 first.
    pub zoom_radii: Option<Vec<f64>>,
    /// Origins whose requests are rejected.
    pub origin_blacklist: Option<Vec<String>>,
}

impl AppSettings {
    /// Socket address assembled from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        format!("{host}:{port}")
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::BindAddress {
                host: host.to_owned(),
                port,
                message: err.to_string(),
            })
    }

    /// Signing secret as bytes, rejecting blank values.
    pub fn token_secret(&self) -> Result<&[u8], SettingsError> {
        if self.token_secret.trim().is_empty() {
            return Err(SettingsError::BlankTokenSecret);
        }
        Ok(self.token_secret.as_bytes())
    }

    /// Zoom table, falling back to the built-in halving table.
    pub fn zoom_radii(&self) -> Result<ZoomRadii, SettingsError> {
        match &self.zoom_radii {
            Some(radii) => Ok(ZoomRadii::new(radii.clone())?),
            None => Ok(ZoomRadii::default()),
        }
    }

    pub fn origin_blacklist(&self) -> &[String] {
        self.origin_blacklist.as_deref().unwrap_or_default()
    }
}
