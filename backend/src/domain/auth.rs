//! Access-token claims accepted by the guarded endpoints.
//!
//! Token issuance happens in a separate identity service. This crate only
//! verifies tokens and carries the decoded claims alongside the request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims decoded from a verified access token.
///
/// Only `sub` is interpreted. Other claims are retained verbatim so handlers
/// can log or forward them.
///
/// # Examples
/// ```
/// use eventwait::domain::AccessClaims;
///
/// let claims: AccessClaims =
///     serde_json::from_str(r#"{"sub":"ada","role":"waiter"}"#).expect("claims");
/// assert_eq!(claims.subject(), Some("ada"));
/// assert_eq!(claims.extra["role"], "waiter");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccessClaims {
    /// Subject the token was issued to, if present.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }
}
