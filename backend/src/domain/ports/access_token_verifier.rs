//! Port for verifying bearer-style access tokens.

use crate::domain::AccessClaims;

use super::define_port_error;

define_port_error! {
    /// Reasons a token was rejected.
    pub enum AccessTokenError {
        /// Signature, structure or encoding is invalid.
        Invalid { message: String } => "access token is invalid: {message}",
        /// The token carried an `exp` claim in the past.
        Expired => "access token has expired",
    }
}

/// Verifies a raw token string and returns its claims.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AccessClaims, AccessTokenError>;
}
