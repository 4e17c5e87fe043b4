//! HS256 JSON Web Token adapter for the access-token port.

use std::collections::HashSet;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use zeroize::Zeroizing;

use crate::domain::AccessClaims;
use crate::domain::ports::{AccessTokenError, AccessTokenVerifier};

/// Verifies tokens signed with a shared HMAC secret.
///
/// `exp` is checked when present but not required, so long-lived tokens
/// issued without an expiry remain valid.
///
/// # Examples
/// ```
/// use eventwait::domain::ports::AccessTokenVerifier;
/// use eventwait::outbound::token::JwtAccessTokenVerifier;
///
/// let verifier = JwtAccessTokenVerifier::new(b"shared-secret".to_vec());
/// assert!(verifier.verify("not-a-token").is_err());
/// ```
pub struct JwtAccessTokenVerifier {
    secret: Zeroizing<Vec<u8>>,
    validation: Validation,
}

impl JwtAccessTokenVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_aud = false;
        Self {
            secret: Zeroizing::new(secret.into()),
            validation,
        }
    }
}

impl AccessTokenVerifier for JwtAccessTokenVerifier {
    fn verify(&self, token: &str) -> Result<AccessClaims, AccessTokenError> {
        let key = DecodingKey::from_secret(&self.secret);
        decode::<AccessClaims>(token, &key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AccessTokenError::expired(),
                _ => AccessTokenError::invalid(err.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    const SECRET: &[u8] = b"test-secret";

    fn sign(claims: serde_json::Value, secret: &[u8]) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).expect("sign token")
    }

    #[fixture]
    fn verifier() -> JwtAccessTokenVerifier {
        JwtAccessTokenVerifier::new(SECRET)
    }

    #[rstest]
    fn accepts_token_without_expiry(verifier: JwtAccessTokenVerifier) {
        let token = sign(json!({"sub": "ada", "role": "waiter"}), SECRET);
        let claims = verifier.verify(&token).expect("valid token");
        assert_eq!(claims.subject(), Some("ada"));
        assert_eq!(claims.extra["role"], "waiter");
    }

    #[rstest]
    fn rejects_wrong_signature(verifier: JwtAccessTokenVerifier) {
        let token = sign(json!({"sub": "ada"}), b"other-secret");
        assert!(matches!(
            verifier.verify(&token),
            Err(AccessTokenError::Invalid { .. })
        ));
    }

    #[rstest]
    fn rejects_expired_token(verifier: JwtAccessTokenVerifier) {
        let expired = (Utc::now() - Duration::hours(1)).timestamp();
        let token = sign(json!({"sub": "ada", "exp": expired}), SECRET);
        assert_eq!(verifier.verify(&token), Err(AccessTokenError::Expired));
    }

    #[rstest]
    fn rejects_malformed_input(verifier: JwtAccessTokenVerifier) {
        assert!(verifier.verify("a.b").is_err());
    }
}
