//! JWT Token Service
//! Mission: Issue and verify signed, expiring bearer tokens

use crate::auth::models::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::debug;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a presented token was not accepted
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed, unsigned by this server, or missing its subject")]
    Invalid,
    #[error("token has expired")]
    Expired,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Signs and verifies access tokens with a single process-wide HMAC secret.
///
/// Tokens are stateless. There is no revocation list, so a leaked token
/// stays usable until its `exp` passes.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
        }
    }

    /// Lifetime used for login tokens
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Issue a token for the configured access lifetime
    pub fn issue_access_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, self.access_ttl)
    }

    /// Issue a token whose `exp` is `now + ttl`. A negative ttl yields an already-expired token.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiry = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        debug!(subject, exp = claims.exp, "Issuing access token");

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the subject unchanged.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let decoded =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        if decoded.claims.sub.is_empty() {
            return Err(TokenError::Invalid);
        }

        Ok(decoded.claims.sub)
    }
}
