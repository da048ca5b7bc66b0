//! HS256 access-token signing and verification.
//!
//! Access tokens are stateless: the subject and expiry live in the signed
//! [`Claims`] payload and nothing is stored server-side.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::{Timestamp, UserId};

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: UserId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier.
    pub jti: String,
}

/// Signs and verifies access tokens with a shared HMAC secret.
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign a token for `subject` that expires at `expires_at`.
    pub fn sign(&self, subject: UserId, expires_at: Timestamp) -> Result<String, CoreError> {
        if self.secret.is_empty() {
            return Err(CoreError::Internal("Token secret is empty".into()));
        }

        let claims = Claims {
            sub: subject,
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| CoreError::Internal(format!("Token signing failed: {e}")))
    }

    /// Verify a token's signature and expiry, returning its subject and expiry.
    ///
    /// Any failure (bad signature, malformed token, expired) is
    /// [`CoreError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<(UserId, Timestamp), CoreError> {
        if self.secret.is_empty() {
            return Err(CoreError::Internal("Token secret is empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                CoreError::InvalidToken
            })?;

        let expires_at =
            DateTime::from_timestamp(data.claims.exp, 0).ok_or(CoreError::InvalidToken)?;
        Ok((data.claims.sub, expires_at))
    }
}
