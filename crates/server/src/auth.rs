//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the user id and email. The email is the
//! caller's [`Identity`] once the signature and expiry check out.

use chrono::{DateTime, Utc};
use engine::{Identity, User};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_SECRET_LEN: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("JWT secret must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,
    #[error("missing bearer token")]
    MissingToken,
    #[error("token has expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("failed to issue token")]
    Issue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies access tokens.
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl std::fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuth")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl JwtAuth {
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::WeakSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        })
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Sign a token for `user`, valid from `now` for the configured lifetime.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let ttl = i64::try_from(self.ttl_secs).map_err(|_| AuthError::Issue)?;
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            iat,
            exp: iat.saturating_add(ttl),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
            tracing::error!("failed to sign token: {err}");
            AuthError::Issue
        })
    }

    /// Check signature and expiry and return the token's identity.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid,
            }
        })?;

        Ok(Identity::new(data.claims.email))
    }
}
