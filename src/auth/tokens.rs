use crate::auth::{Claims, UserKind};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use std::fmt::{self, Debug, Formatter};

/// Token lifetime used unless configured otherwise.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    #[error("Invalid or expired token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Signs and verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let secret = secret.expose_secret().as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a new token for the given identity, valid from now for the configured TTL.
    pub fn issue(&self, user_id: &str, kind: UserKind, email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            kind,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Checks signature and expiry and returns the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }

    /// Exchanges a still valid token for a fresh one with the same identity.
    pub fn refresh(&self, token: &str) -> Result<String, TokenError> {
        let claims = self.verify(token)?;
        self.issue(&claims.user_id, claims.kind, &claims.email)
    }
}

impl Debug for TokenIssuer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
