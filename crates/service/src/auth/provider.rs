//! Resolving the current user from a request.
//!
//! The web layer copies the raw credentials of a request (an `Authorization`
//! header and/or the session cookie) into a [`RequestContext`] and asks an
//! [`AuthProvider`] who is calling. Session tokens are HS256 JWTs carrying a
//! token id (`jti`) so that a signed-out token can be revoked before expiry.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{AuthUser, UserId};
use super::errors::AuthError;

/// Request-scoped credentials, detached from any web framework.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    bearer_token: Option<String>,
    session_token: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an `Authorization` header value and the session cookie value.
    /// A header that is not of the form `Bearer <token>` is ignored.
    pub fn from_parts(authorization: Option<&str>, session_cookie: Option<&str>) -> Self {
        let bearer_token = authorization
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let session_token = session_cookie
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Self { bearer_token, session_token }
    }

    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Bearer token wins over the session cookie.
    pub fn token(&self) -> Option<&str> {
        self.bearer_token.as_deref().or(self.session_token.as_deref())
    }
}

/// Capability answering "who is making this request?".
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_user(&self, ctx: &RequestContext) -> Option<UserId>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    jti: String,
    iat: i64,
    exp: i64,
}

/// Verified contents of a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: UserId,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct JwtAuthProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtAuthProvider {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user: &AuthUser) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Check signature and expiry. Revocation is the caller's concern.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // revocations are pruned at `exp`, so no grace period
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        let id = Uuid::parse_str(&data.claims.sub).map_err(|e| AuthError::TokenError(e.to_string()))?;
        let expires_at = DateTime::from_timestamp(data.claims.exp, 0)
            .ok_or_else(|| AuthError::TokenError("exp out of range".into()))?;
        Ok(SessionClaims { user_id: UserId(id), token_id: data.claims.jti, expires_at })
    }
}
