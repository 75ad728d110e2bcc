//! Stateless signed session tokens
//!
//! A session token is an HS256 JWT whose claims bind the site-owner subject to
//! an issue time and an expiry. Nothing is stored server-side: a token is valid
//! exactly when its signature verifies with the current secret and its expiry
//! has not passed. Rotating the secret is the only way to revoke tokens.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::{MAX_SESSION_AGE_SECS, SESSION_MAX_AGE, SESSION_SECRET};
use crate::session::csrf::derive_csrf_token;
use crate::session::errors::SessionError;
use crate::utils::gen_random_string;

const SESSION_SUBJECT: &str = "admin";

/// Session lifetime as a signed duration, capped at `MAX_SESSION_AGE_SECS`.
pub(crate) fn session_ttl(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_SESSION_AGE_SECS) as i64)
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl SessionClaims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Issues and verifies session tokens with the server-held secret.
#[derive(Clone)]
pub struct SessionSigner {
    secret: Option<Vec<u8>>,
    ttl_secs: u64,
}

impl fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSigner")
            .field(
                "secret",
                &self.secret.as_ref().map(|_| "[REDACTED]").unwrap_or("[UNSET]"),
            )
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl SessionSigner {
    /// An empty secret is treated the same as no secret.
    /// `ttl_secs` is capped at `MAX_SESSION_AGE_SECS`.
    pub fn new(secret: impl Into<Vec<u8>>, ttl_secs: u64) -> Self {
        let secret = secret.into();
        Self {
            secret: (!secret.is_empty()).then_some(secret),
            ttl_secs: ttl_secs.min(MAX_SESSION_AGE_SECS),
        }
    }

    /// A signer without a secret: every issue attempt fails, every token is rejected.
    pub fn unconfigured(ttl_secs: u64) -> Self {
        Self {
            secret: None,
            ttl_secs: ttl_secs.min(MAX_SESSION_AGE_SECS),
        }
    }

    /// Build a signer from `SESSION_SECRET` and `SESSION_MAX_AGE`.
    pub fn from_env() -> Self {
        let signer = Self {
            secret: SESSION_SECRET.clone(),
            ttl_secs: *SESSION_MAX_AGE,
        };
        if !signer.is_configured() {
            tracing::warn!("SESSION_SECRET is not set; admin login will be unavailable");
        }
        signer
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    fn secret(&self) -> Result<&[u8], SessionError> {
        self.secret.as_deref().ok_or(SessionError::MissingSecret)
    }

    /// Issue a fresh session token. Called only after the password has been verified.
    pub fn create_session(&self) -> Result<String, SessionError> {
        self.create_session_at(Utc::now())
    }

    /// Issue a session token as of `issued_at`.
    pub fn create_session_at(&self, issued_at: DateTime<Utc>) -> Result<String, SessionError> {
        let secret = self.secret()?;
        let expires_at = issued_at
            .checked_add_signed(session_ttl(self.ttl_secs))
            .ok_or_else(|| SessionError::Crypto("Session expiry is out of range".to_string()))?;

        let claims = SessionClaims {
            sub: SESSION_SUBJECT.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: gen_random_string(16)?,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| SessionError::Crypto(format!("Failed to sign session token: {e}")))?;

        tracing::debug!("Issued session token expiring at {}", expires_at);
        Ok(token)
    }

    /// True only when the signature verifies and the token has not expired.
    pub fn verify_session(&self, token: &str) -> bool {
        self.session_claims(token).is_some()
    }

    /// Decode and validate a token, returning its claims when valid.
    pub fn session_claims(&self, token: &str) -> Option<SessionClaims> {
        let Ok(secret) = self.secret() else {
            tracing::warn!("Session verification attempted without a configured secret");
            return None;
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.sub = Some(SESSION_SUBJECT.to_string());
        validation.set_required_spec_claims(&["exp", "sub"]);

        match decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation) {
            // jsonwebtoken still accepts `exp == now`; a session ends at its expiry second.
            Ok(data) if data.claims.exp <= Utc::now().timestamp() => {
                tracing::debug!("Session token rejected: expires at {}", data.claims.exp);
                None
            }
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Session token rejected: {}", e);
                None
            }
        }
    }

    /// The CSRF token paired with `session_token`.
    pub fn csrf_token_for(&self, session_token: &str) -> Result<String, SessionError> {
        derive_csrf_token(self.secret()?, session_token)
    }
}
