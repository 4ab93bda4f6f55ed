//! HS256 access token encoding and the stateless validation steps.
//!
//! Signature verification and expiry checking are separate functions so the
//! token service can compose them with the revocation lookup.

use anyhow::{anyhow, Result as AnyResult};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Shortest HS256 secret accepted at startup
pub const MIN_SECRET_LEN: usize = 32;

/// Largest clock skew tolerance, in seconds; larger values are clamped
pub const MAX_LEEWAY_SECS: u64 = 86_400;

/// Access token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// JWT ID, the handle used for revocation
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub.parse::<i64>().map_err(|_| AppError::TokenInvalid)
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .ok_or(AppError::TokenInvalid)
    }
}

/// Signing material, loaded once at startup
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> AnyResult<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(anyhow!(
                "JWT secret must be at least {} bytes, got {}",
                MIN_SECRET_LEN,
                secret.len()
            ));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    pub fn encode(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }
}

/// Check the signature and claim shape. Expiry is left to [`check_expiry`].
pub fn verify_signature(token: &str, keys: &JwtKeys) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
        tracing::debug!(error = %e, "Token signature or format rejected");
        AppError::TokenInvalid
    })?;

    if data.claims.jti.is_empty() {
        return Err(AppError::TokenInvalid);
    }

    Ok(data.claims)
}

/// A token is expired once `now` reaches `exp + leeway`.
pub fn check_expiry(claims: &Claims, now: DateTime<Utc>, leeway_secs: u64) -> Result<()> {
    let deadline = claims
        .exp
        .saturating_add(leeway_secs.min(MAX_LEEWAY_SECS) as i64);
    if now.timestamp() >= deadline {
        return Err(AppError::TokenInvalid);
    }
    Ok(())
}
