//! Access token issuance and validation.
//!
//! `validate` runs three steps in order: signature, expiry, revocation.
//! Each step is public so it can be exercised on its own.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::RevocationStore;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::security::jwt::{self, Claims, JwtKeys};

/// Identity attached to a request whose bearer token passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: i64,
    jti: String,
    expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn jti(&self) -> &str {
        &self.jti
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// What logout hands to the revocation store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentifier {
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenService {
    keys: Arc<JwtKeys>,
    revocations: Arc<dyn RevocationStore>,
    ttl: Duration,
    leeway_secs: u64,
}

impl TokenService {
    pub fn new(
        keys: Arc<JwtKeys>,
        revocations: Arc<dyn RevocationStore>,
        ttl: Duration,
        leeway_secs: u64,
    ) -> Self {
        Self {
            keys,
            revocations,
            ttl,
            leeway_secs,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn leeway_secs(&self) -> u64 {
        self.leeway_secs
    }

    /// Sign a token for `user_id` with a fresh jti, expiring `ttl` from now.
    pub fn issue(&self, user_id: i64) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        self.keys.encode(&claims)
    }

    /// Full validation pipeline.
    ///
    /// Returns `AppError::TokenInvalid` for a bad signature, an expired token
    /// or a revoked jti. A failing revocation lookup surfaces as
    /// `AppError::Storage`.
    pub async fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let result = self.validate_inner(token).await;
        match &result {
            Ok(_) => metrics::record_token_validation("valid"),
            Err(AppError::TokenInvalid) => metrics::record_token_validation("invalid"),
            Err(e) => {
                metrics::record_token_validation("error");
                tracing::warn!(error = %e, "Token validation could not complete");
            }
        }
        result
    }

    async fn validate_inner(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.verify_signature(token)?;
        self.check_expiry(&claims, Utc::now())?;
        self.check_revocation(&claims).await?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id()?,
            expires_at: claims.expires_at()?,
            jti: claims.jti,
        })
    }

    pub fn verify_signature(&self, token: &str) -> Result<Claims> {
        jwt::verify_signature(token, &self.keys)
    }

    pub fn check_expiry(&self, claims: &Claims, now: DateTime<Utc>) -> Result<()> {
        jwt::check_expiry(claims, now, self.leeway_secs).map_err(|e| {
            tracing::debug!(jti = %claims.jti, "Token expired");
            e
        })
    }

    pub async fn check_revocation(&self, claims: &Claims) -> Result<()> {
        if self.revocations.is_revoked(&claims.jti).await? {
            tracing::debug!(jti = %claims.jti, "Token has been revoked");
            return Err(AppError::TokenInvalid);
        }
        Ok(())
    }

    /// Revocation handle of a token that already passed `validate`.
    pub fn extract_identifier(&self, user: &AuthenticatedUser) -> TokenIdentifier {
        TokenIdentifier {
            jti: user.jti.clone(),
            expires_at: user.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRevocationStore;

    const SECRET: &str = "unit-test-secret-with-at-least-32-bytes";

    fn service(ttl_secs: i64) -> (TokenService, Arc<MemoryRevocationStore>) {
        let store = Arc::new(MemoryRevocationStore::new());
        let keys = Arc::new(JwtKeys::from_secret(SECRET).unwrap());
        let service = TokenService::new(keys, store.clone(), Duration::seconds(ttl_secs), 0);
        (service, store)
    }

    #[tokio::test]
    async fn test_issue_then_validate() {
        let (service, _) = service(3600);
        let token = service.issue(7).unwrap();

        let first = service.validate(&token).await.unwrap();
        let second = service.validate(&token).await.unwrap();
        assert_eq!(first.user_id(), 7);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_each_token_has_unique_jti() {
        let (service, _) = service(3600);
        let a = service.validate(&service.issue(1).unwrap()).await.unwrap();
        let b = service.validate(&service.issue(1).unwrap()).await.unwrap();
        assert_ne!(a.jti(), b.jti());
    }

    #[tokio::test]
    async fn test_revoked_token_rejected() {
        let (service, store) = service(3600);
        let token = service.issue(7).unwrap();
        let user = service.validate(&token).await.unwrap();

        let id = service.extract_identifier(&user);
        assert_eq!(id.jti, user.jti());
        store.revoke(&id.jti, id.expires_at).await.unwrap();

        let err = service.validate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::TokenInvalid));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (service, _) = service(60);
        let token = service
            .issue_at(7, Utc::now() - Duration::seconds(120))
            .unwrap();

        let err = service.validate(&token).await.unwrap_err();
        assert!(matches!(err, AppError::TokenInvalid));
    }

    #[tokio::test]
    async fn test_identifier_carries_token_expiry() {
        let (service, _) = service(3600);
        let issued_at = Utc::now();
        let token = service.issue_at(7, issued_at).unwrap();
        let user = service.validate(&token).await.unwrap();

        let id = service.extract_identifier(&user);
        assert_eq!(id.expires_at.timestamp(), issued_at.timestamp() + 3600);
    }
}
