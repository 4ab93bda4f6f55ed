/// Service-level tests for the token validation pipeline
use chrono::{Duration, Utc};
use std::sync::Arc;

use car_service::{
    db::{MemoryRevocationStore, RevocationStore},
    error::AppError,
    security::JwtKeys,
    services::{purge_once, TokenService},
};

const SECRET: &str = "token-service-test-secret-0123456789abcdef";

fn token_service(ttl: Duration, leeway_secs: u64) -> (TokenService, Arc<MemoryRevocationStore>) {
    let store = Arc::new(MemoryRevocationStore::new());
    let keys = Arc::new(JwtKeys::from_secret(SECRET).unwrap());
    (
        TokenService::new(keys, store.clone(), ttl, leeway_secs),
        store,
    )
}

#[tokio::test]
async fn test_pipeline_steps_compose() {
    let (service, _) = token_service(Duration::hours(1), 0);
    let token = service.issue(11).unwrap();

    let claims = service.verify_signature(&token).unwrap();
    assert_eq!(claims.sub, "11");
    service.check_expiry(&claims, Utc::now()).unwrap();
    service.check_revocation(&claims).await.unwrap();

    let user = service.validate(&token).await.unwrap();
    assert_eq!(user.user_id(), 11);
    assert_eq!(user.jti(), claims.jti);
}

#[tokio::test]
async fn test_expired_token_fails_without_revocation() {
    let (service, store) = token_service(Duration::seconds(30), 0);
    let token = service
        .issue_at(11, Utc::now() - Duration::seconds(31))
        .unwrap();

    let err = service.validate(&token).await.unwrap_err();
    assert!(matches!(err, AppError::TokenInvalid));
    assert_eq!(store.count().await, 0);
}

#[tokio::test]
async fn test_leeway_extends_acceptance() {
    let (strict, _) = token_service(Duration::seconds(30), 0);
    let (lenient, _) = token_service(Duration::seconds(30), 60);
    let issued_at = Utc::now() - Duration::seconds(45);

    let token = strict.issue_at(11, issued_at).unwrap();
    assert!(strict.validate(&token).await.is_err());
    assert!(lenient.validate(&token).await.is_ok());
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let (service, _) = token_service(Duration::hours(1), 0);
    let other_keys = Arc::new(JwtKeys::from_secret("some-other-secret-0123456789abcdefghij").unwrap());
    let other = TokenService::new(
        other_keys,
        Arc::new(MemoryRevocationStore::new()),
        Duration::hours(1),
        0,
    );

    let token = other.issue(11).unwrap();
    let err = service.validate(&token).await.unwrap_err();
    assert!(matches!(err, AppError::TokenInvalid));
}

#[tokio::test]
async fn test_concurrent_revocations_of_same_token_succeed() {
    let (service, store) = token_service(Duration::hours(1), 0);
    let token = service.issue(11).unwrap();
    let user = service.validate(&token).await.unwrap();
    let id = service.extract_identifier(&user);

    let (a, b) = tokio::join!(
        store.revoke(&id.jti, id.expires_at),
        store.revoke(&id.jti, id.expires_at)
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(store.count().await, 1);
    assert!(matches!(
        service.validate(&token).await,
        Err(AppError::TokenInvalid)
    ));
}

#[tokio::test]
async fn test_purge_never_revives_live_token() {
    let (service, store) = token_service(Duration::hours(1), 0);
    let token = service.issue(11).unwrap();
    let user = service.validate(&token).await.unwrap();
    let id = service.extract_identifier(&user);
    store.revoke(&id.jti, id.expires_at).await.unwrap();

    let removed = purge_once(&*store, Utc::now(), service.leeway_secs())
        .await
        .unwrap();
    assert_eq!(removed, 0);
    assert!(service.validate(&token).await.is_err());
}
