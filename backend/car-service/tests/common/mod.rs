//! Shared setup for the HTTP integration tests.
//!
//! The app is built from the in-memory stores, so no database is needed.
#![allow(dead_code)]

use actix_web::{dev::ServiceResponse, http::header, test, web, App};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

use car_service::{
    db::{MemoryCarRepository, MemoryRevocationStore, MemoryUserRepository, RevocationStore},
    error::{AppError, Result},
    routes::configure_routes,
    security::JwtKeys,
    AppState,
};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestStores {
    pub users: Arc<MemoryUserRepository>,
    pub revocations: Arc<MemoryRevocationStore>,
    pub cars: Arc<MemoryCarRepository>,
}

pub fn memory_state_with_ttl(ttl_secs: i64) -> (AppState, TestStores) {
    let stores = TestStores {
        users: Arc::new(MemoryUserRepository::new()),
        revocations: Arc::new(MemoryRevocationStore::new()),
        cars: Arc::new(MemoryCarRepository::new()),
    };
    let keys = JwtKeys::from_secret(TEST_SECRET).expect("test secret is long enough");
    let state = AppState::new(
        stores.users.clone(),
        stores.revocations.clone(),
        stores.cars.clone(),
        keys,
        Duration::seconds(ttl_secs),
        0,
    );
    (state, stores)
}

pub fn memory_state() -> (AppState, TestStores) {
    memory_state_with_ttl(3600)
}

/// Revocation store whose lookups and/or writes fail like a lost database
pub struct FailingRevocationStore {
    pub fail_lookup: bool,
    pub fail_revoke: bool,
}

#[async_trait]
impl RevocationStore for FailingRevocationStore {
    async fn revoke(&self, _jti: &str, _expires_at: DateTime<Utc>) -> Result<()> {
        if self.fail_revoke {
            return Err(AppError::Storage("connection reset by peer".to_string()));
        }
        Ok(())
    }

    async fn is_revoked(&self, _jti: &str) -> Result<bool> {
        if self.fail_lookup {
            return Err(AppError::Storage("connection reset by peer".to_string()));
        }
        Ok(false)
    }

    async fn purge_expired(&self, _before: DateTime<Utc>) -> Result<u64> {
        Ok(0)
    }
}

/// App state backed by in-memory users and cars and the given revocation store
pub fn state_with_revocations(revocations: Arc<dyn RevocationStore>) -> AppState {
    let keys = JwtKeys::from_secret(TEST_SECRET).expect("test secret is long enough");
    AppState::new(
        Arc::new(MemoryUserRepository::new()),
        revocations,
        Arc::new(MemoryCarRepository::new()),
        keys,
        Duration::seconds(3600),
        0,
    )
}

pub async fn setup_app(
    state: AppState,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let state = web::Data::new(state);
    test::init_service(App::new().configure(|cfg| configure_routes(cfg, state.clone()))).await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn register<S>(app: &S, username: &str, password: &str) -> ServiceResponse
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

pub async fn login<S>(app: &S, username: &str, password: &str) -> ServiceResponse
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

/// Register and log in, returning the access token
pub async fn register_and_login<S>(app: &S, username: &str, password: &str) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let resp = register(app, username, password).await;
    assert_eq!(resp.status(), 201);

    let resp = login(app, username, password).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    body["access_token"]
        .as_str()
        .expect("login returns access_token")
        .to_string()
}
