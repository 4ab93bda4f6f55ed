//! Persistence seams.
//!
//! Each store is a trait so request handlers and the token pipeline can run
//! against PostgreSQL in production and the in-memory stores in tests.

pub mod cars;
pub mod memory;
pub mod token_revocation;
pub mod users;

pub use cars::PgCarRepository;
pub use memory::{MemoryCarRepository, MemoryRevocationStore, MemoryUserRepository};
pub use token_revocation::PgRevocationStore;
pub use users::PgUserRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Car, CarUpdate, NewCar, User};

/// Raw user rows. Hashing happens in `services::CredentialStore`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user row.
    ///
    /// Fails with `AppError::DuplicateUsername` when the unique index on
    /// `username` rejects the insert.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Revoked token identifiers (`jti` claims).
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `jti` as revoked. Revoking an already revoked `jti` is a no-op.
    ///
    /// `expires_at` is the token's natural expiry and drives `purge_expired`.
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<()>;

    /// Pure lookup, independent of expiry.
    async fn is_revoked(&self, jti: &str) -> Result<bool>;

    /// Delete records whose token expired before `before`. Returns the number removed.
    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<u64>;
}

#[async_trait]
pub trait CarRepository: Send + Sync {
    /// All cars ordered by id
    async fn list(&self) -> Result<Vec<Car>>;

    async fn find(&self, id: i64) -> Result<Option<Car>>;

    async fn create(&self, car: &NewCar) -> Result<Car>;

    /// `Ok(None)` when no car has this id
    async fn update(&self, id: i64, changes: &CarUpdate) -> Result<Option<Car>>;

    /// `Ok(false)` when no car has this id
    async fn delete(&self, id: i64) -> Result<bool>;
}
