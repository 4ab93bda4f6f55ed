//! In-memory store implementations.
//!
//! They honor the same uniqueness rules as the PostgreSQL schema; the test
//! suites build the whole app on top of them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::{CarRepository, RevocationStore, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{Car, CarUpdate, NewCar, RevokedToken, User};

#[derive(Default)]
struct UserTable {
    next_id: i64,
    by_username: HashMap<String, User>,
}

#[derive(Default)]
pub struct MemoryUserRepository {
    inner: RwLock<UserTable>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.by_username.len()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut table = self.inner.write().await;
        if table.by_username.contains_key(username) {
            return Err(AppError::DuplicateUsername);
        }

        table.next_id += 1;
        let user = User {
            id: table.next_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        table.by_username.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.inner.read().await.by_username.get(username).cloned())
    }
}

#[derive(Default)]
struct RevocationTable {
    next_id: i64,
    by_jti: HashMap<String, RevokedToken>,
}

#[derive(Default)]
pub struct MemoryRevocationStore {
    inner: RwLock<RevocationTable>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.by_jti.len()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let mut table = self.inner.write().await;
        if table.by_jti.contains_key(jti) {
            return Ok(());
        }

        table.next_id += 1;
        let record = RevokedToken {
            id: table.next_id,
            jti: jti.to_string(),
            expires_at,
            revoked_at: Utc::now(),
        };
        table.by_jti.insert(record.jti.clone(), record);
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool> {
        Ok(self.inner.read().await.by_jti.contains_key(jti))
    }

    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<u64> {
        let mut table = self.inner.write().await;
        let initial = table.by_jti.len();
        table.by_jti.retain(|_, record| !record.is_expired(before));
        Ok((initial - table.by_jti.len()) as u64)
    }
}

#[derive(Default)]
struct CarTable {
    next_id: i64,
    rows: BTreeMap<i64, Car>,
}

#[derive(Default)]
pub struct MemoryCarRepository {
    inner: RwLock<CarTable>,
}

impl MemoryCarRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CarRepository for MemoryCarRepository {
    async fn list(&self) -> Result<Vec<Car>> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Car>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, car: &NewCar) -> Result<Car> {
        let mut table = self.inner.write().await;
        table.next_id += 1;
        let created = Car {
            id: table.next_id,
            make: car.make.clone(),
            model: car.model.clone(),
            year: car.year,
            price: car.price,
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &CarUpdate) -> Result<Option<Car>> {
        let mut table = self.inner.write().await;
        Ok(table.rows.get_mut(&id).map(|car| {
            changes.apply_to(car);
            car.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}
