//! Account creation and password verification.
//!
//! Argon2 work is moved off the async executor with `spawn_blocking`.

use std::sync::Arc;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::User;
use crate::security::password;

/// Matches the `users.username` column width
pub const MAX_USERNAME_LEN: usize = 80;

/// Shared by register and login so both reject the same inputs
fn require_fields(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new account, storing only the Argon2 hash of `password`.
    pub async fn create(&self, username: &str, password: &str) -> Result<User> {
        let result = self.create_inner(username, password).await;
        match &result {
            Ok(user) => {
                metrics::record_register("success");
                tracing::info!(user_id = user.id, username = %user.username, "User registered");
            }
            Err(AppError::DuplicateUsername) => {
                metrics::record_register("duplicate");
                tracing::info!(username = %username, "Registration rejected: username taken");
            }
            Err(AppError::InvalidInput(_)) => metrics::record_register("invalid"),
            Err(_) => metrics::record_register("error"),
        }
        result
    }

    async fn create_inner(&self, username: &str, password: &str) -> Result<User> {
        require_fields(username, password)?;
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(AppError::InvalidInput(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LEN
            )));
        }

        let owned = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&owned))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

        self.users.insert(username, &password_hash).await
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// `AppError::InvalidCredentials`.
    pub async fn verify(&self, username: &str, password: &str) -> Result<User> {
        let result = self.verify_inner(username, password).await;
        match &result {
            Ok(user) => {
                metrics::record_login("success");
                tracing::info!(user_id = user.id, username = %user.username, "Login succeeded");
            }
            Err(AppError::InvalidCredentials) => {
                metrics::record_login("failure");
                tracing::info!(username = %username, "Login failed");
            }
            Err(AppError::InvalidInput(_)) => metrics::record_login("invalid"),
            Err(_) => metrics::record_login("error"),
        }
        result
    }

    async fn verify_inner(&self, username: &str, password: &str) -> Result<User> {
        require_fields(username, password)?;

        let user = self.users.find_by_username(username).await?;
        let owned = password.to_string();

        match user {
            Some(user) => {
                let hash = user.password_hash.clone();
                tokio::task::spawn_blocking(move || password::verify_password(&owned, &hash))
                    .await
                    .map_err(|e| AppError::Internal(format!("Verify task failed: {}", e)))??;
                Ok(user)
            }
            None => {
                tokio::task::spawn_blocking(move || password::verify_against_dummy(&owned))
                    .await
                    .map_err(|e| AppError::Internal(format!("Verify task failed: {}", e)))?;
                Err(AppError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryUserRepository;

    fn store() -> (CredentialStore, Arc<MemoryUserRepository>) {
        let repo = Arc::new(MemoryUserRepository::new());
        (CredentialStore::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_create_stores_hash_not_password() {
        let (store, repo) = store();
        let user = store.create("alice", "pw123").await.unwrap();
        assert_eq!(user.username, "alice");

        let stored = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw123");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let (store, repo) = store();
        for (username, password) in [("", "pw123"), ("alice", ""), ("   ", "pw123")] {
            let err = store.create(username, password).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_overlong_username() {
        let (store, _) = store();
        let name = "a".repeat(MAX_USERNAME_LEN + 1);
        let err = store.create(&name, "pw123").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let (store, _) = store();
        store.create("alice", "pw123").await.unwrap();
        let err = store.create("alice", "other").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername));
    }

    #[tokio::test]
    async fn test_blank_fields_rejected_the_same_on_login() {
        let (store, _) = store();
        for (username, password) in [("", "pw123"), ("alice", ""), ("   ", "pw123")] {
            let err = store.verify(username, password).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_verify_does_not_distinguish_failures() {
        let (store, _) = store();
        store.create("alice", "pw123").await.unwrap();

        let user = store.verify("alice", "pw123").await.unwrap();
        assert_eq!(user.username, "alice");

        let wrong_password = store.verify("alice", "nope").await.unwrap_err();
        let unknown_user = store.verify("bob", "pw123").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(unknown_user, AppError::InvalidCredentials));
    }
}
