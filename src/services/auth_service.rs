//! Authentication service - registration and login.
//!
//! Both operations are a single lookup followed by one hash or one compare.
//! Hashing and verification are CPU-bound, so they run on tokio's blocking
//! pool instead of the request task.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ENTITY_USER;
use crate::domain::{NewUser, Password, User, WorkFactor};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User>;

    /// Check a user's credentials. No session or token is issued.
    async fn login(&self, email: String, password: String) -> AppResult<User>;
}

/// Concrete implementation of AuthService over a user repository.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    work_factor: WorkFactor,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(users: Arc<dyn UserRepository>, work_factor: WorkFactor) -> Self {
        Self { users, work_factor }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User> {
        if self.users.find_by_email(&email).await?.is_some() {
            tracing::debug!("Registration rejected: email already registered");
            return Err(AppError::conflict(ENTITY_USER));
        }

        let work_factor = self.work_factor;
        let password_hash =
            tokio::task::spawn_blocking(move || Password::new(&password, &work_factor))
                .await
                .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))??
                .into_string();

        // The store's unique index still guards against a concurrent insert
        // that slipped in after the lookup above.
        let user = self
            .users
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<User> {
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY_USER))?;

        let stored = Password::from_hash(user.password_hash.clone());
        let password_valid = tokio::task::spawn_blocking(move || stored.verify(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))?;

        if !password_valid {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::Unauthorized);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }
}
