//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, UserStore};
use crate::services::{AuthService, Authenticator};

/// Shared by every handler. Holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    /// Registration and login
    pub auth_service: Arc<dyn AuthService>,
    /// Credential store handle (also used by the health check)
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the SeaORM user store and the authenticator onto an open database.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let users = Arc::new(UserStore::new(database.get_connection()));
        let auth_service = Arc::new(Authenticator::new(users, config.work_factor));

        Self::new(auth_service, database)
    }

    /// Create application state with a manually injected auth service.
    pub fn new(auth_service: Arc<dyn AuthService>, database: Arc<Database>) -> Self {
        Self {
            auth_service,
            database,
        }
    }
}
