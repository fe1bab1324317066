//! Application state - Dependency injection container.
//!
//! Provides centralized access to the services and infrastructure handles
//! shared by every request handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, UserRepository, UserStore};
use crate::services::{AuthService, Authenticator};

/// Application state shared across handlers.
///
/// Cheap to clone; everything inside is behind an `Arc`. The configuration
/// captured here is immutable for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User store
    pub users: Arc<dyn UserRepository>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the state from a live database connection and configuration.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(UserStore::new(database.get_connection()));
        let auth_service = Arc::new(Authenticator::new(users.clone(), config));

        Self {
            auth_service,
            users,
            database,
        }
    }

    /// Create application state with manually injected services (tests).
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        users: Arc<dyn UserRepository>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            users,
            database,
        }
    }
}
