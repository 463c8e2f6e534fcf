//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{MemberService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Member service
    pub member_service: Arc<dyn MemberService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self::new(container.members(), database)
    }

    /// Create new application state with manually injected services.
    pub fn new(member_service: Arc<dyn MemberService>, database: Arc<Database>) -> Self {
        Self {
            member_service,
            database,
        }
    }
}
