//! Service Container - Centralized service access.
//!
//! Holds every application service behind its trait so handlers depend
//! on abstractions only.

use std::sync::Arc;

use super::MemberService;
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get member service
    fn members(&self) -> Arc<dyn MemberService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    member_service: Arc<dyn MemberService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(member_service: Arc<dyn MemberService>) -> Self {
        Self { member_service }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        use super::MemberManager;

        let uow = Arc::new(Persistence::new(db, config.auditor.clone()));
        Self::new(Arc::new(MemberManager::new(uow)))
    }
}

impl ServiceContainer for Services {
    fn members(&self) -> Arc<dyn MemberService> {
        self.member_service.clone()
    }
}
