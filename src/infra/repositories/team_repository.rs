//! Team repository backed by the generic CRUD traits.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, Set};

use super::base::{DeleteRepository, ReadRepository, WriteRepository};
use super::entities::team::{ActiveModel, Entity as TeamEntity, Model};
use crate::domain::Team;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Team repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Persist a new team
    async fn save(&self, name: String) -> AppResult<Team>;

    /// Find team by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Team>>;

    /// List all teams
    async fn find_all(&self) -> AppResult<Vec<Team>>;

    /// Count all teams
    async fn count(&self) -> AppResult<u64>;

    /// Delete team by ID; members of the team lose their team reference
    async fn delete(&self, id: i64) -> AppResult<u64>;
}

/// Concrete implementation of TeamRepository
pub struct TeamStore {
    db: DatabaseConnection,
}

impl TeamStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<TeamEntity, Model> for TeamStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl WriteRepository<TeamEntity, Model, ActiveModel> for TeamStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<TeamEntity> for TeamStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl TeamRepository for TeamStore {
    async fn save(&self, name: String) -> AppResult<Team> {
        let active_model = ActiveModel {
            name: Set(name),
            ..Default::default()
        };

        let model = WriteRepository::insert(self, active_model).await?;
        Ok(Team::from(model))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Team>> {
        let model = ReadRepository::find_by_id(self, id).await?;
        Ok(model.map(Team::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Team>> {
        let models = ReadRepository::find_all(self).await?;
        Ok(models.into_iter().map(Team::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        ReadRepository::count(self).await
    }

    async fn delete(&self, id: i64) -> AppResult<u64> {
        DeleteRepository::delete_by_id(self, id).await
    }
}
