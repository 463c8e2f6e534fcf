//! Member database entity for SeaORM.
//!
//! The active model stamps the audit columns on every save, so inserts and
//! updates through the ORM never have to set them by hand. Bulk updates
//! bypass this hook.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::config::DEFAULT_AUDITOR;
use crate::domain::Member;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
    pub created_date: DateTimeUtc,
    pub last_modified_date: DateTimeUtc,
    pub created_by: String,
    pub last_modified_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_delete = "SetNull"
    )]
    Team,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();

        if insert {
            self.created_date = Set(now);
            if self.created_by.is_not_set() {
                self.created_by = Set(DEFAULT_AUDITOR.to_string());
            }
        }

        self.last_modified_date = Set(now);
        if self.last_modified_by.is_not_set() {
            self.last_modified_by = Set(DEFAULT_AUDITOR.to_string());
        }

        Ok(self)
    }
}

/// Convert database model to domain entity
impl From<Model> for Member {
    fn from(model: Model) -> Self {
        Member {
            id: model.id,
            username: model.username,
            age: model.age,
            team_id: model.team_id,
            created_date: model.created_date,
            last_modified_date: model.last_modified_date,
            created_by: model.created_by,
            last_modified_by: model.last_modified_by,
        }
    }
}
