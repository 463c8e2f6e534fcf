//! Migration: Create member table with its team foreign key.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_team_table::Team;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Member::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Member::Username).string().not_null())
                    .col(ColumnDef::new(Member::Age).integer().not_null().default(0))
                    .col(ColumnDef::new(Member::TeamId).big_integer().null())
                    .col(
                        ColumnDef::new(Member::CreatedDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Member::LastModifiedDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Member::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Member::LastModifiedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_team")
                            .from(Member::Table, Member::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Derived queries filter by username
        manager
            .create_index(
                Index::create()
                    .name("idx_member_username")
                    .table(Member::Table)
                    .col(Member::Username)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_member_username")
                    .table(Member::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Member {
    Table,
    Id,
    Username,
    Age,
    TeamId,
    CreatedDate,
    LastModifiedDate,
    CreatedBy,
    LastModifiedBy,
}
