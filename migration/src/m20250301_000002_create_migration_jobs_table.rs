use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_sites_table::Sites;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MigrationJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MigrationJobs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MigrationJobs::SiteId).integer().not_null())
                    .col(ColumnDef::new(MigrationJobs::ContentTypes).text().not_null())
                    .col(
                        ColumnDef::new(MigrationJobs::ImportType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MigrationJobs::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(MigrationJobs::TotalItems)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MigrationJobs::ProcessedItems)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MigrationJobs::ImportedCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MigrationJobs::UpdatedCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MigrationJobs::SkippedCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MigrationJobs::Progress)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(MigrationJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MigrationJobs::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(MigrationJobs::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(MigrationJobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_migration_jobs_site")
                            .from(MigrationJobs::Table, MigrationJobs::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_migration_jobs_status")
                    .table(MigrationJobs::Table)
                    .col(MigrationJobs::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_migration_jobs_created_at")
                    .table(MigrationJobs::Table)
                    .col(MigrationJobs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MigrationJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MigrationJobs {
    Table,
    Id,
    SiteId,
    ContentTypes,
    ImportType,
    Status,
    TotalItems,
    ProcessedItems,
    ImportedCount,
    UpdatedCount,
    SkippedCount,
    Progress,
    CreatedAt,
    StartedAt,
    CompletedAt,
    UpdatedAt,
}
