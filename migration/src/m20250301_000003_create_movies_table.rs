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
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Movies::SiteId).integer().not_null())
                    .col(ColumnDef::new(Movies::TmdbId).big_integer().not_null())
                    .col(ColumnDef::new(Movies::Title).string_len(500).not_null())
                    .col(ColumnDef::new(Movies::Plot).text())
                    .col(ColumnDef::new(Movies::Year).integer())
                    .col(ColumnDef::new(Movies::PosterUrl).text())
                    .col(ColumnDef::new(Movies::BackdropUrl).text())
                    .col(ColumnDef::new(Movies::Actors).text())
                    .col(ColumnDef::new(Movies::Country).string_len(255))
                    .col(ColumnDef::new(Movies::Duration).integer())
                    .col(ColumnDef::new(Movies::Genre).string_len(255))
                    .col(ColumnDef::new(Movies::MetaTitle).string_len(500))
                    .col(ColumnDef::new(Movies::AiSummary).text())
                    .col(ColumnDef::new(Movies::AiSrcHash).string_len(64))
                    .col(ColumnDef::new(Movies::AiUpdatedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Movies::PlotRewritten)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Movies::RewrittenAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Movies::Source)
                            .string_len(50)
                            .not_null()
                            .default("migration"),
                    )
                    .col(
                        ColumnDef::new(Movies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Movies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_site")
                            .from(Movies::Table, Movies::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_site_tmdb")
                    .table(Movies::Table)
                    .col(Movies::SiteId)
                    .col(Movies::TmdbId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Movies {
    Table,
    Id,
    SiteId,
    TmdbId,
    Title,
    Plot,
    Year,
    PosterUrl,
    BackdropUrl,
    Actors,
    Country,
    Duration,
    Genre,
    MetaTitle,
    AiSummary,
    AiSrcHash,
    AiUpdatedAt,
    PlotRewritten,
    RewrittenAt,
    Source,
    CreatedAt,
    UpdatedAt,
}
