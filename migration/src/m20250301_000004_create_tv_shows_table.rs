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
                    .table(TvShows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TvShows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TvShows::SiteId).integer().not_null())
                    .col(ColumnDef::new(TvShows::TmdbId).big_integer().not_null())
                    .col(ColumnDef::new(TvShows::Name).string_len(500).not_null())
                    .col(ColumnDef::new(TvShows::Overview).text())
                    .col(ColumnDef::new(TvShows::FirstAirDate).string_len(20))
                    .col(ColumnDef::new(TvShows::PosterUrl).text())
                    .col(ColumnDef::new(TvShows::BackdropUrl).text())
                    .col(ColumnDef::new(TvShows::Genre).string_len(255))
                    .col(ColumnDef::new(TvShows::Country).string_len(255))
                    .col(ColumnDef::new(TvShows::OriginalLanguage).string_len(10))
                    .col(ColumnDef::new(TvShows::AiSummary).text())
                    .col(ColumnDef::new(TvShows::AiSrcHash).string_len(64))
                    .col(ColumnDef::new(TvShows::AiUpdatedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(TvShows::PlotRewritten)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TvShows::RewrittenAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(TvShows::Source)
                            .string_len(50)
                            .not_null()
                            .default("migration"),
                    )
                    .col(
                        ColumnDef::new(TvShows::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TvShows::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tv_shows_site")
                            .from(TvShows::Table, TvShows::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tv_shows_site_tmdb")
                    .table(TvShows::Table)
                    .col(TvShows::SiteId)
                    .col(TvShows::TmdbId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TvShows::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TvShows {
    Table,
    Id,
    SiteId,
    TmdbId,
    Name,
    Overview,
    FirstAirDate,
    PosterUrl,
    BackdropUrl,
    Genre,
    Country,
    OriginalLanguage,
    AiSummary,
    AiSrcHash,
    AiUpdatedAt,
    PlotRewritten,
    RewrittenAt,
    Source,
    CreatedAt,
    UpdatedAt,
}
