use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_sites_table::Sites;
use super::m20250301_000004_create_tv_shows_table::TvShows;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TvEpisodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TvEpisodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TvEpisodes::SiteId).integer().not_null())
                    .col(ColumnDef::new(TvEpisodes::TvShowId).integer())
                    .col(ColumnDef::new(TvEpisodes::TmdbId).big_integer().not_null())
                    .col(ColumnDef::new(TvEpisodes::SeasonNumber).integer().not_null())
                    .col(ColumnDef::new(TvEpisodes::EpisodeNumber).integer().not_null())
                    .col(ColumnDef::new(TvEpisodes::Name).string_len(500))
                    .col(ColumnDef::new(TvEpisodes::Overview).text())
                    .col(ColumnDef::new(TvEpisodes::AirDate).string_len(20))
                    .col(ColumnDef::new(TvEpisodes::StillUrl).text())
                    .col(ColumnDef::new(TvEpisodes::AiSummary).text())
                    .col(ColumnDef::new(TvEpisodes::AiSrcHash).string_len(64))
                    .col(ColumnDef::new(TvEpisodes::AiUpdatedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(TvEpisodes::PlotRewritten)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TvEpisodes::RewrittenAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(TvEpisodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TvEpisodes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tv_episodes_site")
                            .from(TvEpisodes::Table, TvEpisodes::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tv_episodes_show")
                            .from(TvEpisodes::Table, TvEpisodes::TvShowId)
                            .to(TvShows::Table, TvShows::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tv_episodes_natural_key")
                    .table(TvEpisodes::Table)
                    .col(TvEpisodes::SiteId)
                    .col(TvEpisodes::TmdbId)
                    .col(TvEpisodes::SeasonNumber)
                    .col(TvEpisodes::EpisodeNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TvEpisodes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TvEpisodes {
    Table,
    Id,
    SiteId,
    TvShowId,
    TmdbId,
    SeasonNumber,
    EpisodeNumber,
    Name,
    Overview,
    AirDate,
    StillUrl,
    AiSummary,
    AiSrcHash,
    AiUpdatedAt,
    PlotRewritten,
    RewrittenAt,
    CreatedAt,
    UpdatedAt,
}
