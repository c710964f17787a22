//! Read-only access to the legacy catalog the migration copies from.

use migration::SchemaManager;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityName, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};
use serde::Serialize;

use crate::{
    db::{
        entities::migration_job::ImportType,
        enums::ContentKind,
        source::{episode, movie, tv_show, SourceEpisode, SourceMovie, SourceRow, SourceTvShow},
    },
    error::{AppError, Result},
};

/// Row counts per kind, overall and restricted to AI-rewritten rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    pub movies: u64,
    pub movies_rewritten: u64,
    pub tv_shows: u64,
    pub tv_shows_rewritten: u64,
    pub episodes: u64,
    pub episodes_rewritten: u64,
}

impl SourceCounts {
    pub fn total_items(&self) -> u64 {
        self.movies + self.tv_shows + self.episodes
    }

    pub fn total_rewritten(&self) -> u64 {
        self.movies_rewritten + self.tv_shows_rewritten + self.episodes_rewritten
    }
}

#[derive(Clone)]
pub struct SourceCatalog {
    db: DatabaseConnection,
}

impl SourceCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Number of rows of `kind` the filter admits.
    pub async fn count(&self, kind: ContentKind, filter: ImportType) -> Result<u64> {
        let rewritten = rewritten_flag(filter);

        let count = match kind {
            ContentKind::Movies => {
                SourceMovie::find()
                    .apply_if(rewritten, |q, flag| {
                        q.filter(movie::Column::PlotRewritten.eq(flag))
                    })
                    .count(&self.db)
                    .await
            }
            ContentKind::TvShows => {
                SourceTvShow::find()
                    .apply_if(rewritten, |q, flag| {
                        q.filter(tv_show::Column::PlotRewritten.eq(flag))
                    })
                    .count(&self.db)
                    .await
            }
            ContentKind::Episodes => {
                SourceEpisode::find()
                    .apply_if(rewritten, |q, flag| {
                        q.filter(episode::Column::PlotRewritten.eq(flag))
                    })
                    .count(&self.db)
                    .await
            }
        };

        count.map_err(AppError::SourceUnavailable)
    }

    /// Sum of `count` over every selected kind.
    pub async fn count_selected(&self, kinds: &[ContentKind], filter: ImportType) -> Result<u64> {
        let mut total = 0;
        for kind in kinds {
            total += self.count(*kind, filter).await?;
        }
        Ok(total)
    }

    /// Diagnostic snapshot used before a migration is started.
    ///
    /// A catalog may predate some content kinds: a kind whose table is
    /// missing reports zero rows instead of failing the probe.
    pub async fn counts(&self) -> Result<SourceCounts> {
        self.db.ping().await.map_err(AppError::SourceUnavailable)?;

        let (movies, movies_rewritten) = self.count_if_present(ContentKind::Movies).await?;
        let (tv_shows, tv_shows_rewritten) = self.count_if_present(ContentKind::TvShows).await?;
        let (episodes, episodes_rewritten) = self.count_if_present(ContentKind::Episodes).await?;

        Ok(SourceCounts {
            movies,
            movies_rewritten,
            tv_shows,
            tv_shows_rewritten,
            episodes,
            episodes_rewritten,
        })
    }

    /// `(all, rewritten)` for one kind, or zeros when its table is absent.
    async fn count_if_present(&self, kind: ContentKind) -> Result<(u64, u64)> {
        let table = source_table(kind);
        let present = SchemaManager::new(&self.db)
            .has_table(&table)
            .await
            .map_err(AppError::SourceUnavailable)?;

        if !present {
            tracing::warn!(kind = %kind, table = %table, "Source table missing, counting as empty");
            return Ok((0, 0));
        }

        Ok((
            self.count(kind, ImportType::AllContent).await?,
            self.count(kind, ImportType::RewrittenOnly).await?,
        ))
    }

    /// One page of rows of `kind`, ordered by natural key.
    pub async fn fetch_page(
        &self,
        kind: ContentKind,
        filter: ImportType,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<SourceRow>> {
        fetch_page(&self.db, kind, filter, offset, limit)
            .await
            .map_err(AppError::SourceUnavailable)
    }
}

fn source_table(kind: ContentKind) -> String {
    match kind {
        ContentKind::Movies => SourceMovie.table_name().to_string(),
        ContentKind::TvShows => SourceTvShow.table_name().to_string(),
        ContentKind::Episodes => SourceEpisode.table_name().to_string(),
    }
}

fn rewritten_flag(filter: ImportType) -> Option<bool> {
    match filter {
        ImportType::RewrittenOnly => Some(true),
        ImportType::AllContent => None,
    }
}

async fn fetch_page<C: ConnectionTrait>(
    db: &C,
    kind: ContentKind,
    filter: ImportType,
    offset: u64,
    limit: u64,
) -> std::result::Result<Vec<SourceRow>, sea_orm::DbErr> {
    let rewritten = rewritten_flag(filter);

    let rows: Vec<SourceRow> = match kind {
        ContentKind::Movies => SourceMovie::find()
            .apply_if(rewritten, |q, flag| {
                q.filter(movie::Column::PlotRewritten.eq(flag))
            })
            .order_by_asc(movie::Column::TmdbId)
            .order_by_asc(movie::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?
            .into_iter()
            .map(SourceRow::Movie)
            .collect(),
        ContentKind::TvShows => SourceTvShow::find()
            .apply_if(rewritten, |q, flag| {
                q.filter(tv_show::Column::PlotRewritten.eq(flag))
            })
            .order_by_asc(tv_show::Column::TmdbId)
            .order_by_asc(tv_show::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?
            .into_iter()
            .map(SourceRow::TvShow)
            .collect(),
        ContentKind::Episodes => SourceEpisode::find()
            .apply_if(rewritten, |q, flag| {
                q.filter(episode::Column::PlotRewritten.eq(flag))
            })
            .order_by_asc(episode::Column::TmdbId)
            .order_by_asc(episode::Column::SeasonNumber)
            .order_by_asc(episode::Column::EpisodeNumber)
            .order_by_asc(episode::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?
            .into_iter()
            .map(SourceRow::Episode)
            .collect(),
    };

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seed_source_episode, seed_source_movie, setup_test_source_db};

    #[tokio::test]
    async fn test_counts_split_by_rewritten_flag() {
        let source = setup_test_source_db().await;
        seed_source_movie(&source, 1, "Rewritten", true).await;
        seed_source_movie(&source, 2, "Raw", false).await;
        seed_source_episode(&source, 10, 1, 1, true).await;

        let counts = SourceCatalog::new(source).counts().await.unwrap();

        assert_eq!(counts.movies, 2);
        assert_eq!(counts.movies_rewritten, 1);
        assert_eq!(counts.tv_shows, 0);
        assert_eq!(counts.episodes_rewritten, 1);
        assert_eq!(counts.total_items(), 3);
        assert_eq!(counts.total_rewritten(), 2);
    }

    #[tokio::test]
    async fn test_fetch_page_orders_by_natural_key() {
        let source = setup_test_source_db().await;
        seed_source_movie(&source, 30, "C", true).await;
        seed_source_movie(&source, 10, "A", true).await;
        seed_source_movie(&source, 20, "B", false).await;

        let catalog = SourceCatalog::new(source);
        let all = catalog
            .fetch_page(ContentKind::Movies, ImportType::AllContent, 0, 10)
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().filter_map(|r| r.tmdb_id()).collect();
        assert_eq!(ids, vec![10, 20, 30]);

        let rewritten = catalog
            .fetch_page(ContentKind::Movies, ImportType::RewrittenOnly, 1, 10)
            .await
            .unwrap();
        let ids: Vec<_> = rewritten.iter().filter_map(|r| r.tmdb_id()).collect();
        assert_eq!(ids, vec![30]);
    }

    #[tokio::test]
    async fn test_missing_tables_count_as_empty() {
        use sea_orm::{Database, DbBackend, Schema};

        let source = Database::connect("sqlite::memory:").await.unwrap();
        let statement = Schema::new(DbBackend::Sqlite).create_table_from_entity(SourceMovie);
        source
            .execute(source.get_database_backend().build(&statement))
            .await
            .unwrap();
        seed_source_movie(&source, 603, "The Matrix", true).await;

        let counts = SourceCatalog::new(source).counts().await.unwrap();

        assert_eq!(
            counts,
            SourceCounts {
                movies: 1,
                movies_rewritten: 1,
                ..Default::default()
            }
        );
    }
}
