//! Test utilities for Reel Porter
//!
//! Provides helpers for creating isolated test environments with:
//! - In-memory SQLite destination databases (one per test)
//! - In-memory SQLite source catalogs built from the source entities
//! - AppState factories
//! - Test data generators

use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{
    entity::prelude::DateTimeWithTimeZone, ActiveModelTrait, ConnectionTrait, Database,
    DatabaseConnection, DbBackend, NotSet, Schema, Set,
};

use crate::{
    config::{Config, Environment},
    db::{
        entities::{
            migration_job::{self, ImportType, JobStatus},
            site::{self, SiteStatus},
        },
        enums::ContentKind,
        source::{episode, movie, tv_show, SourceEpisode, SourceMovie, SourceTvShow},
    },
    state::AppState,
};

/// Setup an in-memory SQLite database with all migrations applied
///
/// Each call creates a fresh, isolated database perfect for parallel testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Setup an in-memory SQLite database shaped like the legacy catalog
///
/// The catalog is never migrated in production, so its tables are created
/// straight from the source entity definitions.
pub async fn setup_test_source_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory source database");

    let schema = Schema::new(DbBackend::Sqlite);
    let backend = db.get_database_backend();

    for statement in [
        schema.create_table_from_entity(SourceMovie),
        schema.create_table_from_entity(SourceTvShow),
        schema.create_table_from_entity(SourceEpisode),
    ] {
        db.execute(backend.build(&statement))
            .await
            .expect("Failed to create source table");
    }

    db
}

/// Create a test configuration with sensible defaults
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        source_database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
        environment: Environment::Production,
        default_batch_size: 50,
        recent_jobs_limit: 20,
    }
}

/// Create a complete test AppState with isolated destination and source
pub async fn setup_test_app_state() -> AppState {
    setup_test_app_state_with_config(test_config()).await
}

pub async fn setup_test_app_state_with_config(config: Config) -> AppState {
    let db = setup_test_db().await;
    let source = setup_test_source_db().await;

    AppState::new(db, source, config)
}

// ============================================================================
// Test Data Factories
// ============================================================================

/// Create an active test site in the database
pub async fn create_test_site(db: &DatabaseConnection, domain: &str) -> site::Model {
    insert_site(db, None, domain, SiteStatus::Active).await
}

/// Create a test site with a fixed primary key
pub async fn create_test_site_with_id(
    db: &DatabaseConnection,
    id: i32,
    domain: &str,
) -> site::Model {
    insert_site(db, Some(id), domain, SiteStatus::Active).await
}

pub async fn create_inactive_test_site(db: &DatabaseConnection, domain: &str) -> site::Model {
    insert_site(db, None, domain, SiteStatus::Inactive).await
}

async fn insert_site(
    db: &DatabaseConnection,
    id: Option<i32>,
    domain: &str,
    status: SiteStatus,
) -> site::Model {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let mut site = site::ActiveModel {
        domain: Set(domain.to_string()),
        name: Set(domain.split('.').next().unwrap_or(domain).to_string()),
        status: Set(status),
        created_at: Set(now),
        ..Default::default()
    };
    if let Some(id) = id {
        site.id = Set(id);
    }

    site.insert(db).await.expect("Failed to insert test site")
}

/// Create a pending migration job in the database
pub async fn create_test_job(
    db: &DatabaseConnection,
    site_id: i32,
    content_types: &[ContentKind],
    import_type: ImportType,
    total_items: i64,
) -> migration_job::Model {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let job = migration_job::ActiveModel {
        site_id: Set(site_id),
        content_types: Set(ContentKind::join(content_types)),
        import_type: Set(import_type),
        status: Set(JobStatus::Pending),
        total_items: Set(total_items),
        processed_items: Set(0),
        imported_count: Set(0),
        updated_count: Set(0),
        skipped_count: Set(0),
        progress: Set(0.0),
        created_at: Set(now),
        started_at: Set(None),
        completed_at: Set(None),
        updated_at: Set(now),
        ..Default::default()
    };

    job.insert(db).await.expect("Failed to insert test job")
}

// ============================================================================
// Source Catalog Rows
// ============================================================================

/// Build an in-memory source movie row
pub fn source_movie_row(id: i32, tmdb_id: i64, title: &str, rewritten: bool) -> movie::Model {
    movie::Model {
        id,
        tmdb_id: Some(tmdb_id),
        title: Some(title.to_string()),
        plot: Some(format!("Plot of {}", title)),
        year: Some(1999),
        poster_url: Some(format!("https://img.example/{}/poster.jpg", tmdb_id)),
        backdrop_url: None,
        actors: None,
        country: Some("US".to_string()),
        duration: Some(120),
        genre: Some("Drama".to_string()),
        meta_title: None,
        ai_summary: None,
        ai_src_hash: None,
        ai_updated_at: None,
        plot_rewritten: rewritten,
        rewritten_at: rewritten.then(|| Utc::now().naive_utc()),
        source: None,
    }
}

/// Build an in-memory source TV show row
pub fn source_show_row(id: i32, tmdb_id: i64, title: &str, rewritten: bool) -> tv_show::Model {
    tv_show::Model {
        id,
        tmdb_id: Some(tmdb_id),
        title: Some(title.to_string()),
        plot: Some(format!("Plot of {}", title)),
        year: Some(2011),
        poster_url: None,
        backdrop_url: None,
        genre: Some("Fantasy".to_string()),
        country: Some("US".to_string()),
        ai_summary: None,
        ai_src_hash: None,
        ai_updated_at: None,
        plot_rewritten: rewritten,
        rewritten_at: rewritten.then(|| Utc::now().naive_utc()),
        source: None,
    }
}

/// Build an in-memory source episode row
pub fn source_episode_row(
    id: i32,
    tmdb_id: i64,
    season: i32,
    episode: i32,
    rewritten: bool,
) -> episode::Model {
    episode::Model {
        id,
        tmdb_id: Some(tmdb_id),
        season_number: Some(season),
        episode_number: Some(episode),
        title: Some(format!("Episode {}x{}", season, episode)),
        plot: Some("An episode plot".to_string()),
        air_date: Some("2011-04-17".to_string()),
        still_url: None,
        ai_summary: None,
        ai_src_hash: None,
        ai_updated_at: None,
        plot_rewritten: rewritten,
        rewritten_at: rewritten.then(|| Utc::now().naive_utc()),
    }
}

/// Insert a movie into the source catalog
pub async fn seed_source_movie(
    db: &DatabaseConnection,
    tmdb_id: i64,
    title: &str,
    rewritten: bool,
) -> movie::Model {
    let row = source_movie_row(0, tmdb_id, title, rewritten);
    let mut active = movie::ActiveModel::from(row).reset_all();
    active.id = NotSet;

    active.insert(db).await.expect("Failed to insert source movie")
}

/// Insert a TV show into the source catalog
pub async fn seed_source_show(
    db: &DatabaseConnection,
    tmdb_id: i64,
    title: &str,
    rewritten: bool,
) -> tv_show::Model {
    let row = source_show_row(0, tmdb_id, title, rewritten);
    let mut active = tv_show::ActiveModel::from(row).reset_all();
    active.id = NotSet;

    active.insert(db).await.expect("Failed to insert source show")
}

/// Insert an episode into the source catalog
pub async fn seed_source_episode(
    db: &DatabaseConnection,
    tmdb_id: i64,
    season: i32,
    episode: i32,
    rewritten: bool,
) -> episode::Model {
    let row = source_episode_row(0, tmdb_id, season, episode, rewritten);
    let mut active = episode::ActiveModel::from(row).reset_all();
    active.id = NotSet;

    active
        .insert(db)
        .await
        .expect("Failed to insert source episode")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        let sites = site::Entity::find().all(&db).await.unwrap();
        assert_eq!(sites.len(), 0);
    }

    #[tokio::test]
    async fn test_source_db_accepts_seeded_rows() {
        let source = setup_test_source_db().await;
        let movie = seed_source_movie(&source, 603, "The Matrix", true).await;
        seed_source_show(&source, 1399, "Game of Thrones", false).await;
        seed_source_episode(&source, 1399, 1, 1, true).await;

        assert_eq!(movie.id, 1);
        assert_eq!(movie.title.as_deref(), Some("The Matrix"));
        assert_eq!(SourceMovie::find().count(&source).await.unwrap(), 1);
        assert_eq!(SourceTvShow::find().count(&source).await.unwrap(), 1);
        assert_eq!(SourceEpisode::find().count(&source).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_test_site_with_id() {
        let db = setup_test_db().await;
        let site = create_test_site_with_id(&db, 7, "seven.example").await;

        assert_eq!(site.id, 7);
        assert_eq!(site.name, "seven");
        assert_eq!(site.status, SiteStatus::Active);
    }

    #[tokio::test]
    async fn test_parallel_databases() {
        let (db1, db2) = tokio::join!(setup_test_db(), setup_test_db());

        let site1 = create_test_site(&db1, "a.example").await;
        let site2 = create_test_site(&db2, "b.example").await;

        assert_eq!(site1.id, 1);
        assert_eq!(site2.id, 1);
    }
}
