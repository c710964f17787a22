//! Database integration tests
//!
//! Tests the destination schema and repositories to ensure:
//! - Tenant-scoped natural keys are unique per site
//! - Foreign key constraints work correctly
//! - Deleting a site cascades to its jobs
//! - Repository queries return expected results

use chrono::Utc;
use pretty_assertions::assert_eq;
use reel_porter::test_utils::*;
use sea_orm::{entity::prelude::DateTimeWithTimeZone, ActiveModelTrait, EntityTrait, ModelTrait, Set};

use reel_porter::db::entities::{
    migration_job::{ImportType, JobStatus},
    movie, MigrationJob, Movie,
};
use reel_porter::db::enums::ContentKind;
use reel_porter::db::repositories::{
    ActivityLogRepository, MigrationJobRepository, SiteRepository,
};

fn movie_for(site_id: i32, tmdb_id: i64) -> movie::ActiveModel {
    let now: DateTimeWithTimeZone = Utc::now().into();
    movie::ActiveModel {
        site_id: Set(site_id),
        tmdb_id: Set(tmdb_id),
        title: Set("Heat".to_string()),
        plot_rewritten: Set(false),
        source: Set("migration".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_migration_job() {
    let db = setup_test_db().await;
    let site = create_test_site(&db, "jobs.example").await;

    let job = create_test_job(
        &db,
        site.id,
        &[ContentKind::TvShows],
        ImportType::AllContent,
        8,
    )
    .await;

    assert!(job.id > 0);
    assert_eq!(job.site_id, site.id);
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.import_type, ImportType::AllContent);
    assert_eq!(job.content_types, "tv_shows");
    assert_eq!(job.started_at, None);
    assert!(job.created_at.timestamp() > 0);
}

#[tokio::test]
async fn test_job_requires_valid_site() {
    let db = setup_test_db().await;

    let now: DateTimeWithTimeZone = Utc::now().into();
    let orphan = reel_porter::db::entities::migration_job::ActiveModel {
        site_id: Set(99999),
        content_types: Set("movies".to_string()),
        import_type: Set(ImportType::RewrittenOnly),
        status: Set(JobStatus::Pending),
        total_items: Set(1),
        progress: Set(0.0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = orphan.insert(&db).await;
    assert!(result.is_err(), "Should fail to create job for a missing site");
}

#[tokio::test]
async fn test_movie_natural_key_is_unique_per_site() {
    let db = setup_test_db().await;
    let first = create_test_site(&db, "first.example").await;
    let second = create_test_site(&db, "second.example").await;

    movie_for(first.id, 949).insert(&db).await.unwrap();
    movie_for(second.id, 949).insert(&db).await.unwrap();

    let duplicate = movie_for(first.id, 949).insert(&db).await;
    assert!(duplicate.is_err(), "Same tmdb_id twice on one site must fail");
    assert_eq!(Movie::find().all(&db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_deleting_site_removes_its_jobs() {
    let db = setup_test_db().await;
    let site = create_test_site(&db, "doomed.example").await;
    create_test_job(&db, site.id, &[ContentKind::Movies], ImportType::AllContent, 3).await;

    site.delete(&db).await.unwrap();

    assert_eq!(MigrationJob::find().all(&db).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_site_repository_filters_inactive() {
    let db = setup_test_db().await;
    let active = create_test_site(&db, "live.example").await;
    let retired = create_inactive_test_site(&db, "old.example").await;

    let repo = SiteRepository::new(db.clone());

    assert!(repo.find_active_by_id(active.id).await.unwrap().is_some());
    assert!(repo.find_active_by_id(retired.id).await.unwrap().is_none());
    assert!(repo.find_by_id(retired.id).await.unwrap().is_some());
    assert_eq!(repo.list_active().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_recent_jobs_carry_their_site() {
    let db = setup_test_db().await;
    let site = create_test_site(&db, "recent.example").await;
    let older = create_test_job(&db, site.id, &[ContentKind::Movies], ImportType::AllContent, 1).await;
    let newer = create_test_job(&db, site.id, &[ContentKind::Episodes], ImportType::AllContent, 2).await;

    let recent = MigrationJobRepository::new(db.clone())
        .find_recent_with_site(10)
        .await
        .unwrap();

    let ids: Vec<i32> = recent.iter().map(|(job, _)| job.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    assert_eq!(
        recent[0].1.as_ref().map(|s| s.domain.as_str()),
        Some("recent.example")
    );
}

#[tokio::test]
async fn test_activity_log_records_actions() {
    let db = setup_test_db().await;
    let repo = ActivityLogRepository::new(db.clone());

    repo.record("migration_started", "Started migration job #1 for site #1")
        .await
        .unwrap();
    repo.record_best_effort("migration_completed", "Migration job #1 completed")
        .await;

    let started = repo.find_by_action("migration_started").await.unwrap();
    assert_eq!(started.len(), 1);
    assert_eq!(
        started[0].details.as_deref(),
        Some("Started migration job #1 for site #1")
    );
    assert_eq!(repo.find_by_action("migration_completed").await.unwrap().len(), 1);
}
