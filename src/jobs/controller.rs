use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::{
    db::{
        entities::migration_job::{ImportType, JobStatus},
        enums::ContentKind,
        repositories::ActivityLogRepository,
    },
    error::{AppError, Result},
    jobs::{locks::JobLocks, store::JobStore},
    services::{SourceCatalog, SourceCounts},
    state::AppState,
    tasks::BatchProcessor,
};

pub const MIN_BATCH_SIZE: i64 = 10;
pub const MAX_BATCH_SIZE: i64 = 100;

/// Clamp a requested batch size into `[MIN_BATCH_SIZE, MAX_BATCH_SIZE]`.
pub fn clamp_batch_size(requested: Option<i64>, default: i64) -> u64 {
    requested
        .unwrap_or(default)
        .clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE) as u64
}

/// Round a percentage to one decimal place for display.
pub fn round_progress(progress: f64) -> f64 {
    (progress * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Serialize)]
pub struct StartedMigration {
    pub job_id: i32,
    pub total_items: i64,
    pub batch_size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub imported: u64,
    pub updated: u64,
    pub skipped: u64,
    pub progress: f64,
    pub is_complete: bool,
    pub next_offset: i64,
    pub processed_items: i64,
    pub total_items: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityReport {
    pub counts: SourceCounts,
    pub total_items: u64,
    pub total_rewritten: u64,
}

/// Entry points the admin UI drives: size and create a job once, then
/// process it one window at a time until it reports completion.
///
/// The caller owns the loop. Each `continue_migration` call does one
/// bounded unit of work and hands back the offset to use next.
pub struct MigrationController {
    store: JobStore,
    processor: BatchProcessor,
    catalog: SourceCatalog,
    activity: ActivityLogRepository,
    locks: JobLocks,
    default_batch_size: i64,
}

impl MigrationController {
    pub fn new(state: &AppState) -> Self {
        Self::from_parts(
            state.db.clone(),
            state.source.clone(),
            state.job_locks.clone(),
            state.config.default_batch_size,
        )
    }

    pub fn from_parts(
        db: DatabaseConnection,
        source: DatabaseConnection,
        locks: JobLocks,
        default_batch_size: i64,
    ) -> Self {
        let catalog = SourceCatalog::new(source);
        Self {
            store: JobStore::new(db.clone(), catalog.clone()),
            processor: BatchProcessor::new(db.clone(), catalog.clone()),
            catalog,
            activity: ActivityLogRepository::new(db),
            locks,
            default_batch_size,
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub async fn start_migration(
        &self,
        site_id: i32,
        content_types: &[ContentKind],
        filter: ImportType,
        batch_size: Option<i64>,
    ) -> Result<StartedMigration> {
        let job = self.store.create_job(site_id, content_types, filter).await?;

        self.activity
            .record_best_effort(
                "migration_started",
                &format!("Started migration job #{} for site #{}", job.id, site_id),
            )
            .await;

        Ok(StartedMigration {
            job_id: job.id,
            total_items: job.total_items,
            batch_size: clamp_batch_size(batch_size, self.default_batch_size),
        })
    }

    /// Process the window starting at `offset` and fold it into the job.
    ///
    /// `processed_items` becomes `offset + batch_size` whatever the number of
    /// rows actually found, so a job can overshoot `total_items` by up to one
    /// batch. Callers stop on `is_complete`, not on an empty batch.
    pub async fn continue_migration(
        &self,
        job_id: i32,
        offset: i64,
        batch_size: Option<i64>,
    ) -> Result<BatchReport> {
        if job_id <= 0 {
            return Err(AppError::InvalidRequest("Invalid job ID".to_string()));
        }

        let batch_size = clamp_batch_size(batch_size, self.default_batch_size);
        let next_offset = (offset >= 0)
            .then(|| offset.checked_add(batch_size as i64))
            .flatten()
            .ok_or_else(|| AppError::InvalidRequest("Invalid offset".to_string()))?;

        let _guard = self.locks.acquire(job_id).await;

        let job = self.store.get_job(job_id).await?;
        let result = self
            .processor
            .run_batch(&job, offset as u64, batch_size)
            .await?;

        let updated = self.store.advance_job(job_id, result, next_offset).await?;

        let is_complete = updated.status == JobStatus::Completed;
        if is_complete && job.status != JobStatus::Completed {
            tracing::info!(
                job_id,
                imported = updated.imported_count,
                updated = updated.updated_count,
                skipped = updated.skipped_count,
                "Migration job completed"
            );
            self.activity
                .record_best_effort(
                    "migration_completed",
                    &format!("Migration job #{} completed", job_id),
                )
                .await;
        }

        Ok(BatchReport {
            imported: result.imported,
            updated: result.updated,
            skipped: result.skipped,
            progress: round_progress(updated.progress),
            is_complete,
            next_offset,
            processed_items: updated.processed_items,
            total_items: updated.total_items,
        })
    }

    /// Read-only probe of the source catalog.
    pub async fn test_source_connectivity(&self) -> Result<ConnectivityReport> {
        let counts = self.catalog.counts().await?;

        Ok(ConnectivityReport {
            counts,
            total_items: counts.total_items(),
            total_rewritten: counts.total_rewritten(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        create_test_job, create_test_site, setup_test_db, setup_test_source_db,
    };

    #[test]
    fn test_batch_size_is_clamped() {
        assert_eq!(clamp_batch_size(Some(5), 50), 10);
        assert_eq!(clamp_batch_size(Some(500), 50), 100);
        assert_eq!(clamp_batch_size(Some(42), 50), 42);
        assert_eq!(clamp_batch_size(None, 50), 50);
        assert_eq!(clamp_batch_size(Some(-3), 50), 10);
    }

    #[test]
    fn test_progress_rounds_to_one_decimal() {
        assert_eq!(round_progress(33.333), 33.3);
        assert_eq!(round_progress(66.666), 66.7);
        assert_eq!(round_progress(100.0), 100.0);
    }

    #[tokio::test]
    async fn test_offset_overflow_is_rejected_before_any_work() {
        let db = setup_test_db().await;
        let source = setup_test_source_db().await;
        let site = create_test_site(&db, "overflow.example").await;
        let job = create_test_job(
            &db,
            site.id,
            &[ContentKind::Movies],
            ImportType::AllContent,
            5,
        )
        .await;
        let controller = MigrationController::from_parts(db, source, JobLocks::new(), 50);

        let result = controller
            .continue_migration(job.id, i64::MAX, Some(10))
            .await;
        assert!(matches!(
            result,
            Err(AppError::InvalidRequest(ref msg)) if msg == "Invalid offset"
        ));

        let unchanged = controller.store().get_job(job.id).await.unwrap();
        assert_eq!(unchanged.status, JobStatus::Pending);
        assert_eq!(unchanged.processed_items, 0);
        assert!(unchanged.started_at.is_none());
    }

    #[tokio::test]
    async fn test_next_offset_follows_clamped_batch() {
        let db = setup_test_db().await;
        let source = setup_test_source_db().await;
        let site = create_test_site(&db, "window.example").await;
        let job = create_test_job(
            &db,
            site.id,
            &[ContentKind::Movies],
            ImportType::AllContent,
            500,
        )
        .await;
        let controller = MigrationController::from_parts(db, source, JobLocks::new(), 50);

        let report = controller
            .continue_migration(job.id, 40, Some(500))
            .await
            .unwrap();
        assert_eq!(report.next_offset, 140);
        assert_eq!(report.processed_items, 140);
    }
}
