use chrono::Utc;
use sea_orm::{
    entity::prelude::DateTimeWithTimeZone, ActiveModelTrait, DatabaseConnection, EntityTrait, Set,
    TransactionTrait,
};

use crate::{
    db::{
        entities::{
            migration_job::{self, ImportType, JobStatus},
            site, MigrationJob,
        },
        enums::ContentKind,
        repositories::{MigrationJobRepository, SiteRepository},
    },
    error::{AppError, Result},
    services::SourceCatalog,
    tasks::BatchResult,
};

/// `processed / total` as a percentage, capped at 100.
pub fn progress_percent(processed_items: i64, total_items: i64) -> f64 {
    if total_items <= 0 {
        return 100.0;
    }
    (processed_items as f64 / total_items as f64 * 100.0).min(100.0)
}

/// Creates, reads and advances migration jobs.
///
/// Lifecycle: `Pending` until the first batch lands, `Processing` while
/// batches accumulate, `Completed` once `processed_items >= total_items`.
/// Nothing leaves `Completed`.
pub struct JobStore {
    db: DatabaseConnection,
    catalog: SourceCatalog,
}

impl JobStore {
    pub fn new(db: DatabaseConnection, catalog: SourceCatalog) -> Self {
        Self { db, catalog }
    }

    /// Size a migration against the source catalog and persist it as
    /// `Pending`.
    pub async fn create_job(
        &self,
        site_id: i32,
        content_types: &[ContentKind],
        filter: ImportType,
    ) -> Result<migration_job::Model> {
        if site_id <= 0 {
            return Err(AppError::NoSiteSelected);
        }

        let kinds = ContentKind::dedup(content_types);
        if kinds.is_empty() {
            return Err(AppError::NoContentSelected);
        }

        SiteRepository::new(self.db.clone())
            .find_active_by_id(site_id)
            .await?
            .ok_or(AppError::SiteNotFound(site_id))?;

        let total_items = self.catalog.count_selected(&kinds, filter).await?;
        if total_items == 0 {
            return Err(AppError::NothingToMigrate);
        }

        let now: DateTimeWithTimeZone = Utc::now().into();
        let job = MigrationJobRepository::new(self.db.clone())
            .create(migration_job::ActiveModel {
                site_id: Set(site_id),
                content_types: Set(ContentKind::join(&kinds)),
                import_type: Set(filter),
                status: Set(JobStatus::Pending),
                total_items: Set(total_items as i64),
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
            })
            .await?;

        tracing::info!(
            job_id = job.id,
            site_id,
            content_types = %job.content_types,
            total_items = job.total_items,
            "Migration job created"
        );

        Ok(job)
    }

    pub async fn get_job(&self, job_id: i32) -> Result<migration_job::Model> {
        MigrationJobRepository::new(self.db.clone())
            .find_by_id(job_id)
            .await?
            .ok_or(AppError::JobNotFound(job_id))
    }

    /// Fold one batch into the job's totals in a single transaction.
    ///
    /// `processed_items` never moves backwards: replaying an earlier offset
    /// keeps the current value. The `Completed` transition and its timestamp
    /// happen at most once.
    pub async fn advance_job(
        &self,
        job_id: i32,
        batch: BatchResult,
        new_processed_items: i64,
    ) -> Result<migration_job::Model> {
        let txn = self.db.begin().await?;

        let job = MigrationJob::find_by_id(job_id)
            .one(&txn)
            .await?
            .ok_or(AppError::JobNotFound(job_id))?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let processed_items = job.processed_items.max(new_processed_items);
        let status = job.status;
        let total_items = job.total_items;

        let mut active: migration_job::ActiveModel = job.clone().into();
        active.imported_count = Set(job.imported_count + batch.imported as i64);
        active.updated_count = Set(job.updated_count + batch.updated as i64);
        active.skipped_count = Set(job.skipped_count + batch.skipped as i64);
        active.processed_items = Set(processed_items);
        active.progress = Set(progress_percent(processed_items, total_items));
        active.updated_at = Set(now);

        if status == JobStatus::Pending {
            active.status = Set(JobStatus::Processing);
            active.started_at = Set(Some(now));
        }

        if status != JobStatus::Completed && processed_items >= total_items {
            active.status = Set(JobStatus::Completed);
            active.completed_at = Set(Some(now));
        }

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }

    /// Newest jobs first, joined with their tenant.
    pub async fn list_recent_jobs(
        &self,
        limit: u64,
    ) -> Result<Vec<(migration_job::Model, Option<site::Model>)>> {
        MigrationJobRepository::new(self.db.clone())
            .find_recent_with_site(limit)
            .await
    }
}
