use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Serialize;

use crate::{
    db::{entities::migration_job, enums::ContentKind, source::SourceRow},
    error::Result,
    services::SourceCatalog,
    tasks::upsert::{upsert_row, UpsertOutcome},
};

/// Outcome counters for one batch, summed over every content kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub imported: u64,
    pub updated: u64,
    pub skipped: u64,
}

impl BatchResult {
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Imported => self.imported += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Source rows consumed by the batch.
    pub fn rows(&self) -> u64 {
        self.imported + self.updated + self.skipped
    }
}

/// Pulls one page per selected kind and feeds every row to the upsert
/// engine.
pub struct BatchProcessor {
    db: DatabaseConnection,
    catalog: SourceCatalog,
}

impl BatchProcessor {
    pub fn new(db: DatabaseConnection, catalog: SourceCatalog) -> Self {
        Self { db, catalog }
    }

    /// Run the window `[offset, offset + batch_size)` against every kind of
    /// `job`, in the job's order.
    ///
    /// Each kind is paginated on its own with the same window, so a kind that
    /// ran out of rows simply contributes nothing. The whole batch commits as
    /// one transaction; a row that fails rolls back its own savepoint and is
    /// counted as skipped.
    pub async fn run_batch(
        &self,
        job: &migration_job::Model,
        offset: u64,
        batch_size: u64,
    ) -> Result<BatchResult> {
        let kinds = ContentKind::split(&job.content_types);
        let mut result = BatchResult::default();

        let txn = self.db.begin().await?;

        for kind in kinds {
            let rows = self
                .catalog
                .fetch_page(kind, job.import_type, offset, batch_size)
                .await?;

            tracing::debug!(
                job_id = job.id,
                kind = %kind,
                offset,
                rows = rows.len(),
                "Fetched source page"
            );

            for row in &rows {
                result.record(apply_row(&txn, row, job.site_id).await);
            }
        }

        txn.commit().await?;

        tracing::info!(
            job_id = job.id,
            offset,
            batch_size,
            imported = result.imported,
            updated = result.updated,
            skipped = result.skipped,
            "Batch processed"
        );

        Ok(result)
    }
}

async fn apply_row(txn: &DatabaseTransaction, row: &SourceRow, site_id: i32) -> UpsertOutcome {
    match upsert_in_savepoint(txn, row, site_id).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(
                kind = %row.kind(),
                source_id = row.source_id(),
                tmdb_id = ?row.tmdb_id(),
                site_id,
                "Migration error, row skipped: {}",
                e
            );
            UpsertOutcome::Skipped
        }
    }
}

async fn upsert_in_savepoint(
    txn: &DatabaseTransaction,
    row: &SourceRow,
    site_id: i32,
) -> Result<UpsertOutcome> {
    let savepoint = txn.begin().await?;

    match upsert_row(&savepoint, row, site_id).await {
        Ok(outcome) => {
            savepoint.commit().await?;
            Ok(outcome)
        }
        Err(e) => {
            savepoint.rollback().await?;
            Err(e)
        }
    }
}
