use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{
    db::{
        entities::{
            migration_job::{self, ImportType, JobStatus},
            site,
        },
        repositories::SiteRepository,
    },
    error::Result,
    jobs::{controller::round_progress, MigrationController},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: i32,
    pub site_id: i32,
    pub domain: Option<String>,
    pub site_name: Option<String>,
    pub content_types: String,
    pub import_type: ImportType,
    pub status: JobStatus,
    pub total_items: i64,
    pub processed_items: i64,
    pub imported_count: i64,
    pub updated_count: i64,
    pub skipped_count: i64,
    pub progress: f64,
    pub created_at: String,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

impl JobResponse {
    pub fn from_parts(job: migration_job::Model, site: Option<site::Model>) -> Self {
        let (domain, site_name) = match site {
            Some(s) => (Some(s.domain), Some(s.name)),
            None => (None, None),
        };

        Self {
            id: job.id,
            site_id: job.site_id,
            domain,
            site_name,
            content_types: job.content_types,
            import_type: job.import_type,
            status: job.status,
            total_items: job.total_items,
            processed_items: job.processed_items,
            imported_count: job.imported_count,
            updated_count: job.updated_count,
            skipped_count: job.skipped_count,
            progress: round_progress(job.progress),
            created_at: job.created_at.to_rfc3339(),
            started_at: job.started_at.map(|dt| dt.to_rfc3339()),
            completed_at: job.completed_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

pub async fn get_job_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<JobResponse>> {
    let job = MigrationController::new(&state).store().get_job(id).await?;
    let site = SiteRepository::new(state.db.clone())
        .find_by_id(job.site_id)
        .await?;

    Ok(Json(JobResponse::from_parts(job, site)))
}
