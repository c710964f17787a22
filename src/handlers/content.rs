//! Action endpoint driven by the content-import page.
//!
//! Every request is a JSON object whose `action` field selects the
//! operation. Every answer is `200` with a `success` flag and a
//! human-readable `message`; failures never escape as HTTP errors.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::{
        entities::migration_job::ImportType, enums::ContentKind,
        repositories::SiteRepository,
    },
    error::Result,
    handlers::jobs::JobResponse,
    jobs::MigrationController,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ContentAction {
    TestConnection,
    StartMigration {
        #[serde(default)]
        site_id: i32,
        #[serde(default)]
        content_types: Vec<ContentKind>,
        #[serde(default = "default_import_type")]
        import_type: ImportType,
        #[serde(default)]
        batch_size: Option<i64>,
    },
    ProcessBatch {
        #[serde(default)]
        job_id: i32,
        #[serde(default)]
        offset: i64,
        #[serde(default)]
        batch_size: Option<i64>,
    },
    GetSites,
    GetMigrationJobs,
}

fn default_import_type() -> ImportType {
    ImportType::RewrittenOnly
}

#[derive(Debug, Serialize)]
pub struct ActionResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ActionFailure {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SiteSummary {
    pub id: i32,
    pub domain: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SitesPayload {
    pub sites: Vec<SiteSummary>,
}

#[derive(Debug, Serialize)]
pub struct JobsPayload {
    pub jobs: Vec<JobResponse>,
}

fn succeed<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    Json(ActionResponse {
        success: true,
        message: message.into(),
        data,
    })
    .into_response()
}

fn fail(message: String, debug: Option<String>) -> Response {
    Json(ActionFailure {
        success: false,
        message,
        debug,
    })
    .into_response()
}

pub async fn handle_action(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContentAction>, JsonRejection>,
) -> Response {
    let debug = state.config.debug();

    let action = match payload {
        Ok(Json(action)) => action,
        Err(rejection) => {
            tracing::debug!("Rejected action payload: {}", rejection.body_text());
            return fail(
                "Invalid request".to_string(),
                debug.then(|| rejection.body_text()),
            );
        }
    };

    match dispatch(&state, action).await {
        Ok(response) => response,
        Err(e) => {
            e.log();
            fail(e.user_message(debug), debug.then(|| format!("{:?}", e)))
        }
    }
}

async fn dispatch(state: &AppState, action: ContentAction) -> Result<Response> {
    let controller = MigrationController::new(state);

    match action {
        ContentAction::TestConnection => {
            let report = controller.test_source_connectivity().await?;
            Ok(succeed("Connection successful!", report))
        }
        ContentAction::StartMigration {
            site_id,
            content_types,
            import_type,
            batch_size,
        } => {
            let started = controller
                .start_migration(site_id, &content_types, import_type, batch_size)
                .await?;
            let message = format!(
                "Migration started! Processing {} items...",
                started.total_items
            );
            Ok(succeed(message, started))
        }
        ContentAction::ProcessBatch {
            job_id,
            offset,
            batch_size,
        } => {
            let report = controller
                .continue_migration(job_id, offset, batch_size)
                .await?;
            let message = format!(
                "Processed batch: {} imported, {} updated, {} skipped",
                report.imported, report.updated, report.skipped
            );
            Ok(succeed(message, report))
        }
        ContentAction::GetSites => {
            let sites = SiteRepository::new(state.db.clone())
                .list_active()
                .await?
                .into_iter()
                .map(|s| SiteSummary {
                    id: s.id,
                    domain: s.domain,
                    name: s.name,
                })
                .collect();
            Ok(succeed("", SitesPayload { sites }))
        }
        ContentAction::GetMigrationJobs => {
            let jobs = controller
                .store()
                .list_recent_jobs(state.config.recent_jobs_limit)
                .await?
                .into_iter()
                .map(|(job, site)| JobResponse::from_parts(job, site))
                .collect();
            Ok(succeed("", JobsPayload { jobs }))
        }
    }
}
