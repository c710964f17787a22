pub mod content;
pub mod health;
pub mod jobs;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Content import actions (test_connection, start_migration, process_batch, ...)
        .route("/content", post(content::handle_action))

        // Job endpoints
        .route("/jobs/:id", get(jobs::get_job_status))
}
