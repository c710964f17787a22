//! Integration tests for job status routes
//!
//! Tests the read-only job endpoints:
//! - Get job status with tenant info
//! - Unknown jobs map to 404
//! - Health check

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use pretty_assertions::assert_eq;
use tower::util::ServiceExt;

use reel_porter::db::{entities::migration_job::ImportType, enums::ContentKind};
use reel_porter::handlers;
use reel_porter::jobs::MigrationController;
use reel_porter::state::AppState;
use reel_porter::test_utils::*;

/// Helper to create a test router with job routes
fn create_test_router(state: &AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", handlers::api_routes())
        .with_state(state.clone())
}

/// Helper to parse JSON response body
async fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: axum::response::Response,
) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn get_uri(state: &AppState, uri: &str) -> axum::response::Response {
    create_test_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_get_pending_job() {
    let state = setup_test_app_state().await;
    let site = create_test_site(&state.db, "films.example").await;
    let job = create_test_job(
        &state.db,
        site.id,
        &[ContentKind::Movies, ContentKind::Episodes],
        ImportType::RewrittenOnly,
        12,
    )
    .await;

    let response = get_uri(&state, &format!("/api/jobs/{}", job.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["id"], job.id);
    assert_eq!(body["domain"], "films.example");
    assert_eq!(body["site_name"], "films");
    assert_eq!(body["content_types"], "movies,episodes");
    assert_eq!(body["import_type"], "rewritten_only");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["total_items"], 12);
    assert_eq!(body["processed_items"], 0);
    assert!(body["started_at"].is_null());
    assert!(body["completed_at"].is_null());
}

#[tokio::test]
async fn test_get_job_after_batch() {
    let state = setup_test_app_state().await;
    let site = create_test_site(&state.db, "progress.example").await;
    for tmdb_id in 1..=3 {
        seed_source_movie(&state.source, tmdb_id, "Title", true).await;
    }

    let controller = MigrationController::new(&state);
    let started = controller
        .start_migration(site.id, &[ContentKind::Movies], ImportType::AllContent, None)
        .await
        .unwrap();
    controller
        .continue_migration(started.job_id, 0, Some(10))
        .await
        .unwrap();

    let response = get_uri(&state, &format!("/api/jobs/{}", started.job_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["imported_count"], 3);
    assert_eq!(body["processed_items"], 10);
    assert_eq!(body["progress"], 100.0);
    assert!(body["started_at"].is_string());
    assert!(body["completed_at"].is_string());
}

#[tokio::test]
async fn test_get_job_not_found() {
    let state = setup_test_app_state().await;

    let response = get_uri(&state, "/api/jobs/99999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["error"], "Migration job not found");
}

#[tokio::test]
async fn test_health_check() {
    let state = setup_test_app_state().await;

    let response = get_uri(&state, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["status"], "ok");
}
